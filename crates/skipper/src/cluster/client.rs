//! EKS cluster client
//!
//! Thin wrapper over kube: connects through the AWS CLI kubeconfig update,
//! flattens pods/events into snapshot records, and follows pod logs for the
//! streaming endpoint. Listing failures degrade to empty snapshots instead of
//! propagating - analysis must keep working on partial data.

use anyhow::{anyhow, Context, Result};
use futures::AsyncBufReadExt;
use k8s_openapi::api::core::v1::{Event, Namespace, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::api::{Api, ListParams, LogParams};
use kube::Client;
use tokio::process::Command;

use super::{EventRecord, PodRecord};

/// Connected Kubernetes client bound to one EKS cluster.
pub struct ClusterClient {
  client: Client,
  cluster_name: String,
}

impl ClusterClient {
  /// Connect to an EKS cluster: refresh the local kubeconfig via the AWS
  /// CLI, build a client from it, and probe the API server.
  pub async fn connect(cluster_name: &str, region: &str) -> Result<Self> {
    update_kubeconfig(cluster_name, region).await?;

    let client = Client::try_default()
      .await
      .context("failed to build kubernetes client from kubeconfig")?;

    // Cheap read to verify the credentials actually work.
    let namespaces: Api<Namespace> = Api::all(client.clone());
    namespaces
      .list(&ListParams::default().limit(1))
      .await
      .context("cannot reach the cluster API server")?;

    foghorn::success!(&format!("connected to cluster {cluster_name}"));

    Ok(Self { client, cluster_name: cluster_name.to_string() })
  }

  pub fn cluster_name(&self) -> &str {
    &self.cluster_name
  }

  /// List pods in a namespace; transport failures yield an empty snapshot.
  pub async fn get_pods(&self, namespace: &str) -> Vec<PodRecord> {
    let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

    match pods.list(&ListParams::default()).await {
      Ok(list) => list.items.iter().map(pod_record).collect(),
      Err(e) => {
        foghorn::warn!(&format!("failed to list pods in {namespace}: {e}"));
        Vec::new()
      }
    }
  }

  /// List events in a namespace; transport failures yield an empty snapshot.
  pub async fn get_events(&self, namespace: &str) -> Vec<EventRecord> {
    let events: Api<Event> = Api::namespaced(self.client.clone(), namespace);

    match events.list(&ListParams::default()).await {
      Ok(list) => list.items.iter().map(event_record).collect(),
      Err(e) => {
        foghorn::warn!(&format!("failed to list events in {namespace}: {e}"));
        Vec::new()
      }
    }
  }

  /// Follow a pod's log as a stream of lines.
  pub async fn stream_logs(
    &self,
    namespace: &str,
    pod_name: &str,
    tail_lines: i64,
  ) -> Result<impl futures::Stream<Item = std::io::Result<String>> + Unpin> {
    let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
    let params = LogParams { follow: true, tail_lines: Some(tail_lines), ..LogParams::default() };

    let reader = pods
      .log_stream(pod_name, &params)
      .await
      .with_context(|| format!("failed to open log stream for {namespace}/{pod_name}"))?;

    Ok(reader.lines())
  }
}

async fn update_kubeconfig(cluster_name: &str, region: &str) -> Result<()> {
  let status = Command::new("aws")
    .args(["eks", "update-kubeconfig", "--region", region, "--name", cluster_name])
    .status()
    .await
    .context("failed to run the aws CLI - is it installed?")?;

  if !status.success() {
    return Err(anyhow!("aws eks update-kubeconfig exited with {status}"));
  }

  Ok(())
}

fn pod_record(pod: &Pod) -> PodRecord {
  PodRecord {
    name: pod.metadata.name.clone().unwrap_or_default(),
    namespace: pod.metadata.namespace.clone().unwrap_or_default(),
    status: display_status(pod),
    ready: ready_status(pod),
    restarts: restart_count(pod),
    age: format_age(pod.metadata.creation_timestamp.as_ref()),
    node: pod
      .spec
      .as_ref()
      .and_then(|s| s.node_name.clone())
      .unwrap_or_else(|| "N/A".to_string()),
  }
}

/// Derive the status the analyzer matches on. The bare phase never shows
/// CrashLoopBackOff or OOMKilled, so container state reasons take precedence.
fn display_status(pod: &Pod) -> String {
  if let Some(statuses) = pod.status.as_ref().and_then(|s| s.container_statuses.as_ref()) {
    for cs in statuses {
      if let Some(waiting) = cs.state.as_ref().and_then(|s| s.waiting.as_ref()) {
        if let Some(reason) = waiting.reason.as_ref().filter(|r| *r != "ContainerCreating") {
          return reason.clone();
        }
      }
      if let Some(terminated) = cs.state.as_ref().and_then(|s| s.terminated.as_ref()) {
        if let Some(reason) = terminated.reason.as_ref().filter(|r| *r != "Completed") {
          return reason.clone();
        }
      }
    }
  }

  pod
    .status
    .as_ref()
    .and_then(|s| s.phase.clone())
    .unwrap_or_else(|| "Unknown".to_string())
}

fn ready_status(pod: &Pod) -> String {
  let Some(statuses) = pod.status.as_ref().and_then(|s| s.container_statuses.as_ref()) else {
    return "0/0".to_string();
  };

  let ready = statuses.iter().filter(|cs| cs.ready).count();
  format!("{}/{}", ready, statuses.len())
}

fn restart_count(pod: &Pod) -> u32 {
  pod
    .status
    .as_ref()
    .and_then(|s| s.container_statuses.as_ref())
    .map(|statuses| statuses.iter().map(|cs| cs.restart_count.max(0) as u32).sum())
    .unwrap_or(0)
}

fn format_age(creation: Option<&Time>) -> String {
  let Some(created) = creation else {
    return "unknown".to_string();
  };

  let elapsed = chrono::Utc::now().signed_duration_since(created.0);
  if elapsed.num_days() > 0 {
    format!("{}d", elapsed.num_days())
  } else if elapsed.num_hours() > 0 {
    format!("{}h", elapsed.num_hours())
  } else {
    format!("{}m", elapsed.num_minutes().max(0))
  }
}

fn event_record(event: &Event) -> EventRecord {
  let object_kind =
    event.involved_object.kind.clone().unwrap_or_else(|| "Unknown".to_string());
  let object_name = event.involved_object.name.clone().unwrap_or_default();

  EventRecord {
    kind: event.type_.clone().unwrap_or_default(),
    reason: event.reason.clone().unwrap_or_default(),
    message: event.message.clone().unwrap_or_default(),
    object: format!("{object_kind}/{object_name}"),
    count: event.count.unwrap_or(1),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use k8s_openapi::api::core::v1::{
    ContainerState, ContainerStateTerminated, ContainerStateWaiting, ContainerStatus, PodStatus,
  };

  fn pod_with_status(status: PodStatus) -> Pod {
    Pod { status: Some(status), ..Pod::default() }
  }

  fn container_status(state: ContainerState, ready: bool, restarts: i32) -> ContainerStatus {
    ContainerStatus {
      state: Some(state),
      ready,
      restart_count: restarts,
      ..ContainerStatus::default()
    }
  }

  #[test]
  fn waiting_reason_overrides_phase() {
    let state = ContainerState {
      waiting: Some(ContainerStateWaiting {
        reason: Some("CrashLoopBackOff".to_string()),
        ..ContainerStateWaiting::default()
      }),
      ..ContainerState::default()
    };
    let pod = pod_with_status(PodStatus {
      phase: Some("Running".to_string()),
      container_statuses: Some(vec![container_status(state, false, 3)]),
      ..PodStatus::default()
    });

    assert_eq!(display_status(&pod), "CrashLoopBackOff");
  }

  #[test]
  fn oom_terminated_reason_overrides_phase() {
    let state = ContainerState {
      terminated: Some(ContainerStateTerminated {
        reason: Some("OOMKilled".to_string()),
        ..ContainerStateTerminated::default()
      }),
      ..ContainerState::default()
    };
    let pod = pod_with_status(PodStatus {
      phase: Some("Running".to_string()),
      container_statuses: Some(vec![container_status(state, false, 1)]),
      ..PodStatus::default()
    });

    assert_eq!(display_status(&pod), "OOMKilled");
  }

  #[test]
  fn plain_phase_is_used_when_containers_are_quiet() {
    let pod = pod_with_status(PodStatus {
      phase: Some("Pending".to_string()),
      ..PodStatus::default()
    });
    assert_eq!(display_status(&pod), "Pending");

    assert_eq!(display_status(&Pod::default()), "Unknown");
  }

  #[test]
  fn ready_and_restart_counts_aggregate_containers() {
    let running = ContainerState::default();
    let pod = pod_with_status(PodStatus {
      container_statuses: Some(vec![
        container_status(running.clone(), true, 2),
        container_status(running, false, 3),
      ]),
      ..PodStatus::default()
    });

    assert_eq!(ready_status(&pod), "1/2");
    assert_eq!(restart_count(&pod), 5);

    assert_eq!(ready_status(&Pod::default()), "0/0");
    assert_eq!(restart_count(&Pod::default()), 0);
  }

  #[test]
  fn age_formats_by_magnitude() {
    let days_ago = Time(chrono::Utc::now() - chrono::Duration::days(3));
    assert_eq!(format_age(Some(&days_ago)), "3d");

    let hours_ago = Time(chrono::Utc::now() - chrono::Duration::hours(5));
    assert_eq!(format_age(Some(&hours_ago)), "5h");

    let minutes_ago = Time(chrono::Utc::now() - chrono::Duration::minutes(12));
    assert_eq!(format_age(Some(&minutes_ago)), "12m");

    assert_eq!(format_age(None), "unknown");
  }

  #[test]
  fn event_record_flattens_the_involved_object() {
    let event = Event {
      type_: Some("Warning".to_string()),
      reason: Some("OOMKilling".to_string()),
      message: Some("memory cgroup out of memory".to_string()),
      involved_object: k8s_openapi::api::core::v1::ObjectReference {
        kind: Some("Pod".to_string()),
        name: Some("api-0".to_string()),
        ..Default::default()
      },
      ..Event::default()
    };

    let record = event_record(&event);
    assert_eq!(record.kind, "Warning");
    assert_eq!(record.object, "Pod/api-0");
    assert_eq!(record.count, 1);
  }
}

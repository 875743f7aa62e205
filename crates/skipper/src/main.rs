use anyhow::Result;
use clap::{Parser, Subcommand};
use skipper::cli::commands;

#[derive(Parser)]
#[command(name = "skipper")]
#[command(
  about = "Skipper - EKS Troubleshooter\nRAG-enhanced cluster analysis and remediation advice"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the REST server in the foreground
  Serve {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,
    /// Bind port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
  },
  /// Connect the server to an EKS cluster
  Connect {
    /// EKS cluster name
    cluster: String,
    /// AWS region
    #[arg(short, long, env = "AWS_REGION", default_value = "us-west-2")]
    region: String,
  },
  /// Analyze a namespace for issues and recommendations
  Analyze {
    /// Namespace to analyze
    #[arg(default_value = "default")]
    namespace: String,
  },
  /// List pods in a namespace
  Pods {
    /// Namespace to list
    #[arg(default_value = "default")]
    namespace: String,
  },
  /// Search the troubleshooting knowledge base
  Query {
    /// Search terms (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
    /// Maximum number of results
    #[arg(short, long, default_value = "3")]
    limit: usize,
  },
  /// Add custom knowledge to the corpus
  Add {
    /// Title of the entry
    title: String,
    /// Body text
    content: String,
    /// Category tag
    #[arg(short, long, default_value = "custom")]
    category: String,
  },
  /// Show knowledge base statistics
  Stats,
  /// Query server logs for debugging and monitoring
  Logs {
    /// Maximum number of log entries to return
    #[arg(short, long, default_value = "50")]
    limit: usize,
    /// Filter by log level (info, warn, error, all)
    #[arg(long, default_value = "all")]
    level: String,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Serve { host, port } => commands::serve(host, port).await,
    Command::Connect { cluster, region } => commands::connect(&cluster, &region).await,
    Command::Analyze { namespace } => commands::analyze(&namespace).await,
    Command::Pods { namespace } => commands::pods(&namespace).await,
    Command::Query { terms, limit } => commands::query(&terms, limit).await,
    Command::Add { title, content, category } => {
      commands::add_knowledge(&title, &content, &category).await
    }
    Command::Stats => commands::stats().await,
    Command::Logs { limit, level } => commands::logs(limit, &level).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  handle(cli.command).await?;
  Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use webapp_traffic::config::DEFAULT_REGION;
use webapp_traffic::{ArmClient, Credentials, Workflow, WorkflowConfig};

#[derive(Parser)]
#[command(name = "webapp-traffic")]
#[command(about = "Provision web apps behind a traffic manager, scale them, and clean up")]
struct Cli {
    /// Region for every regional resource
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Directory the PFX certificate is written to
    #[arg(long, default_value = ".")]
    certificate_dir: PathBuf,

    /// Leave the purchased domain in place during teardown
    #[arg(long)]
    keep_domain: bool,

    /// Leave the PFX certificate on disk
    #[arg(long)]
    keep_certificate: bool,

    /// Seconds between long-running operation polls
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Log request and polling detail
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(&cli).await {
        error!("{e:#}");
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let credentials = Credentials::from_env().context("reading service principal credentials")?;
    let client = ArmClient::new(credentials)
        .context("building management client")?
        .poll_interval(Duration::from_secs(cli.poll_interval));

    let subscription = client
        .subscription_display_name()
        .await
        .context("looking up subscription")?;
    info!("Selected subscription: {subscription}");

    let config = WorkflowConfig::new(&cli.region)
        .certificate_dir(&cli.certificate_dir)
        .cleanup_domain(!cli.keep_domain)
        .keep_certificate(cli.keep_certificate);

    let report = Workflow::new(client, config).run().await;
    match report.error {
        Some(e) => Err(anyhow::Error::new(e).context("provisioning workflow failed")),
        None => {
            info!("Workflow completed");
            Ok(())
        }
    }
}

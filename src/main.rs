use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use award_scout::notify::{EmailConfig, EmailNotifier, Notify};
use award_scout::{load_configs, run_config, SearchClient};

/// Scan configured routes for premium award fares and email the results
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Path to the search config file
    #[arg(short, long, default_value = "./configs.json")]
    configs: PathBuf,

    /// Path to the SMTP credentials file
    #[arg(long, default_value = "./email_config.json")]
    email_config: PathBuf,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_notifier(path: &Path) -> anyhow::Result<EmailNotifier> {
    let config = EmailConfig::from_file(path)
        .with_context(|| format!("failed to load email config from {}", path.display()))?;
    Ok(EmailNotifier::new(config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let filter = match opts.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let configs = load_configs(&opts.configs).with_context(|| {
        format!("failed to load search configs from {}", opts.configs.display())
    })?;

    // A missing or broken email setup downgrades the run to log-only.
    let notifier = match build_notifier(&opts.email_config) {
        Ok(notifier) => Some(notifier),
        Err(err) => {
            tracing::warn!(%err, "email sender unavailable, reports will not be delivered");
            None
        }
    };

    let client = SearchClient::new();
    for config in &configs {
        let report = run_config(&client, config).await?;
        tracing::info!(title = report.title(), "scan finished");

        if let Some(notifier) = &notifier {
            if let Err(err) = notifier
                .send(&report.render(), &config.report_emails, report.title())
                .await
            {
                tracing::error!(%err, "failed to send report email");
            }
        }
    }

    Ok(())
}

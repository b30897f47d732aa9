//! mailer-ses - Mail monitoring events through Amazon SES.

use std::fs::File;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use mailer_ses::cli::{Cli, LogFormat};
use mailer_ses::{Event, MailerConfig, SesTransport, Settings};

/// HTTP client timeout. Kept above the dispatch budget so the dispatcher's
/// deadline is the one that fires.
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Initialize the tracing subscriber with the specified log format.
///
/// Logs go to stderr; stdout carries only the status line.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> Result<MailerConfig> {
    info!(config_path = %cli.config.display(), section = %cli.json_config, "Loading settings");

    let settings = Settings::load(&cli.config)?;
    Ok(settings.section(&cli.json_config)?)
}

fn read_event(cli: &Cli) -> Result<Event> {
    let event = match &cli.event {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening event {}", path.display()))?;
            Event::from_reader(file)?
        }
        None => Event::from_reader(std::io::stdin().lock())?,
    };
    Ok(event)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, path = %cli.config.display(), "Failed to load settings");
            std::process::exit(1);
        }
    };

    let event = match read_event(&cli) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Failed to read event");
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(config, event))
}

async fn run(config: MailerConfig, event: Event) -> Result<()> {
    let http_client = reqwest::Client::builder()
        .timeout(HTTP_CLIENT_TIMEOUT)
        .build()?;

    let transport = SesTransport::new(&config, http_client);

    let mut stdout = std::io::stdout();
    mailer_ses::handle(&config, &event, &transport, &mut stdout).await?;

    Ok(())
}

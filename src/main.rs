mod routes;
mod settings;

use crate::settings::AppSettings;
use log::{error, info};
use stats_data::DataService;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let settings = AppSettings::load()?;
    init_logging(&settings.log_filter);

    let data = DataService::new(settings.stats.clone());
    let app = routes::router(data);

    let listener = TcpListener::bind(settings.bind).await?;
    info!(
        "serving documents from {} on http://{}",
        settings.stats.request_uri,
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

// RUST_LOG wins over STATS_LOG so a one-off run can turn up verbosity.
// The subscriber also forwards `log` records from the data crate.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("stats-api {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "stats-api - league, match and brand REST API over blob storage

Usage:
  stats-api
  stats-api --help
  stats-api --version

Environment:
  STATS_REQUEST_URI   Blob container URI, ending in '/' (required)
  STATS_SAS_TOKEN     Access token appended verbatim to every document URL, e.g. ?sv=...&sig=...
  STATS_BIND          Listen address (default 0.0.0.0:8080)
  STATS_LOG           Log filter when RUST_LOG is unset (default info)"
}

use std::error::Error;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fare_search::cache::{CacheConfig, CachedFetcher};
use fare_search::input::RunInput;
use fare_search::search::{ResultsCollector, SearchConfig, SearchRunner};
use fare_search::sink::{JsonFileSink, ResultSink};
use fare_search::trip::{MockFetcher, SiteFetcher, TripClient, TripConfig};
use fare_search::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_OUTPUT: &str = "results.json";

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let arg = std::env::args().nth(1);
    let outcome = if arg.as_deref() == Some("serve") {
        serve().await
    } else {
        match std::env::var("FARE_SEARCH_INPUT").ok().or(arg) {
            Some(path) => run_batch(&path).await,
            None => Err("usage: fare-search <input.json> | fare-search serve \
                         (or set FARE_SEARCH_INPUT)"
                .into()),
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fare-search failed");
            ExitCode::FAILURE
        }
    }
}

/// Live site client, or recorded payloads when `FARE_SEARCH_MOCK_DIR` is set.
fn site_fetcher() -> Result<SiteFetcher, BoxError> {
    match std::env::var("FARE_SEARCH_MOCK_DIR") {
        Ok(dir) => {
            info!(dir = %dir, "serving recorded payloads");
            Ok(MockFetcher::from_dir(&dir)?.into())
        }
        Err(_) => Ok(TripClient::new(TripConfig::default())?.into()),
    }
}

/// Run every search described by the input file and save the results.
async fn run_batch(input_path: &str) -> Result<(), BoxError> {
    let input = RunInput::load(input_path)?;
    let roots = input.root_tasks()?;
    let config = input.search_config(SearchConfig::default())?;

    let fetcher = CachedFetcher::new(site_fetcher()?, &CacheConfig::default());
    let collector = Arc::new(ResultsCollector::new());
    let summary = SearchRunner::new(&fetcher, &config, collector.clone())
        .run(roots)
        .await;

    let output = std::env::var("FARE_SEARCH_OUTPUT").unwrap_or_else(|_| DEFAULT_OUTPUT.into());
    let written = JsonFileSink::new(&output)
        .persist(&collector.all_sorted())
        .await?;

    info!(
        requests = summary.requests,
        failed = summary.tasks_failed,
        records = written,
        output = %output,
        "batch run complete"
    );
    Ok(())
}

/// Serve the HTTP API.
async fn serve() -> Result<(), BoxError> {
    let addr: SocketAddr = std::env::var("FARE_SEARCH_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.into())
        .parse()?;

    let fetcher = CachedFetcher::new(site_fetcher()?, &CacheConfig::default());
    let app = create_router(AppState::new(fetcher, SearchConfig::default()));

    info!(%addr, "fare search listening");
    info!("  GET  /health  - Health check");
    info!("  POST /search  - Run a search");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

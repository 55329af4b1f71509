use std::{error::Error, net::SocketAddr, path::PathBuf};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use receipt_summary::{
    AppState, CategoryRules, build_router, build_summary, get_local_offset, graceful_shutdown,
    load_export,
};

/// Serve a summary of the products bought over the last year from a receipt export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the JSON receipt export.
    #[arg(long, default_value = "data.json")]
    data_path: PathBuf,

    /// The port to serve the summary from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The local timezone as a canonical timezone name, e.g. "Europe/London".
    #[arg(long, default_value = "Europe/London")]
    timezone: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let now = OffsetDateTime::now_utc();
    let local_offset = get_local_offset(&args.timezone, now).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", args.timezone);
        receipt_summary::Error::InvalidTimezone(args.timezone.clone())
    })?;

    let export = load_export(&args.data_path)
        .inspect_err(|error| tracing::error!("Could not load the export: {error}"))?;
    tracing::info!(
        "Read {} in-store receipts from {}",
        export.in_store_receipts.len(),
        args.data_path.display()
    );

    let summary = build_summary(&export, now, local_offset, &CategoryRules::default());
    let router = add_tracing_layer(build_router(AppState::new(summary)));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("Summary available at http://{addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let method = req.method();
        let uri = req.uri();

        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str());

        tracing::debug_span!("request", %method, %uri, matched_path)
    });

    router.layer(tracing_layer)
}

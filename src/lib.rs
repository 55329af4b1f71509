//! Receipt Summary turns a supermarket receipt export into a summary of what
//! you bought over the last year.
//!
//! The export is read once, every product is totalled and ranked by spend,
//! and the resulting table is served as a single HTML page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod app_state;
mod category;
mod endpoints;
mod error;
mod export;
mod html;
mod normalize;
mod not_found;
mod ranking;
mod routing;
mod summary;
mod summary_page;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use aggregation::{
    Aggregation, ProductAccumulator, Purchase, REPORTING_WINDOW, aggregate_receipts, window_start,
};
pub use app_state::AppState;
pub use category::{CategoryRule, CategoryRules, DEFAULT_CATEGORY};
pub use error::Error;
pub use export::{Export, LineItem, NumericText, Receipt, load_export, parse_export};
pub use html::format_currency;
pub use normalize::{NormalizedLineItem, canonical_name, normalize_line_item};
pub use ranking::{DisplayRow, PriceRange, price_range, rank_products};
pub use routing::build_router;
pub use summary::{Summary, build_summary};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

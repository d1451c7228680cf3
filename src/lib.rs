//! Transaction Insights is a backend for browsing product sale transactions
//! and their monthly statistics.
//!
//! This library provides a JSON REST API that:
//! - reseeds its SQLite database from a remote JSON dataset,
//! - searches transactions one page at a time,
//! - summarises the sales of a month as totals, a price histogram and
//!   per-category counts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod combined;
mod config;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod pagination;
mod routing;
mod seed;
mod statistics;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use combined::{CombinedData, combined};
pub use config::{Config, DEFAULT_SEED_URL};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{SeedSource, reinitialize};
pub use statistics::{CategoryCounts, PriceBucket, PriceDistribution, Statistics};
pub use transaction::{
    Group, GroupKey, Grouping, ListParams, MonthFilter, NewTransaction, SQLiteTransactionStore,
    Transaction, TransactionFilter, TransactionPage, TransactionStore,
};

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
            Ok(mut signal) => {
                signal.recv().await;
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

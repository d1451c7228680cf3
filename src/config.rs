//! Command line and environment configuration for the server.

use std::{net::IpAddr, time::Duration};

use clap::Parser;

/// The default URL of the seed dataset.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The REST API server for monthly transaction insights.
///
/// Every option can also be set with the environment variable shown in its
/// help text.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH", default_value = "transactions.db")]
    pub db_path: String,

    /// The address to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The URL of the JSON dataset used to reseed the database.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    pub seed_url: String,

    /// How many seconds to wait for the seed dataset before giving up.
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// The timeout for fetching the seed dataset.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

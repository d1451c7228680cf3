//! Replaces the stored transactions with a dataset fetched over HTTP.

use std::time::Duration;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reqwest::Client;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, SQLiteTransactionStore, TransactionStore},
};

/// Where to fetch the seed dataset from.
///
/// The dataset must be a JSON array of transactions without IDs.
#[derive(Debug, Clone)]
pub struct SeedSource {
    client: Client,
    url: String,
}

impl SeedSource {
    /// Create a source for the dataset at `url`.
    ///
    /// Requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [Error::FetchError] if the HTTP client could not be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::FetchError(error.to_string()))?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// The URL of the dataset.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and decode the dataset.
    ///
    /// # Errors
    /// Returns [Error::FetchError] if the request fails, the server responds
    /// with a non-success status, or the body is not a JSON array of
    /// transactions.
    pub async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::FetchError(error.to_string()))?;

        response
            .json::<Vec<NewTransaction>>()
            .await
            .map_err(|error| Error::FetchError(error.to_string()))
    }
}

/// Replace every transaction in `store` with the dataset from `source`.
///
/// The dataset is fetched before anything is deleted, so a failed download
/// leaves the store untouched. Returns the number of transactions inserted.
///
/// # Errors
/// Returns [Error::SeedError] wrapping the error from the step that failed.
pub async fn reinitialize(
    store: &impl TransactionStore,
    source: &SeedSource,
) -> Result<usize, Error> {
    tracing::info!("Fetching seed dataset from {}", source.url());
    let transactions = source
        .fetch()
        .await
        .map_err(|error| Error::SeedError(Box::new(error)))?;
    tracing::debug!("Fetched {} transactions", transactions.len());

    store
        .delete_all()
        .map_err(|error| Error::SeedError(Box::new(error)))?;
    let inserted = store
        .insert_many(transactions)
        .map_err(|error| Error::SeedError(Box::new(error)))?;

    tracing::info!("Reseeded the database with {inserted} transactions");

    Ok(inserted)
}

/// The state needed for reseeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The store to replace the contents of.
    pub transaction_store: SQLiteTransactionStore,
    /// Where to get the new contents from.
    pub seed_source: SeedSource,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// Route handler that reseeds the database from the remote dataset.
pub async fn get_initialize(State(state): State<SeedState>) -> Response {
    match reinitialize(&state.transaction_store, &state.seed_source).await {
        Ok(_) => (StatusCode::OK, "Database Initialized").into_response(),
        Err(error) => {
            tracing::error!("could not initialize the database: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error initializing database",
            )
                .into_response()
        }
    }
}

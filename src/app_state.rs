//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error, db::initialize, pagination::PaginationConfig, seed::SeedSource,
    transaction::SQLiteTransactionStore,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store for the transactions.
    pub transaction_store: SQLiteTransactionStore,

    /// The config that controls how to page transactions.
    pub pagination_config: PaginationConfig,

    /// Where to fetch the dataset from when reseeding the database.
    pub seed_source: SeedSource,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: SeedSource,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection).map_err(Error::StoreWriteError)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            transaction_store: SQLiteTransactionStore::new(connection),
            pagination_config,
            seed_source,
        })
    }
}

impl FromRef<AppState> for SQLiteTransactionStore {
    fn from_ref(state: &AppState) -> Self {
        state.transaction_store.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusqlite::Connection;

    use crate::{
        pagination::PaginationConfig,
        seed::SeedSource,
        transaction::{TransactionFilter, TransactionStore},
    };

    use super::AppState;

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();
        let seed_source =
            SeedSource::new("http://localhost/data.json", Duration::from_secs(1)).unwrap();

        let state = AppState::new(connection, seed_source, PaginationConfig::default()).unwrap();

        assert_eq!(
            state
                .transaction_store
                .count(&TransactionFilter::default()),
            Ok(0)
        );
    }
}

//! Sets up the application's database.

use rusqlite::Connection;

use crate::transaction::{create_transaction_table, register_search_functions};

/// Create all the tables needed by the application and register the SQL
/// functions its queries use on `connection`.
///
/// Safe to call on a database that is already initialized. Must be called on
/// every new connection since SQL functions do not persist.
///
/// # Errors
/// Returns an error if a table could not be created or a function could not
/// be registered.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    register_search_functions(connection)?;

    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()
}

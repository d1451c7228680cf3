use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    db::initialize,
    transaction::{NewTransaction, SQLiteTransactionStore, TransactionStore},
};

#[track_caller]
pub(crate) fn get_test_store() -> SQLiteTransactionStore {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
}

pub(crate) fn january_transaction(title: &str, price: f64) -> NewTransaction {
    NewTransaction::build(title, price, datetime!(2023-01-15 10:00 UTC)).category("electronics")
}

/// Three January transactions priced 50 (sold), 150 (unsold) and 950 (sold).
#[track_caller]
pub(crate) fn seed_january_scenario() -> SQLiteTransactionStore {
    let store = get_test_store();
    store
        .insert_many(vec![
            january_transaction("cheap", 50.0).sold(true),
            january_transaction("mid", 150.0),
            january_transaction("pricey", 950.0).sold(true),
        ])
        .expect("Could not insert test transactions.");

    store
}

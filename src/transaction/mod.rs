//! Transaction storage and search.
//!
//! This module contains everything related to storing and finding transactions:
//! - The `Transaction` model and `NewTransaction` for records entering the store
//! - The `TransactionStore` trait, its filters and groupings, and a SQLite implementation
//! - Month name resolution for month filters
//! - The paginated search service and its route handler

mod core;
mod list;
mod month;
mod sqlite;
mod store;

pub use core::{NewTransaction, Transaction, create_transaction_table};
pub use list::{ListParams, TransactionPage, get_transactions, list_transactions};
pub use month::MonthFilter;
pub use sqlite::SQLiteTransactionStore;
pub(crate) use sqlite::register_search_functions;
pub use store::{Group, GroupKey, Grouping, TransactionFilter, TransactionStore};

//! Defines the core data models and table schema for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::database_id::TransactionId;

// ============================================================================
// MODELS
// ============================================================================

/// A product sale, i.e. a listing of a product and whether it was sold.
///
/// Transactions are only created in bulk by reseeding the store, see
/// [NewTransaction] for the shape of the incoming records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID the store assigned to the transaction.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The product category, e.g. "electronics" or "men's clothing".
    pub category: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold (or listed, for unsold products).
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
    /// A URL to an image of the product.
    pub image: String,
}

/// A transaction that has not been added to the store yet.
///
/// This is the shape of a record in the seed dataset. Any `id` in the
/// dataset is ignored since the store assigns IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The product category.
    pub category: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
    /// A URL to an image of the product.
    #[serde(default)]
    pub image: String,
}

impl NewTransaction {
    /// Create a new transaction with an empty description, no category and
    /// `sold` set to false.
    ///
    /// The remaining fields can be set with the builder style methods.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> Self {
        Self {
            title: title.to_owned(),
            description: String::new(),
            category: String::new(),
            price,
            date_of_sale,
            sold: false,
            image: String::new(),
        }
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category of the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the image URL of the transaction.
    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// Sale dates are stored in UTC so that the month of a sale can be read
/// directly from the stored text.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale TEXT NOT NULL,
                sold INTEGER NOT NULL CHECK (sold IN (0, 1)),
                image TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    // Every month filter reads the sale date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// The columns read by [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, category, price, date_of_sale, sold, image";

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let price = row.get(4)?;
    let date_of_sale = row.get(5)?;
    let sold = row.get(6)?;
    let image = row.get(7)?;

    Ok(Transaction {
        id,
        title,
        description,
        category,
        price,
        date_of_sale,
        sold,
        image,
    })
}

/// Convert a sale date to UTC for storage.
pub(crate) fn to_utc(date_time: OffsetDateTime) -> OffsetDateTime {
    date_time.to_offset(UtcOffset::UTC)
}

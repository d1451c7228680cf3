//! Defines the transaction store trait and the queries it answers.

use crate::Error;

use super::{MonthFilter, NewTransaction, Transaction};

/// Handles the persistence, querying and aggregation of transactions.
///
/// Implementers must be cheap to clone and safe to share between request
/// handlers, e.g. a handle to a shared connection.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Add a batch of transactions to the store.
    ///
    /// # Errors
    /// Returns [Error::StoreWriteError] if the batch could not be written.
    fn insert_many(&self, transactions: Vec<NewTransaction>) -> Result<usize, Error>;

    /// Remove every transaction from the store.
    ///
    /// Deleting from an empty store is not an error.
    fn delete_all(&self) -> Result<(), Error>;

    /// Get at most `limit` transactions that match `filter`, skipping the
    /// first `offset` matches.
    ///
    /// Transactions are returned in the order they were inserted.
    fn find(
        &self,
        filter: &TransactionFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions that match `filter`.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error>;

    /// Group the transactions that match `filter` and count each group.
    ///
    /// If `sum_price` is true, each group also holds the sum of its prices.
    /// Groups with no transactions are not returned.
    fn aggregate(
        &self,
        filter: &TransactionFilter,
        grouping: &Grouping,
        sum_price: bool,
    ) -> Result<Vec<Group>, Error>;
}

/// Defines which transactions a store query applies to.
///
/// All the conditions that are set must hold for a transaction to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Match transactions whose title, description or category contains
    /// this text, ignoring case. An empty string matches everything.
    pub search: Option<String>,
    /// Match transactions sold in this month.
    pub month: Option<MonthFilter>,
    /// Match transactions that were sold (`true`) or not sold (`false`).
    pub sold: Option<bool>,
}

impl TransactionFilter {
    /// A filter for the transactions in `month`.
    pub fn for_month(month: MonthFilter) -> Self {
        Self {
            month: Some(month),
            ..Default::default()
        }
    }

    /// Set whether matching transactions must have been sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }
}

/// How [TransactionStore::aggregate] should group transactions.
#[derive(Debug, Clone, PartialEq)]
pub enum Grouping {
    /// A single group with every matching transaction.
    All,
    /// One group per category.
    Category,
    /// Bucket transactions by price.
    ///
    /// Holds the bucket boundaries in increasing order. Each bucket includes
    /// its lower boundary and excludes its upper boundary. Use
    /// [f64::INFINITY] as the last boundary for an open-ended last bucket.
    /// Prices outside every bucket are grouped under [GroupKey::Other].
    PriceBucket(Vec<f64>),
}

/// Identifies the group an [aggregate](TransactionStore::aggregate) result
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    /// The single group from [Grouping::All].
    All,
    /// The category of the transactions in a group.
    Category(String),
    /// The index of the price bucket, i.e. the index of its lower boundary.
    Bucket(usize),
    /// Prices that fall outside every price bucket.
    Other,
}

/// A group of transactions from [TransactionStore::aggregate].
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Which group this is.
    pub key: GroupKey,
    /// The number of transactions in the group.
    pub count: u64,
    /// The sum of prices in the group, only set if requested.
    pub price_sum: Option<f64>,
}

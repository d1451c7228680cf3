//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, functions::FunctionFlags, params_from_iter, types::Value};

use crate::Error;

use super::{
    MonthFilter, NewTransaction, Transaction,
    core::{TRANSACTION_COLUMNS, map_transaction_row, to_utc},
    store::{Group, GroupKey, Grouping, TransactionFilter, TransactionStore},
};

/// Extracts the month number (1-12) from the stored UTC sale date.
const MONTH_EXPRESSION: &str = "CAST(strftime('%m', date_of_sale) AS INTEGER)";

/// The bucket index given to prices outside every price bucket.
const OTHER_BUCKET: i64 = -1;

/// The name of the SQL function registered by [register_search_functions].
const FOLD_FUNCTION: &str = "fold";

/// Stores transactions in a SQLite database.
///
/// The transaction table must exist before the store is used, see
/// [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert the transactions in a single database transaction, so either
    /// the whole batch is written or none of it is.
    ///
    /// # Errors
    /// Returns [Error::StoreWriteError] if there is an SQL error, or
    /// [Error::DatabaseLockError] if the connection lock is poisoned.
    fn insert_many(&self, transactions: Vec<NewTransaction>) -> Result<usize, Error> {
        let connection = self.lock()?;

        insert_transactions(&connection, transactions).map_err(Error::StoreWriteError)
    }

    fn delete_all(&self) -> Result<(), Error> {
        let connection = self.lock()?;

        connection
            .execute("DELETE FROM \"transaction\"", ())
            .map_err(Error::StoreWriteError)?;

        Ok(())
    }

    /// # Errors
    /// Returns [Error::StoreQueryError] if there is an SQL error.
    fn find(
        &self,
        filter: &TransactionFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        select_transactions(&connection, filter, limit, offset).map_err(Error::StoreQueryError)
    }

    /// # Errors
    /// Returns [Error::StoreQueryError] if there is an SQL error.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let connection = self.lock()?;

        count_transactions(&connection, filter).map_err(Error::StoreQueryError)
    }

    /// Groups are ordered by category or bucket, with [GroupKey::Other] last.
    ///
    /// # Errors
    /// Returns [Error::StoreQueryError] if there is an SQL error.
    fn aggregate(
        &self,
        filter: &TransactionFilter,
        grouping: &Grouping,
        sum_price: bool,
    ) -> Result<Vec<Group>, Error> {
        let connection = self.lock()?;

        let mut groups = aggregate_transactions(&connection, filter, grouping)
            .map_err(Error::StoreQueryError)?;

        groups.sort_by_key(|group| matches!(group.key, GroupKey::Other));

        if !sum_price {
            for group in &mut groups {
                group.price_sum = None;
            }
        }

        Ok(groups)
    }
}

fn insert_transactions(
    connection: &Connection,
    transactions: Vec<NewTransaction>,
) -> Result<usize, rusqlite::Error> {
    let tx = connection.unchecked_transaction()?;

    // Prepare the insert statement once for reuse
    let mut stmt = tx.prepare(
        "INSERT INTO \"transaction\" (title, description, category, price, date_of_sale, sold, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    let mut inserted = 0;
    for transaction in transactions {
        inserted += stmt.execute((
            transaction.title,
            transaction.description,
            transaction.category,
            transaction.price,
            to_utc(transaction.date_of_sale),
            transaction.sold,
            transaction.image,
        ))?;
    }

    drop(stmt);

    tx.commit()?;
    Ok(inserted)
}

fn select_transactions(
    connection: &Connection,
    filter: &TransactionFilter,
    limit: u64,
    offset: u64,
) -> Result<Vec<Transaction>, rusqlite::Error> {
    let (where_clause, mut params) = build_where_clause(filter);

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"{where_clause} \
        ORDER BY id ASC LIMIT ?{} OFFSET ?{}",
        params.len() + 1,
        params.len() + 2,
    );
    params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    params.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .collect()
}

fn count_transactions(
    connection: &Connection,
    filter: &TransactionFilter,
) -> Result<u64, rusqlite::Error> {
    let (where_clause, params) = build_where_clause(filter);
    let query = format!("SELECT COUNT(id) FROM \"transaction\"{where_clause}");

    connection
        .query_row(&query, params_from_iter(params), |row| row.get::<_, i64>(0))
        .map(|count| count.unsigned_abs())
}

fn aggregate_transactions(
    connection: &Connection,
    filter: &TransactionFilter,
    grouping: &Grouping,
) -> Result<Vec<Group>, rusqlite::Error> {
    let (where_clause, mut params) = build_where_clause(filter);

    match grouping {
        Grouping::All => {
            let query = format!(
                "SELECT COUNT(id), TOTAL(price) FROM \"transaction\"{where_clause}"
            );

            let (count, price_sum) =
                connection.query_row(&query, params_from_iter(params), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
                })?;

            if count == 0 {
                return Ok(Vec::new());
            }

            Ok(vec![Group {
                key: GroupKey::All,
                count: count.unsigned_abs(),
                price_sum: Some(price_sum),
            }])
        }
        Grouping::Category => {
            let query = format!(
                "SELECT category, COUNT(id), TOTAL(price) FROM \"transaction\"{where_clause} \
                GROUP BY category ORDER BY category ASC"
            );

            connection
                .prepare(&query)?
                .query_map(params_from_iter(params), |row| {
                    Ok(Group {
                        key: GroupKey::Category(row.get(0)?),
                        count: row.get::<_, i64>(1)?.unsigned_abs(),
                        price_sum: Some(row.get(2)?),
                    })
                })?
                .collect()
        }
        Grouping::PriceBucket(boundaries) => {
            let bucket_expression = build_bucket_expression(boundaries, &mut params);
            let query = format!(
                "SELECT {bucket_expression} AS bucket, COUNT(id), TOTAL(price) \
                FROM \"transaction\"{where_clause} \
                GROUP BY bucket ORDER BY bucket ASC"
            );

            connection
                .prepare(&query)?
                .query_map(params_from_iter(params), |row| {
                    let bucket: i64 = row.get(0)?;
                    let key = usize::try_from(bucket)
                        .map(GroupKey::Bucket)
                        .unwrap_or(GroupKey::Other);

                    Ok(Group {
                        key,
                        count: row.get::<_, i64>(1)?.unsigned_abs(),
                        price_sum: Some(row.get(2)?),
                    })
                })?
                .collect()
        }
    }
}

/// Build the SQL `WHERE` clause (with a leading space) and its parameters for
/// `filter`.
///
/// Parameters are numbered from `?1`, so callers adding their own parameters
/// should number them from `params.len() + 1`.
fn build_where_clause(filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(search) = &filter.search {
        let n = query_parameters.len() + 1;
        where_clause_parts.push(format!(
            "(instr({FOLD_FUNCTION}(title), ?{n}) > 0 \
            OR instr({FOLD_FUNCTION}(description), ?{n}) > 0 \
            OR instr({FOLD_FUNCTION}(category), ?{n}) > 0)"
        ));
        query_parameters.push(Value::Text(fold_case(search)));
    }

    match filter.month {
        Some(MonthFilter::Month(month)) => {
            where_clause_parts.push(format!(
                "{MONTH_EXPRESSION} = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Integer(i64::from(u8::from(month))));
        }
        Some(MonthFilter::Unrecognized) => where_clause_parts.push("0 = 1".to_owned()),
        None => {}
    }

    if let Some(sold) = filter.sold {
        where_clause_parts.push(format!("sold = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(i64::from(sold)));
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            String::from(" WHERE ") + &where_clause_parts.join(" AND "),
            query_parameters,
        )
    }
}

/// Build a SQL `CASE` expression that maps a price to the index of its
/// bucket, or to [OTHER_BUCKET].
///
/// The boundaries are appended to `params`.
fn build_bucket_expression(boundaries: &[f64], params: &mut Vec<Value>) -> String {
    let mut cases = Vec::new();

    for (i, window) in boundaries.windows(2).enumerate() {
        let (lower, upper) = (window[0], window[1]);

        params.push(Value::Real(lower));
        let lower_param = params.len();

        if upper.is_infinite() {
            cases.push(format!("WHEN price >= ?{lower_param} THEN {i}"));
        } else {
            params.push(Value::Real(upper));
            let upper_param = params.len();
            cases.push(format!(
                "WHEN price >= ?{lower_param} AND price < ?{upper_param} THEN {i}"
            ));
        }
    }

    if cases.is_empty() {
        return OTHER_BUCKET.to_string();
    }

    format!("CASE {} ELSE {OTHER_BUCKET} END", cases.join(" "))
}

/// Register the SQL function that search uses to fold text to lower case.
///
/// SQLite's own `lower` and `LIKE` only fold ASCII letters, this function
/// folds any Unicode text the same way as [fold_case].
///
/// # Errors
/// Returns an error if the function could not be registered.
pub(crate) fn register_search_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text = context.get::<String>(0)?;
            Ok(fold_case(&text))
        },
    )
}

fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

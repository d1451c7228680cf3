//! Sales statistics for a month.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{Grouping, MonthFilter, SQLiteTransactionStore, TransactionFilter, TransactionStore},
};

use super::MonthParams;

/// Sales totals for the transactions in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of prices of the products sold.
    pub total_sales: f64,
    /// The number of products sold.
    pub total_sold_items: u64,
    /// The number of products not sold.
    pub total_unsold_items: u64,
}

/// Compute the sales statistics for the transactions in `month`.
///
/// # Errors
/// Returns an error if the store could not be queried.
pub fn statistics(store: &impl TransactionStore, month: MonthFilter) -> Result<Statistics, Error> {
    let sold = TransactionFilter::for_month(month).sold(true);
    let unsold = TransactionFilter::for_month(month).sold(false);

    let total_sales = store
        .aggregate(&sold, &Grouping::All, true)?
        .first()
        .and_then(|group| group.price_sum)
        .unwrap_or(0.0);

    Ok(Statistics {
        total_sales,
        total_sold_items: store.count(&sold)?,
        total_unsold_items: store.count(&unsold)?,
    })
}

/// Route handler for the sales statistics of a month.
pub async fn get_statistics(
    State(store): State<SQLiteTransactionStore>,
    Query(params): Query<MonthParams>,
) -> Response {
    match statistics(&store, params.month_filter()) {
        Ok(statistics) => Json(statistics).into_response(),
        Err(error) => {
            tracing::error!("could not compute statistics for {params:?}: {error}");
            error.into_json_response("Error fetching statistics")
        }
    }
}

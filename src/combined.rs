//! Combines the first page of transactions, the sales statistics and the price
//! histogram for a month into a single response.

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::task::{JoinHandle, spawn_blocking};

use crate::{
    AppState, Error,
    pagination::PaginationConfig,
    statistics::{MonthParams, PriceDistribution, Statistics, price_distribution, statistics},
    transaction::{
        ListParams, SQLiteTransactionStore, TransactionPage, TransactionStore, list_transactions,
    },
};

/// The data for a month's overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedData {
    /// The first page of transactions in the month.
    pub transactions: TransactionPage,
    /// The sales statistics for the month.
    pub statistics: Statistics,
    /// The price histogram for the month.
    pub chart: PriceDistribution,
}

/// Get the first page of transactions, the statistics and the price
/// histogram for `month` at the same time.
///
/// The three queries run as separate blocking tasks. The transactions use
/// the default page and page size, no search text, and treat an absent month
/// as any month, the same as a plain transactions request would. The
/// statistics and histogram match nothing without a month.
///
/// # Errors
/// Returns [Error::CompositionError] holding the first error to occur. The
/// other queries are left to finish and their results are discarded.
pub async fn combined<S: TransactionStore>(
    store: &S,
    month: Option<String>,
    pagination_config: &PaginationConfig,
) -> Result<CombinedData, Error> {
    let month_filter = MonthParams {
        month: month.clone(),
    }
    .month_filter();

    let transactions_task = spawn_blocking({
        let store = store.clone();
        let pagination_config = pagination_config.clone();
        move || list_transactions(&store, &ListParams::for_month(month), &pagination_config)
    });
    let statistics_task = spawn_blocking({
        let store = store.clone();
        move || statistics(&store, month_filter)
    });
    let chart_task = spawn_blocking({
        let store = store.clone();
        move || price_distribution(&store, month_filter)
    });

    let (transactions, statistics, chart) =
        tokio::try_join!(join(transactions_task), join(statistics_task), join(chart_task))
            .map_err(|error| Error::CompositionError(Box::new(error)))?;

    Ok(CombinedData {
        transactions,
        statistics,
        chart,
    })
}

/// Wait for a blocking task and flatten its result.
async fn join<T>(handle: JoinHandle<Result<T, Error>>) -> Result<T, Error> {
    handle
        .await
        .map_err(|error| Error::BackgroundTaskError(error.to_string()))?
}

/// The state needed for the combined overview.
#[derive(Debug, Clone)]
pub struct CombinedState<S: TransactionStore> {
    /// The store to query transactions from.
    pub transaction_store: S,
    /// The defaults for page number and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CombinedState<SQLiteTransactionStore> {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Route handler for the overview of a month.
pub async fn get_combined<S: TransactionStore>(
    State(state): State<CombinedState<S>>,
    Query(params): Query<MonthParams>,
) -> Response {
    match combined(
        &state.transaction_store,
        params.month.clone(),
        &state.pagination_config,
    )
    .await
    {
        Ok(data) => Json(data).into_response(),
        Err(error) => {
            tracing::error!("could not combine data for {params:?}: {error}");
            error.into_json_response("Error fetching combined data")
        }
    }
}

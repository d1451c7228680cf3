//! Paginated search over transactions and the route handler that serves it.

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    pagination::{Page, PaginationConfig},
};

use super::{MonthFilter, SQLiteTransactionStore, Transaction, TransactionFilter, TransactionStore};

/// The query parameters for listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListParams {
    /// The page to return, starting from one.
    pub page: Option<u64>,
    /// The maximum number of transactions per page.
    pub limit: Option<u64>,
    /// Only return transactions whose title, description or category
    /// contains this text.
    pub search: Option<String>,
    /// Only return transactions sold in this month, e.g. "March".
    pub month: Option<String>,
}

impl ListParams {
    /// The parameters for the first page of transactions in `month`.
    pub fn for_month(month: Option<String>) -> Self {
        Self {
            month,
            ..Default::default()
        }
    }
}

/// A page of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The transactions on the page.
    pub transactions: Vec<Transaction>,
    /// The number of pages needed to show every matching transaction.
    pub total_pages: u64,
    /// The page number of this page.
    pub current_page: u64,
}

/// Get a page of the transactions that match `params`.
///
/// The search text is always part of the filter, an absent search matches
/// everything. An absent or empty month matches any month, while an
/// unrecognized month name matches nothing.
///
/// # Errors
/// Returns an error if the store could not be queried.
pub fn list_transactions(
    store: &impl TransactionStore,
    params: &ListParams,
    pagination_config: &PaginationConfig,
) -> Result<TransactionPage, Error> {
    let page = Page::new(params.page, params.limit, pagination_config);
    let filter = TransactionFilter {
        search: Some(params.search.clone().unwrap_or_default()),
        month: MonthFilter::optional(params.month.as_deref()),
        sold: None,
    };

    let transactions = store.find(&filter, page.size, page.offset())?;
    let count = store.count(&filter)?;

    Ok(TransactionPage {
        transactions,
        total_pages: page.count(count),
        current_page: page.number,
    })
}

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The store to query transactions from.
    pub transaction_store: SQLiteTransactionStore,
    /// The defaults for page number and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Route handler for searching transactions one page at a time.
pub async fn get_transactions(
    State(state): State<TransactionsState>,
    Query(params): Query<ListParams>,
) -> Response {
    match list_transactions(&state.transaction_store, &params, &state.pagination_config) {
        Ok(page) => Json(page).into_response(),
        Err(error) => {
            tracing::error!("could not list transactions for {params:?}: {error}");
            error.into_json_response("Error fetching transactions")
        }
    }
}

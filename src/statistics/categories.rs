//! Per-category transaction counts for bar and pie charts.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{
        GroupKey, Grouping, MonthFilter, SQLiteTransactionStore, TransactionFilter,
        TransactionStore,
    },
};

use super::MonthParams;

/// Category names and their transaction counts as parallel lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// The category names in alphabetical order.
    pub labels: Vec<String>,
    /// The number of transactions in each category of `labels`.
    pub data: Vec<u64>,
}

/// Count the transactions in `month` per category.
///
/// # Errors
/// Returns an error if the store could not be queried.
pub fn category_counts(
    store: &impl TransactionStore,
    month: MonthFilter,
) -> Result<CategoryCounts, Error> {
    let groups = store.aggregate(
        &TransactionFilter::for_month(month),
        &Grouping::Category,
        false,
    )?;

    let (labels, data) = groups
        .into_iter()
        .filter_map(|group| match group.key {
            GroupKey::Category(category) => Some((category, group.count)),
            _ => None,
        })
        .unzip();

    Ok(CategoryCounts { labels, data })
}

/// Route handler for the bar chart of categories in a month.
pub async fn get_bar_chart_data(
    State(store): State<SQLiteTransactionStore>,
    Query(params): Query<MonthParams>,
) -> Response {
    category_counts_response(&store, &params, "Error fetching bar chart data")
}

/// Route handler for the pie chart of categories in a month.
///
/// Serves the same data as [get_bar_chart_data].
pub async fn get_pie_chart_data(
    State(store): State<SQLiteTransactionStore>,
    Query(params): Query<MonthParams>,
) -> Response {
    category_counts_response(&store, &params, "Error fetching pie chart data")
}

fn category_counts_response(
    store: &SQLiteTransactionStore,
    params: &MonthParams,
    error_message: &str,
) -> Response {
    match category_counts(store, params.month_filter()) {
        Ok(counts) => Json(counts).into_response(),
        Err(error) => {
            tracing::error!("could not count categories for {params:?}: {error}");
            error.into_json_response(error_message)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use time::{Month, macros::datetime};

    use crate::{
        endpoints,
        test_utils::{get_test_store, january_transaction},
        transaction::{MonthFilter, NewTransaction, SQLiteTransactionStore, TransactionStore},
    };

    use super::{CategoryCounts, category_counts, get_bar_chart_data, get_pie_chart_data};

    fn store_with_categories() -> SQLiteTransactionStore {
        let store = get_test_store();
        store
            .insert_many(vec![
                january_transaction("ring", 10.0).category("jewelery"),
                january_transaction("monitor", 200.0).category("electronics"),
                january_transaction("necklace", 30.0).category("jewelery"),
                NewTransaction::build("jacket", 55.0, datetime!(2023-02-01 10:00 UTC))
                    .category("men's clothing"),
            ])
            .unwrap();
        store
    }

    #[test]
    fn counts_categories_in_month() {
        let store = store_with_categories();

        let got = category_counts(&store, MonthFilter::Month(Month::January)).unwrap();

        assert_eq!(
            got,
            CategoryCounts {
                labels: vec!["electronics".to_owned(), "jewelery".to_owned()],
                data: vec![1, 2],
            }
        );
    }

    #[test]
    fn month_without_transactions_has_no_categories() {
        let store = store_with_categories();

        let got = category_counts(&store, MonthFilter::Month(Month::December)).unwrap();

        assert_eq!(got, CategoryCounts::default());
    }

    #[tokio::test]
    async fn bar_and_pie_chart_data_are_identical() {
        let app = Router::new()
            .route(endpoints::BAR_CHART_DATA, get(get_bar_chart_data))
            .route(endpoints::PIE_CHART_DATA, get(get_pie_chart_data))
            .with_state(store_with_categories());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let bar = server
            .get(endpoints::BAR_CHART_DATA)
            .add_query_param("month", "January")
            .await;
        let pie = server
            .get(endpoints::PIE_CHART_DATA)
            .add_query_param("month", "January")
            .await;

        bar.assert_status_ok();
        pie.assert_status_ok();
        bar.assert_json(&serde_json::json!({
            "labels": ["electronics", "jewelery"],
            "data": [1, 2],
        }));
        assert_eq!(bar.json::<CategoryCounts>(), pie.json::<CategoryCounts>());
    }
}

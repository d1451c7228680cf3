//! Price histograms for bar charts.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::{
        GroupKey, Grouping, MonthFilter, SQLiteTransactionStore, TransactionFilter,
        TransactionStore,
    },
};

use super::MonthParams;

/// The boundaries of the price buckets.
///
/// Each bucket includes its lower boundary and excludes its upper boundary,
/// the last bucket has no upper limit.
pub const PRICE_BOUNDARIES: [f64; 11] = [
    0.0,
    100.0,
    200.0,
    300.0,
    400.0,
    500.0,
    600.0,
    700.0,
    800.0,
    900.0,
    f64::INFINITY,
];

const OTHER_LABEL: &str = "Other";

/// The number of transactions with a price in a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBucket {
    /// The key of the bucket: its lower boundary, or "Other" for prices
    /// outside every bucket.
    #[serde(rename = "_id")]
    pub id: Value,
    /// A display label for the range, e.g. "100 - 200".
    pub label: String,
    /// The smallest price in the bucket, `None` for the "Other" bucket.
    pub lower_bound: Option<f64>,
    /// The price the bucket stops at (exclusive), `None` if the bucket has
    /// no upper limit.
    pub upper_bound: Option<f64>,
    /// The number of transactions in the bucket.
    pub count: u64,
}

/// A price histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDistribution {
    /// The buckets in order of increasing price.
    pub price_distribution: Vec<PriceBucket>,
}

/// Count the transactions in `month` per price bucket.
///
/// Every bucket in [PRICE_BOUNDARIES] is listed, including empty ones.
/// Transactions with a price outside every bucket (i.e. a negative price)
/// are counted in an "Other" bucket at the end, which is only listed if it
/// is not empty.
///
/// # Errors
/// Returns an error if the store could not be queried.
pub fn price_distribution(
    store: &impl TransactionStore,
    month: MonthFilter,
) -> Result<PriceDistribution, Error> {
    let groups = store.aggregate(
        &TransactionFilter::for_month(month),
        &Grouping::PriceBucket(PRICE_BOUNDARIES.to_vec()),
        false,
    )?;

    let mut buckets: Vec<PriceBucket> = PRICE_BOUNDARIES
        .windows(2)
        .map(|window| new_bucket(window[0], window[1]))
        .collect();
    let mut other_count = 0;

    for group in groups {
        match group.key {
            GroupKey::Bucket(index) if index < buckets.len() => buckets[index].count = group.count,
            _ => other_count += group.count,
        }
    }

    if other_count > 0 {
        buckets.push(PriceBucket {
            id: json!(OTHER_LABEL),
            label: OTHER_LABEL.to_owned(),
            lower_bound: None,
            upper_bound: None,
            count: other_count,
        });
    }

    Ok(PriceDistribution {
        price_distribution: buckets,
    })
}

fn new_bucket(lower: f64, upper: f64) -> PriceBucket {
    let (label, upper_bound) = if upper.is_infinite() {
        (format!("{lower} - above"), None)
    } else {
        (format!("{lower} - {upper}"), Some(upper))
    };

    PriceBucket {
        id: bucket_id(lower),
        label,
        lower_bound: Some(lower),
        upper_bound,
        count: 0,
    }
}

/// Whole boundaries are written as integers, e.g. `100` rather than `100.0`.
fn bucket_id(lower: f64) -> Value {
    if lower.fract() == 0.0 && lower.abs() < i64::MAX as f64 {
        json!(lower as i64)
    } else {
        json!(lower)
    }
}

/// Route handler for the price histogram of a month.
pub async fn get_price_distribution(
    State(store): State<SQLiteTransactionStore>,
    Query(params): Query<MonthParams>,
) -> Response {
    match price_distribution(&store, params.month_filter()) {
        Ok(distribution) => Json(distribution).into_response(),
        Err(error) => {
            tracing::error!("could not compute price distribution for {params:?}: {error}");
            error.into_json_response("Error fetching chart data")
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use time::Month;

    use crate::{
        endpoints,
        test_utils::{get_test_store, january_transaction, seed_january_scenario},
        transaction::{MonthFilter, TransactionFilter, TransactionStore},
    };

    use super::{PriceDistribution, get_price_distribution, price_distribution};

    fn counts(distribution: &PriceDistribution) -> Vec<u64> {
        distribution
            .price_distribution
            .iter()
            .map(|bucket| bucket.count)
            .collect()
    }

    #[test]
    fn counts_january_scenario() {
        let store = seed_january_scenario();

        let got = price_distribution(&store, MonthFilter::Month(Month::January)).unwrap();

        assert_eq!(counts(&got), vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn buckets_are_labelled_in_ascending_order() {
        let store = get_test_store();

        let got = price_distribution(&store, MonthFilter::Month(Month::January)).unwrap();

        let labels: Vec<_> = got
            .price_distribution
            .iter()
            .map(|bucket| bucket.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "0 - 100",
                "100 - 200",
                "200 - 300",
                "300 - 400",
                "400 - 500",
                "500 - 600",
                "600 - 700",
                "700 - 800",
                "800 - 900",
                "900 - above",
            ]
        );
        let last = got.price_distribution.last().unwrap();
        assert_eq!(last.lower_bound, Some(900.0));
        assert_eq!(last.upper_bound, None);
    }

    #[test]
    fn boundary_prices_go_in_the_upper_bucket() {
        let store = get_test_store();
        store
            .insert_many(vec![
                january_transaction("100", 100.0),
                january_transaction("899.99", 899.99),
                january_transaction("900", 900.0),
            ])
            .unwrap();

        let got = price_distribution(&store, MonthFilter::Month(Month::January)).unwrap();

        assert_eq!(counts(&got), vec![0, 1, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn negative_prices_go_in_other_bucket() {
        let store = get_test_store();
        store
            .insert_many(vec![
                january_transaction("refund", -20.0),
                january_transaction("cheap", 5.0),
            ])
            .unwrap();

        let got = price_distribution(&store, MonthFilter::Month(Month::January)).unwrap();

        let other = got.price_distribution.last().unwrap();
        assert_eq!(got.price_distribution.len(), 11);
        assert_eq!(other.label, "Other");
        assert_eq!(other.count, 1);
        assert_eq!(other.lower_bound, None);
        assert_eq!(other.id, "Other");
    }

    #[test]
    fn bucket_counts_sum_to_month_count() {
        let store = get_test_store();
        store
            .insert_many(
                [-5.0, 0.0, 42.0, 150.0, 333.3, 650.0, 901.0, 12_000.0]
                    .iter()
                    .map(|price| january_transaction("item", *price))
                    .collect(),
            )
            .unwrap();
        let month = MonthFilter::Month(Month::January);

        let got = price_distribution(&store, month).unwrap();

        let month_count = store.count(&TransactionFilter::for_month(month)).unwrap();
        assert_eq!(counts(&got).iter().sum::<u64>(), month_count);
    }

    #[tokio::test]
    async fn get_price_distribution_returns_json() {
        let app = Router::new()
            .route(endpoints::CHART, get(get_price_distribution))
            .with_state(seed_january_scenario());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .get(endpoints::CHART)
            .add_query_param("month", "january")
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        let buckets = json["priceDistribution"].as_array().unwrap();
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0]["_id"], 0);
        assert_eq!(buckets[1]["_id"], 100);
        assert_eq!(buckets[9]["_id"], 900);
        assert_eq!(buckets[0]["label"], "0 - 100");
        assert_eq!(buckets[0]["count"], 1);
        assert_eq!(buckets[9]["upperBound"], serde_json::Value::Null);
    }
}

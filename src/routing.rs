//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    combined::get_combined,
    endpoints,
    seed::get_initialize,
    statistics::{get_bar_chart_data, get_pie_chart_data, get_price_distribution, get_statistics},
    transaction::{SQLiteTransactionStore, get_transactions},
};

/// Return a router with all the app's routes.
///
/// Requests from any origin are allowed.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INITIALIZE, get(get_initialize))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(endpoints::CHART, get(get_price_distribution))
        .route(endpoints::BAR_CHART_DATA, get(get_bar_chart_data))
        .route(endpoints::PIE_CHART_DATA, get(get_pie_chart_data))
        .route(
            endpoints::COMBINED,
            get(get_combined::<SQLiteTransactionStore>),
        )
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not Found" })),
    )
        .into_response()
}

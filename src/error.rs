//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The remote dataset could not be fetched or did not contain a JSON
    /// array of transactions.
    ///
    /// Holds the error message from the HTTP client or JSON decoder.
    #[error("could not fetch the seed dataset: {0}")]
    FetchError(String),

    /// Writing to the transaction store failed.
    #[error("could not write to the transaction store: {0}")]
    StoreWriteError(rusqlite::Error),

    /// Reading from the transaction store failed.
    #[error("could not query the transaction store: {0}")]
    StoreQueryError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Reseeding the store failed.
    ///
    /// The store is left in whatever state the failed step left it in, e.g.
    /// empty if the insert failed after the delete succeeded.
    #[error("could not reseed the transaction store: {0}")]
    SeedError(Box<Error>),

    /// One of the queries behind a combined response failed.
    ///
    /// Holds the first failure, the results of the other queries are
    /// discarded.
    #[error("could not build the combined response: {0}")]
    CompositionError(Box<Error>),

    /// A blocking task panicked or was cancelled before it returned.
    #[error("background task failed: {0}")]
    BackgroundTaskError(String),
}

impl Error {
    /// Convert the error into a 500 response with a JSON body of the form
    /// `{"message": message, "error": <error description>}`.
    ///
    /// The client gets no distinction between error kinds, the details are
    /// only meant for debugging.
    pub(crate) fn into_json_response(self, message: &str) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": message,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_content_type, json_body};

    use super::Error;

    #[tokio::test]
    async fn json_response_contains_message_and_error() {
        let response = Error::FetchError("connection refused".to_owned())
            .into_json_response("Error fetching transactions");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "application/json");
        let body = json_body(response).await;
        assert_eq!(body["message"], "Error fetching transactions");
        assert_eq!(
            body["error"],
            "could not fetch the seed dataset: connection refused"
        );
    }

    #[test]
    fn composition_error_displays_inner_error() {
        let error = Error::CompositionError(Box::new(Error::DatabaseLockError));

        assert_eq!(
            error.to_string(),
            "could not build the combined response: could not acquire the database lock"
        );
    }
}

//! Finance Tracker is a web app for recording income, expenses and
//! investments and summarising them on a dashboard.
//!
//! This library provides a JSON API and HTML pages served from the same router.
//! The aggregation pipeline lives in [aggregation] and [chart_data] and is
//! independent of the web and storage layers.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use time::Date;
use tokio::signal;

pub mod aggregation;
mod alert;
mod analytics;
mod app_state;
pub mod chart_data;
mod csv_import;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod export;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more of `date`, `type`, `source` or `amount` was not provided.
    #[error("Missing required fields")]
    MissingFields,

    /// The transaction type was not one of income, expense or investment.
    ///
    /// Callers should pass in the rejected type string.
    #[error("Invalid transaction type")]
    InvalidTransactionType(String),

    /// The amount was a valid number, but below zero.
    #[error("Amount must be positive")]
    NegativeAmount(Decimal),

    /// The amount could not be interpreted as a number.
    ///
    /// Callers should pass in the text that failed to parse.
    #[error("Invalid amount")]
    InvalidAmount(String),

    /// The date was not a calendar date in the format `YYYY-MM-DD`.
    ///
    /// Callers should pass in the text that failed to parse.
    #[error("Invalid date")]
    InvalidDate(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist
    #[error("Transaction not found")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// A file field in the multipart form had no file name, i.e. the user
    /// submitted the form without choosing a file.
    #[error("No file selected")]
    NoFileSelected,

    /// The multipart form did not contain a CSV file.
    #[error("File type must be CSV.")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The CSV header did not include every required column.
    ///
    /// Holds the names of the missing columns.
    #[error("Invalid file format. Must include: date, type, source, amount")]
    MissingColumns(Vec<String>),

    /// Every row in an imported file was rejected.
    #[error("No valid transactions found in file")]
    NoValidTransactions,

    /// Transactions could not be written out as CSV.
    #[error("could not write CSV: {0}")]
    CSVWriteError(String),

    /// A date could not be formatted as text.
    #[error("could not format the date {0}")]
    DateFormatError(Date),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundPage.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by the client sending bad transaction data.
    fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::MissingFields
                | Error::InvalidTransactionType(_)
                | Error::NegativeAmount(_)
                | Error::InvalidAmount(_)
                | Error::InvalidDate(_)
        )
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Validation errors become 400 Bad Request, missing transactions 404 Not
    /// Found, and everything else a 500 Internal Server Error with a generic
    /// message.
    fn into_json_response(self) -> Response {
        let status_code = match &self {
            error if error.is_validation_error() => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            Error::NotFound => "Transaction not found".to_owned(),
            error if status_code == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred".to_owned()
            }
            error => error.to_string(),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }

    fn into_alert_response(self) -> Response {
        match self {
            error if error.is_validation_error() => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not add transaction".to_owned(),
                    details: error.to_string(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingTransaction | Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            error @ (Error::NoFileSelected
            | Error::NotCSV
            | Error::MissingColumns(_)
            | Error::NoValidTransactions
            | Error::MultipartError(_)) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: error.to_string(),
                }
                .into_html(),
            )
                .into_response(),
            error @ Error::InvalidCSV(_) => {
                tracing::debug!("Rejected CSV upload: {error}");
                (
                    StatusCode::BAD_REQUEST,
                    Alert::Error {
                        message: "Failed to parse CSV".to_owned(),
                        details: "Check that the file is a valid CSV with the columns \
                            date, type, source, amount and optionally description."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::Value;

    use crate::Error;

    async fn json_body(error: Error) -> (StatusCode, Value) {
        let response = error.into_json_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = json_body(Error::NegativeAmount(Decimal::NEGATIVE_ONE)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount must be positive");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (status, body) = json_body(Error::DeleteMissingTransaction).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Transaction not found");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = json_body(Error::SqlError(rusqlite::Error::InvalidColumnIndex(0))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred");
    }
}

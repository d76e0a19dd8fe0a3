//! JSON endpoints for listing, adding and deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{TransactionPayload, create_transaction, delete_transaction, get_transactions},
};

/// The state needed to read and write transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The maximum number of transactions to return. Zero means no limit.
    pub limit: Option<u32>,
}

/// A route handler that responds with transactions as JSON, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let transactions = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_transactions(query.limit, &connection));

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for adding a transaction from a JSON body.
///
/// Responds with 201 Created and the new ID, or 400 Bad Request if the
/// transaction is invalid.
pub async fn create_transaction_api_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::debug!("Rejected transaction JSON: {rejection}");
            return Error::MissingFields.into_json_response();
        }
    };

    let new_transaction = match payload.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => return error.into_json_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Transaction added successfully",
                "id": transaction.id,
            })),
        )
            .into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for deleting a transaction by ID.
pub async fn delete_transaction_api_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => Json(json!({ "message": "Transaction deleted successfully" })).into_response(),
        Err(error) => error.into_json_response(),
    }
}

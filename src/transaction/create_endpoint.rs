//! Defines the endpoint for adding a transaction from the dashboard form.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error, endpoints,
    transaction::{TransactionPayload, TransactionState, create_transaction},
};

/// The form data for creating a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// The date input, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// The selected transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The source text input.
    pub source: Option<String>,
    /// The amount text input.
    pub amount: Option<String>,
    /// The description text input.
    pub description: Option<String>,
}

impl From<TransactionForm> for TransactionPayload {
    fn from(form: TransactionForm) -> Self {
        Self {
            date: form.date,
            transaction_type: form.transaction_type,
            source: form.source,
            amount: form.amount.map(Value::String),
            description: form.description,
        }
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let new_transaction = match TransactionPayload::from(form).validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected transaction form: {error:?}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(new_transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

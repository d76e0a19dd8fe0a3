//! Download every transaction as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use time::{
    OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    AppState, Error, endpoints,
    transaction::{Transaction, get_transactions},
};

const FILE_NAME_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// The header row of exported files.
pub const EXPORT_HEADER: [&str; 7] = [
    "id",
    "date",
    "type",
    "source",
    "amount",
    "description",
    "created_at",
];

/// The state needed for exporting transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler that responds with every transaction as a CSV attachment,
/// newest first.
///
/// Redirects to the dashboard when there is nothing to export.
pub async fn export_transactions(State(state): State<ExportState>) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions(None, &connection)?
    };

    if transactions.is_empty() {
        return Ok(Redirect::to(endpoints::DASHBOARD_VIEW).into_response());
    }

    let csv = transactions_to_csv(&transactions)?;
    let file_name = export_file_name(OffsetDateTime::now_utc())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

fn export_file_name(now: OffsetDateTime) -> Result<String, Error> {
    let timestamp = now
        .format(FILE_NAME_TIMESTAMP_FORMAT)
        .map_err(|_| Error::DateFormatError(now.date()))?;

    Ok(format!("finance_export_{timestamp}.csv"))
}

/// Write `transactions` as CSV text with [EXPORT_HEADER] as the first row.
///
/// # Errors
/// Returns [Error::CSVWriteError] if a row could not be written.
fn transactions_to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|error| Error::CSVWriteError(error.to_string()))?;

    for transaction in transactions {
        let created_at = transaction
            .created_at
            .format(&Rfc3339)
            .map_err(|_| Error::DateFormatError(transaction.created_at.date()))?;

        writer
            .write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.transaction_type.to_string(),
                transaction.source.clone(),
                transaction.amount.to_string(),
                transaction.description.clone().unwrap_or_default(),
                created_at,
            ])
            .map_err(|error| Error::CSVWriteError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CSVWriteError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CSVWriteError(error.to_string()))
}

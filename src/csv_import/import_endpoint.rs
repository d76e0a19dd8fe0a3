use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, csv_import::csv::parse_transactions_csv,
    transaction::create_transactions,
};

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for saving transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for importing transactions from uploaded CSV files.
///
/// Every file is parsed before anything is saved, and all transactions are
/// saved in a single database transaction.
pub async fn import_transactions(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Response {
    let start_time = std::time::Instant::now();
    let mut transactions = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::debug!("Could not read multipart form: {error}");
                return Error::MultipartError(error.body_text()).into_alert_response();
            }
        };

        let csv_data = match parse_multipart_field(field).await {
            Ok(csv_data) => csv_data,
            Err(error) => return error.into_alert_response(),
        };

        match parse_transactions_csv(&csv_data) {
            Ok(parsed) => transactions.extend(parsed),
            Err(error) => return error.into_alert_response(),
        }
    }

    if transactions.is_empty() {
        return Error::NoValidTransactions.into_alert_response();
    }

    let imported_count = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        match create_transactions(transactions, &connection) {
            Ok(count) => count,
            Err(error) => {
                tracing::error!("Failed to import transactions: {error}");
                return error.into_alert_response();
            }
        }
    };

    tracing::info!(
        "Imported {imported_count} transactions in {}ms",
        start_time.elapsed().as_millis()
    );

    (
        StatusCode::CREATED,
        Alert::Success {
            message: format!("{imported_count} transactions uploaded successfully!"),
            details: String::new(),
        }
        .into_html(),
    )
        .into_response()
}

/// Whether a multipart field holds a CSV file, judged by its content type or file name.
fn is_csv_field(field: &Field<'_>) -> bool {
    let has_csv_content_type = field.content_type() == Some("text/csv");
    let has_csv_extension = field
        .file_name()
        .is_some_and(|name| name.to_lowercase().ends_with(".csv"));

    has_csv_content_type || has_csv_extension
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    if field.file_name().is_none_or(str::is_empty) {
        return Err(Error::NoFileSelected);
    }

    if !is_csv_field(&field) {
        return Err(Error::NotCSV);
    }

    let file_name = field.file_name().unwrap_or_default().to_owned();
    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

#[cfg(test)]
mod import_transactions_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{FromRequest, Multipart, State},
        http::{Request, StatusCode},
        response::Response,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{alert_text, assert_content_type, assert_valid_html, parse_html_fragment},
        transaction::{TransactionType, count_transactions, get_transactions},
    };

    use super::{ImportState, import_transactions};

    const VALID_CSV: &str = "date,type,source,amount,description\n\
        2024-01-05,income,Salary,5000,January pay\n\
        2024-01-06,expense,Groceries,120.50,\n\
        2024-01-07,investment,Index Fund,300,\n\
        2024-01-08,gift,Grandma,50,\n";

    fn get_test_state() -> ImportState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ImportState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn transaction_count(state: &ImportState) -> u32 {
        let connection = state.db_connection.lock().unwrap();
        count_transactions(&connection).expect("Could not count transactions")
    }

    #[tokio::test]
    async fn imports_valid_rows() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("text/csv", "ledger.csv", VALID_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_content_type(&response, "text/html; charset=utf-8");
        assert_alert_message(response, "3 transactions uploaded successfully!").await;
        assert_eq!(transaction_count(&state), 3);

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions(None, &connection).unwrap();
        assert_eq!(transactions[0].transaction_type, TransactionType::Investment);
        assert_eq!(transactions[2].description.as_deref(), Some("January pay"));
    }

    #[tokio::test]
    async fn imports_multiple_files() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[
                ("text/csv", "a.csv", VALID_CSV),
                ("text/csv", "b.csv", VALID_CSV),
            ])
            .await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(transaction_count(&state), 6);
    }

    #[tokio::test]
    async fn accepts_csv_file_name_without_csv_content_type() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("application/octet-stream", "LEDGER.CSV", VALID_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(transaction_count(&state), 3);
    }

    #[tokio::test]
    async fn invalid_file_type_renders_error_message() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("text/plain", "notes.txt", VALID_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_alert_message(response, "File type must be CSV.").await;
        assert_eq!(transaction_count(&state), 0);
    }

    #[tokio::test]
    async fn empty_file_name_renders_no_file_selected() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("application/octet-stream", "", "")]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_alert_message(response, "No file selected").await;
        assert_eq!(transaction_count(&state), 0);
    }

    #[tokio::test]
    async fn missing_columns_renders_error_message() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("text/csv", "ledger.csv", "date,amount\n2024-01-01,1\n")])
                .await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_alert_message(
            response,
            "Invalid file format. Must include: date, type, source, amount",
        )
        .await;
        assert_eq!(transaction_count(&state), 0);
    }

    #[tokio::test]
    async fn no_valid_rows_renders_error_message() {
        let state = get_test_state();
        let csv = "date,type,source,amount\n2024-01-01,gift,Grandma,50\n";

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[("text/csv", "ledger.csv", csv)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_alert_message(response, "No valid transactions found in file").await;
        assert_eq!(transaction_count(&state), 0);
    }

    #[tokio::test]
    async fn bad_second_file_imports_nothing() {
        let state = get_test_state();

        let response = import_transactions(
            State(state.clone()),
            must_make_multipart(&[
                ("text/csv", "a.csv", VALID_CSV),
                ("text/plain", "b.txt", "foo"),
            ])
            .await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transaction_count(&state), 0);
    }

    #[tokio::test]
    async fn sql_error_renders_error_message() {
        // No tables, so inserts fail.
        let conn =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        let state = ImportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = import_transactions(
            State(state),
            must_make_multipart(&[("text/csv", "ledger.csv", VALID_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_alert_message(response, "Something went wrong").await;
    }

    async fn assert_alert_message(response: Response, want_message: &str) {
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let alert = alert_text(&html);
        assert_eq!(alert.first().map(String::as_str), Some(want_message));
    }

    /// Build a multipart form with one `files` field per `(content type, file name, data)`.
    async fn must_make_multipart(files: &[(&str, &str, &str)]) -> Multipart {
        let boundary = "MY_BOUNDARY123456789";
        let boundary_start = format!("--{boundary}");
        let boundary_end = format!("--{boundary}--");

        let mut lines: Vec<String> = Vec::new();

        for (content_type, file_name, data) in files {
            lines.push(boundary_start.clone());
            lines.push(format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\";"
            ));
            lines.push(format!("Content-Type: {content_type}"));
            lines.push("".to_owned());
            lines.push(data.to_string());
        }

        lines.push(boundary_end);

        let data = lines.join("\r\n").into_bytes();

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::UPLOAD)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(data.into())
            .unwrap();

        Multipart::from_request(request, &{}).await.unwrap()
    }
}

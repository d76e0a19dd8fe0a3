//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::{get_analytics_data, get_analytics_page},
    csv_import::import_transactions,
    dashboard::{get_dashboard_data, get_dashboard_page},
    endpoints,
    export::export_transactions,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_api_endpoint, create_transaction_endpoint,
        delete_transaction_api_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// The largest request body accepted, in bytes.
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Return a router with all the app's routes.
///
/// Files in `static_dir` are served under [endpoints::STATIC].
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let page_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::EXPORT, get(export_transactions));

    let htmx_routes = Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::UPLOAD, post(import_transactions));

    let api_routes = Router::new()
        .route(
            endpoints::API_TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_api_endpoint),
        )
        .route(
            endpoints::API_TRANSACTION,
            delete(delete_transaction_api_endpoint),
        )
        .route(endpoints::API_DASHBOARD_DATA, get(get_dashboard_data))
        .route(endpoints::API_ANALYTICS, get(get_analytics_data));

    page_routes
        .merge(htmx_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use std::path::Path;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        let app = build_router(state, Path::new("static/"));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_load() {
        let server = get_test_server();

        for endpoint in [endpoints::DASHBOARD_VIEW, endpoints::ANALYTICS_VIEW] {
            server.get(endpoint).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_of_empty_ledger_redirects() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");
    }

    #[tokio::test]
    async fn added_transaction_shows_up_everywhere() {
        let server = get_test_server();

        server
            .post(endpoints::API_TRANSACTIONS)
            .json(&json!({
                "date": "2024-01-05",
                "type": "income",
                "source": "Salary",
                "amount": "2500.50",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let transactions: Value = server.get(endpoints::API_TRANSACTIONS).await.json();
        assert_eq!(transactions.as_array().map(Vec::len), Some(1));

        server
            .get(endpoints::API_DASHBOARD_DATA)
            .await
            .assert_json(&json!({
                "income": 2500.5,
                "expense": 0.0,
                "investment": 0.0,
                "net_savings": 2500.5,
            }));

        let summary: Value = server.get(endpoints::API_ANALYTICS).await.json();
        assert_eq!(summary["total_transactions"], 1);
        assert_eq!(summary["monthly_summary"]["2024-01"]["income"], 2500.5);

        let export = server.get(endpoints::EXPORT).await;
        export.assert_status_ok();
        assert!(export.text().contains("Salary"));
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let server = get_test_server();

        server.get("/static/main.css").await.assert_status_ok();
    }
}

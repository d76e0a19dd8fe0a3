//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The JSON endpoint for the dashboard totals
//! - HTML view functions for rendering the dashboard UI

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{Totals, breakdown_by_source, monthly_series, totals_by_type},
    chart_data,
    dashboard::{
        cards::totals_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT, TREND_CHART_ID, breakdown_chart, breakdown_chart_id,
            charts_script, charts_view, trend_chart,
        },
        forms::{add_transaction_form, import_export_form},
        tables::{RECENT_TRANSACTIONS_LIMIT, recent_transactions_table},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{Transaction, TransactionType, get_transactions, get_transactions_by_date},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    totals: Totals,
    charts: Vec<DashboardChart>,
    recent_transactions: Vec<Transaction>,
}

/// Display a page with an overview of the ledger.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let (transactions, recent_transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_transactions_by_date(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
        let recent_transactions = get_transactions(Some(RECENT_TRANSACTIONS_LIMIT), &connection)
            .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

        (transactions, recent_transactions)
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let data = build_dashboard_data(&transactions, recent_transactions);

    Ok(dashboard_view(nav_bar, &data).into_response())
}

/// Responds with the total of each transaction type and net savings as JSON.
pub async fn get_dashboard_data(State(state): State<DashboardState>) -> Response {
    let transactions = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_transactions_by_date(&connection));

    match transactions {
        Ok(transactions) => Json(totals_by_type(&transactions)).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// Aggregates the ledger and builds the charts.
///
/// A breakdown chart is only built for types that have transactions, and the
/// trend chart is skipped when there is nothing to plot.
fn build_dashboard_data(
    transactions: &[Transaction],
    recent_transactions: Vec<Transaction>,
) -> DashboardData {
    let totals = totals_by_type(transactions);

    let mut charts: Vec<DashboardChart> = TransactionType::ALL
        .into_iter()
        .filter_map(|transaction_type| {
            let breakdown = breakdown_by_source(transactions, transaction_type);
            let data = chart_data::breakdown_chart(&breakdown)?;

            Some(DashboardChart {
                id: breakdown_chart_id(transaction_type),
                options: breakdown_chart(transaction_type, &data).to_string(),
            })
        })
        .collect();

    if let Some(data) = chart_data::trend_chart(&monthly_series(transactions)) {
        charts.push(DashboardChart {
            id: TREND_CHART_ID,
            options: trend_chart(&data).to_string(),
        });
    }

    DashboardData {
        totals,
        charts,
        recent_transactions,
    }
}

/// Renders the dashboard page when no transaction data exists.
///
/// Displays a prompt along with the forms for adding or importing transactions.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p class="mb-8"
            {
                "Charts will show up here once you add some transactions.
                Add one below or import a CSV file."
            }

            div class="w-full max-w-screen-xl grid grid-cols-1 lg:grid-cols-2 gap-4"
            {
                (add_transaction_form())
                (import_export_form())
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with totals, charts, recent transactions and forms.
fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (totals_cards_view(&data.totals))

            (charts_view(&data.charts))

            (recent_transactions_table(&data.recent_transactions))

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-4 mb-8"
            {
                (add_transaction_form())
                (import_export_form())
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

//! The analytics page and its JSON endpoint.
//!
//! Shows the monthly totals per transaction type, the largest income and
//! expense sources, and the number and mean amount of all transactions.

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
    aggregation::{AnalyticsSummary, MonthlySeries, SourceTotal, summarize},
    endpoints,
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    transaction::{Transaction, get_transactions_by_date},
};

/// The state needed for the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn load_transactions(state: &AnalyticsState) -> Result<Vec<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_by_date(&connection)
}

/// Display the analytics page.
pub async fn get_analytics_page(State(state): State<AnalyticsState>) -> Result<Response, Error> {
    let transactions = load_transactions(&state)?;
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW);

    if transactions.is_empty() {
        return Ok(analytics_no_data_view(nav_bar).into_response());
    }

    let summary = summarize(&transactions);

    Ok(analytics_view(nav_bar, &summary).into_response())
}

/// Responds with the [AnalyticsSummary] as JSON.
pub async fn get_analytics_data(State(state): State<AnalyticsState>) -> Response {
    match load_transactions(&state) {
        Ok(transactions) => Json(summarize(&transactions)).into_response(),
        Err(error) => error.into_json_response(),
    }
}

fn analytics_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Nothing to analyse yet..." }

            p
            {
                "Add some transactions on the "
                (link(endpoints::DASHBOARD_VIEW, "dashboard"))
                " and come back to see monthly summaries and your top sources."
            }
        }
    );

    base("Analytics", &[], &content)
}

fn analytics_view(nav_bar: NavBar, summary: &AnalyticsSummary) -> Markup {
    let nav_bar = nav_bar.into_html();
    let average = summary
        .average_transaction
        .map(format_currency)
        .unwrap_or_else(|| "-".to_owned());

    let content = html!(
        (nav_bar)

        div
            id="analytics-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            section id="overview" class="w-full grid grid-cols-1 sm:grid-cols-2 gap-4 mb-8"
            {
                div id="total-transactions" class=(CARD_STYLE)
                {
                    h3 class="text-sm font-medium text-gray-500 dark:text-gray-400"
                    {
                        "Total Transactions"
                    }
                    p class="text-2xl font-bold" { (summary.total_transactions) }
                }

                div id="average-transaction" class=(CARD_STYLE)
                {
                    h3 class="text-sm font-medium text-gray-500 dark:text-gray-400"
                    {
                        "Average Transaction"
                    }
                    p class="text-2xl font-bold" { (average) }
                }
            }

            (monthly_summary_table(&summary.monthly_summary))

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-4 mb-8"
            {
                (top_sources_list("top-income", "Top Income Sources", &summary.top_income))
                (top_sources_list("top-expenses", "Top Expenses", &summary.top_expenses))
            }
        }
    );

    base("Analytics", &[], &content)
}

fn monthly_summary_table(series: &MonthlySeries) -> Markup {
    html! {
        section id="monthly-summary" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Monthly Summary" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            @for transaction_type in series.columns() {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (transaction_type.label())
                                }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in series.rows() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) { (row.month) }
                                @for transaction_type in series.columns() {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format_currency(
                                            row.totals
                                                .get(transaction_type)
                                                .copied()
                                                .unwrap_or_default()
                                        ))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn top_sources_list(id: &str, title: &str, sources: &[SourceTotal]) -> Markup {
    html! {
        section id=(id) class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { (title) }

            @if sources.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions of this type." }
            } @else {
                ol class="space-y-2"
                {
                    @for (rank, source) in sources.iter().enumerate() {
                        li class="flex justify-between"
                        {
                            span { (rank + 1) ". " (source.source) }
                            span class="font-semibold" { (format_currency(source.total)) }
                        }
                    }
                }
            }
        }
    }
}

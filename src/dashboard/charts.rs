//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for financial data:
//! - **Breakdown charts**: a donut per transaction type, one slice per source
//! - **Trend chart**: monthly totals with one line per transaction type
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, JsFunction,
        LineStyle, Tooltip, Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    chart_data::{BreakdownChartData, TrendChartData},
    html::{HeadElement, format_currency},
    transaction::TransactionType,
};

/// The ECharts library, loaded on pages that show charts.
pub(crate) const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The line and accent colour for a transaction type.
fn type_colour(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "#10b981",
        TransactionType::Expense => "#ef4444",
        TransactionType::Investment => "#8b5cf6",
    }
}

/// Slice colours for a donut, darkest first so the largest source stands out.
fn type_palette(transaction_type: TransactionType) -> Vec<Color> {
    let shades: [&str; 6] = match transaction_type {
        TransactionType::Income => [
            "#065f46", "#047857", "#059669", "#10b981", "#34d399", "#6ee7b7",
        ],
        TransactionType::Expense => [
            "#991b1b", "#b91c1c", "#dc2626", "#ef4444", "#f87171", "#fca5a5",
        ],
        TransactionType::Investment => [
            "#5b21b6", "#6d28d9", "#7c3aed", "#8b5cf6", "#a78bfa", "#c4b5fd",
        ],
    };

    shades.into_iter().map(Color::from).collect()
}

pub(super) fn breakdown_chart_id(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "income-breakdown-chart",
        TransactionType::Expense => "expense-breakdown-chart",
        TransactionType::Investment => "investment-breakdown-chart",
    }
}

pub(super) const TREND_CHART_ID: &str = "trend-chart";

/// Renders the HTML containers for dashboard charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
///
/// # Arguments
/// * `charts` - The charts to generate initialization scripts for
///
/// # Returns
/// HeadElement containing the initialization JavaScript.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A donut chart of the sources for one transaction type.
pub(super) fn breakdown_chart(
    transaction_type: TransactionType,
    data: &BreakdownChartData,
) -> Chart {
    let slices: Vec<(f64, &str)> = data
        .values
        .iter()
        .zip(&data.labels)
        .map(|(value, label)| (value.to_f64(), label.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text(format!("{} Breakdown", transaction_type.label()))
                .subtext(format!("Total {}", format_currency(data.total)))
                .left("center"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .color(type_palette(transaction_type))
        .series(
            Pie::new()
                .name(transaction_type.label())
                .radius(vec!["40%", "70%"])
                .item_style(ItemStyle::new().border_color("#fff").border_width(2))
                .data(slices),
        )
}

/// A line chart of monthly totals with one line per transaction type.
pub(super) fn trend_chart(data: &TrendChartData) -> Chart {
    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Financial Trends")
                .subtext("Totals per month"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Month")
                .data(data.months.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Amount ($)")
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for (&transaction_type, points) in &data.series {
        let values: Vec<f64> = points.iter().map(|(_, total)| total.to_f64()).collect();
        let colour = type_colour(transaction_type);

        chart = chart.series(
            Line::new()
                .name(transaction_type.label())
                .item_style(ItemStyle::new().color(colour))
                .line_style(LineStyle::new().color(colour).width(3))
                .data(values),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

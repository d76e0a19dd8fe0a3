//! Shapes aggregated data into the label and value series that charts plot.
//!
//! No colours or styles are chosen here. A `None` result means there is
//! nothing to plot and the chart should not be drawn.

use std::collections::BTreeMap;

use crate::{
    aggregation::{MonthlySeries, SourceTotal},
    transaction::{Amount, TransactionType},
};

/// The data for a pie or donut chart of one transaction type.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownChartData {
    /// The source names, largest total first.
    pub labels: Vec<String>,
    /// The total for each label, in the same order.
    pub values: Vec<Amount>,
    /// The sum of `values`.
    pub total: Amount,
}

/// The data for a line chart with one line per transaction type.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChartData {
    /// Every month in the series as `YYYY-MM`, oldest first.
    pub months: Vec<String>,
    /// The chronological `(month, total)` points for each type that had any
    /// transactions.
    pub series: BTreeMap<TransactionType, Vec<(String, Amount)>>,
}

/// Convert a per-source breakdown into chart labels and values.
///
/// Returns `None` for an empty breakdown.
pub fn breakdown_chart(breakdown: &[SourceTotal]) -> Option<BreakdownChartData> {
    if breakdown.is_empty() {
        return None;
    }

    let labels = breakdown.iter().map(|entry| entry.source.clone()).collect();
    let values: Vec<Amount> = breakdown.iter().map(|entry| entry.total).collect();
    let total = values.iter().sum();

    Some(BreakdownChartData {
        labels,
        values,
        total,
    })
}

/// Convert a monthly series into one line per transaction type.
///
/// Types that never appear in the series get no line. Returns `None` for an
/// empty series.
pub fn trend_chart(series: &MonthlySeries) -> Option<TrendChartData> {
    if series.is_empty() {
        return None;
    }

    let months = series
        .rows()
        .iter()
        .map(|row| row.month.to_string())
        .collect();

    let series = series
        .columns()
        .iter()
        .filter_map(|&transaction_type| {
            let points = series
                .column(transaction_type)?
                .into_iter()
                .map(|(month, total)| (month.to_string(), total))
                .collect();

            Some((transaction_type, points))
        })
        .collect();

    Some(TrendChartData { months, series })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::macros::date;

    use crate::{
        aggregation::{
            breakdown_by_source, monthly_series,
            tests::{create_test_transaction, two_month_ledger},
        },
        transaction::{Amount, TransactionType},
    };

    use super::{breakdown_chart, trend_chart};

    fn amount(text: &str) -> Amount {
        Amount::from_str(text).unwrap()
    }

    #[test]
    fn breakdown_chart_values_sum_to_total() {
        let transactions = vec![
            create_test_transaction(
                1,
                date!(2024 - 01 - 01),
                TransactionType::Expense,
                "Rent",
                "1200.10",
            ),
            create_test_transaction(
                2,
                date!(2024 - 01 - 02),
                TransactionType::Expense,
                "Food",
                "300.20",
            ),
            create_test_transaction(
                3,
                date!(2024 - 01 - 03),
                TransactionType::Expense,
                "Food",
                "0.10",
            ),
        ];
        let breakdown = breakdown_by_source(&transactions, TransactionType::Expense);

        let chart = breakdown_chart(&breakdown).unwrap();

        assert_eq!(chart.labels, ["Rent", "Food"]);
        assert_eq!(chart.values, [amount("1200.10"), amount("300.30")]);
        assert_eq!(chart.total, amount("1500.40"));
        assert_eq!(chart.values.iter().sum::<Amount>(), chart.total);
    }

    #[test]
    fn empty_breakdown_has_no_chart() {
        assert_eq!(breakdown_chart(&[]), None);
    }

    #[test]
    fn absent_type_has_no_chart() {
        let breakdown = breakdown_by_source(&two_month_ledger(), TransactionType::Investment);

        assert_eq!(breakdown_chart(&breakdown), None);
    }

    #[test]
    fn trend_chart_has_a_line_per_present_type() {
        let series = monthly_series(&two_month_ledger());

        let chart = trend_chart(&series).unwrap();

        assert_eq!(chart.months, ["2023-11", "2023-12"]);
        assert_eq!(
            chart.series.keys().copied().collect::<Vec<_>>(),
            [TransactionType::Income, TransactionType::Expense]
        );
        assert_eq!(
            chart.series[&TransactionType::Expense],
            [
                ("2023-11".to_owned(), amount("400")),
                ("2023-12".to_owned(), Amount::ZERO),
            ]
        );
        assert_eq!(
            chart.series[&TransactionType::Income],
            [
                ("2023-11".to_owned(), amount("5000")),
                ("2023-12".to_owned(), amount("5200")),
            ]
        );
    }

    #[test]
    fn empty_series_has_no_chart() {
        let series = monthly_series(&[]);

        assert_eq!(trend_chart(&series), None);
    }
}

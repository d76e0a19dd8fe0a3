//! Summarises a ledger of transactions: totals per type, per-source
//! breakdowns, top sources and a month by type time series.
//!
//! Every function here is a pure function of a slice of already validated
//! transactions. An empty slice is never an error, it just produces empty or
//! zero results.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeStruct},
};
use time::Date;

use crate::transaction::{Amount, Transaction, TransactionType};

/// How many sources [top_sources] keeps unless asked for a different number.
pub const DEFAULT_TOP_N: usize = 5;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u8,
}

impl Month {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The sum of each transaction type, plus net savings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of all income.
    pub income: Amount,
    /// Sum of all expenses.
    pub expense: Amount,
    /// Sum of all investments.
    pub investment: Amount,
    /// Income minus expenses. Investments are not subtracted.
    #[serde(with = "rust_decimal::serde::float")]
    pub net_savings: Decimal,
}

impl Totals {
    /// The total for a single transaction type.
    pub fn get(&self, transaction_type: TransactionType) -> Amount {
        match transaction_type {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expense,
            TransactionType::Investment => self.investment,
        }
    }
}

/// The total for one source of income, expense or investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    /// Where the money came from or went to.
    pub source: String,
    /// The summed amount for the source.
    #[serde(rename = "amount")]
    pub total: Amount,
}

/// One row of a [MonthlySeries].
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    /// The month the totals cover.
    pub month: Month,
    /// The total per column type. Every column of the series has an entry,
    /// zero when there were no transactions of that type in the month.
    pub totals: BTreeMap<TransactionType, Amount>,
}

/// Totals per month and transaction type, ordered chronologically.
///
/// The columns are only the transaction types that appear somewhere in the
/// input. Months are only those that have at least one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    columns: Vec<TransactionType>,
    rows: Vec<MonthlyRow>,
}

impl MonthlySeries {
    /// The transaction types present in the series, in [TransactionType::ALL] order.
    pub fn columns(&self) -> &[TransactionType] {
        &self.columns
    }

    /// The rows of the series, oldest month first.
    pub fn rows(&self) -> &[MonthlyRow] {
        &self.rows
    }

    /// Whether there are no months, i.e. the input had no transactions.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The chronological `(month, total)` pairs for a single type, or `None`
    /// if that type does not appear in the series.
    pub fn column(&self, transaction_type: TransactionType) -> Option<Vec<(Month, Amount)>> {
        if !self.columns.contains(&transaction_type) {
            return None;
        }

        Some(
            self.rows
                .iter()
                .map(|row| {
                    let total = row
                        .totals
                        .get(&transaction_type)
                        .copied()
                        .unwrap_or_default();
                    (row.month, total)
                })
                .collect(),
        )
    }
}

/// Serialized month first, e.g. `{"2023-11": {"income": 5000.0, "expense": 400.0}}`.
impl Serialize for MonthlySeries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct Row<'a>(&'a [TransactionType], &'a MonthlyRow);

        impl Serialize for Row<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let Row(columns, row) = self;
                let mut map = serializer.serialize_map(Some(columns.len()))?;

                for transaction_type in *columns {
                    let total = row
                        .totals
                        .get(transaction_type)
                        .copied()
                        .unwrap_or_default();
                    map.serialize_entry(transaction_type, &total)?;
                }

                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.rows.len()))?;

        for row in &self.rows {
            map.serialize_entry(&row.month, &Row(&self.columns, row))?;
        }

        map.end()
    }
}

/// The numbers shown on the analytics page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSummary {
    /// Totals per month and type.
    pub monthly_summary: MonthlySeries,
    /// The largest income sources, largest first.
    pub top_income: Vec<SourceTotal>,
    /// The largest expense sources, largest first.
    pub top_expenses: Vec<SourceTotal>,
    /// How many transactions were summarised.
    pub total_transactions: usize,
    /// The mean amount over every transaction, `None` when there are none.
    pub average_transaction: Option<Amount>,
}

impl Serialize for AnalyticsSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AnalyticsSummary", 5)?;
        state.serialize_field("monthly_summary", &self.monthly_summary)?;
        state.serialize_field("top_income", &self.top_income)?;
        state.serialize_field("top_expenses", &self.top_expenses)?;
        state.serialize_field("total_transactions", &self.total_transactions)?;
        state.serialize_field("avg_transaction", &self.average_transaction)?;
        state.end()
    }
}

/// Sum the amounts of each transaction type.
///
/// Types with no transactions total zero.
pub fn totals_by_type(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expense += transaction.amount,
            TransactionType::Investment => totals.investment += transaction.amount,
        }
    }

    totals.net_savings = totals.income.value() - totals.expense.value();

    totals
}

/// Total each transaction type per calendar month.
///
/// The grouping is done in a single pass, then every month gets a value for
/// every type present in the input, zero where there was no activity.
pub fn monthly_series(transactions: &[Transaction]) -> MonthlySeries {
    let mut present_types = BTreeSet::new();
    let mut totals_by_month: BTreeMap<Month, BTreeMap<TransactionType, Amount>> = BTreeMap::new();

    for transaction in transactions {
        present_types.insert(transaction.transaction_type);
        *totals_by_month
            .entry(Month::of(transaction.date))
            .or_default()
            .entry(transaction.transaction_type)
            .or_default() += transaction.amount;
    }

    let columns: Vec<TransactionType> = present_types.into_iter().collect();

    let rows = totals_by_month
        .into_iter()
        .map(|(month, mut totals)| {
            for &transaction_type in &columns {
                totals.entry(transaction_type).or_default();
            }

            MonthlyRow { month, totals }
        })
        .collect();

    MonthlySeries { columns, rows }
}

/// The total per source for one transaction type, largest first.
///
/// Sources with equal totals keep the order they first appear in `transactions`.
/// Empty when there are no transactions of `transaction_type`.
pub fn breakdown_by_source(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Vec<SourceTotal> {
    let mut breakdown: Vec<SourceTotal> = Vec::new();
    let mut index_by_source: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
    {
        match index_by_source.get(transaction.source.as_str()) {
            Some(&index) => breakdown[index].total += transaction.amount,
            None => {
                index_by_source.insert(&transaction.source, breakdown.len());
                breakdown.push(SourceTotal {
                    source: transaction.source.clone(),
                    total: transaction.amount,
                });
            }
        }
    }

    // `sort_by` is stable, so ties keep their first encounter order.
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));

    breakdown
}

/// The `n` sources with the largest totals for one transaction type.
///
/// Like [breakdown_by_source], but truncated to at most `n` entries.
/// Most callers want [DEFAULT_TOP_N].
pub fn top_sources(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    n: usize,
) -> Vec<SourceTotal> {
    let mut breakdown = breakdown_by_source(transactions, transaction_type);
    breakdown.truncate(n);
    breakdown
}

/// Build the analytics page numbers from a ledger.
pub fn summarize(transactions: &[Transaction]) -> AnalyticsSummary {
    let total: Amount = transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum();

    AnalyticsSummary {
        monthly_summary: monthly_series(transactions),
        top_income: top_sources(transactions, TransactionType::Income, DEFAULT_TOP_N),
        top_expenses: top_sources(transactions, TransactionType::Expense, DEFAULT_TOP_N),
        total_transactions: transactions.len(),
        average_transaction: Amount::average(total, transactions.len()),
    }
}

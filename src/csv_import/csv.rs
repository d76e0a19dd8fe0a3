//! Parses transactions from CSV files with a `date,type,source,amount` header.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;

use crate::{
    Error,
    transaction::{NewTransaction, TransactionPayload},
};

/// The columns every imported file must have.
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "type", "source", "amount"];

/// The positions of the known columns in the header.
struct ColumnIndices {
    date: usize,
    transaction_type: usize,
    source: usize,
    amount: usize,
    description: Option<usize>,
}

impl ColumnIndices {
    /// Find the known columns in `header`, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::MissingColumns] naming every required column not in the header.
    fn from_header(header: &StringRecord) -> Result<Self, Error> {
        let names: Vec<String> = header
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        let find = |column: &str| names.iter().position(|name| name == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| find(column).is_none())
            .map(str::to_owned)
            .collect();

        match (find("date"), find("type"), find("source"), find("amount")) {
            (Some(date), Some(transaction_type), Some(source), Some(amount)) => Ok(Self {
                date,
                transaction_type,
                source,
                amount,
                description: find("description"),
            }),
            _ => Err(Error::MissingColumns(missing)),
        }
    }

    fn payload(&self, record: &StringRecord) -> TransactionPayload {
        let field = |index: usize| record.get(index).map(str::to_owned);

        TransactionPayload {
            date: field(self.date),
            transaction_type: field(self.transaction_type),
            source: field(self.source),
            amount: field(self.amount).map(Value::String),
            description: self.description.and_then(field),
        }
    }
}

/// Parse the transactions in `text`.
///
/// Rows with a missing required value, an unknown type, an amount that is not
/// a number or is negative, or an unparsable date are skipped.
///
/// # Errors
/// - [Error::MissingColumns] if the header lacks a required column,
/// - [Error::InvalidCSV] if the data is not well formed CSV,
/// - [Error::NoValidTransactions] if every row was skipped.
pub fn parse_transactions_csv(text: &str) -> Result<Vec<NewTransaction>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?
        .clone();
    let columns = ColumnIndices::from_header(&header)?;

    let mut transactions = Vec::new();

    for (row_number, record) in reader.records().enumerate() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;

        match columns.payload(&record).validate() {
            Ok(transaction) => transactions.push(transaction),
            Err(error) => {
                tracing::debug!("Skipping row {} of imported CSV: {error}", row_number + 1);
            }
        }
    }

    if transactions.is_empty() {
        return Err(Error::NoValidTransactions);
    }

    Ok(transactions)
}

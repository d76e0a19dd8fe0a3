//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::TransactionId, transaction::Amount};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned, spent, or put aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent.
    Expense,
    /// Money put into savings or assets.
    Investment,
}

impl TransactionType {
    /// Every transaction type, in display order.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Investment,
    ];

    /// The lowercase name used in JSON, forms, CSV files and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        }
    }

    /// The capitalised name for headings.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Investment => "Investment",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// An income, expense or investment that has been saved to the database.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the transaction was income, an expense or an investment.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Who paid, or who was paid, e.g. "Salary" or "Groceries".
    pub source: String,
    /// The amount of money earned, spent or invested.
    pub amount: Amount,
    /// Free text notes about the transaction.
    pub description: Option<String>,
    /// When the transaction was saved. Only used to order transactions on the same date.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        date: Date,
        transaction_type: TransactionType,
        source: &str,
        amount: Amount,
    ) -> NewTransaction {
        NewTransaction {
            date,
            transaction_type,
            source: source.to_owned(),
            amount,
            description: None,
        }
    }
}

/// A validated transaction that has not been saved yet.
///
/// Pass it to [create_transaction] to save it and get a [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The date the transaction happened.
    pub date: Date,
    /// Whether the money was earned, spent or invested.
    pub transaction_type: TransactionType,
    /// Who paid or was paid, e.g. "Salary" or "Groceries".
    pub source: String,
    /// How much money moved.
    pub amount: Amount,
    /// Optional free text.
    pub description: Option<String>,
}

impl NewTransaction {
    /// Set the description, treating blank text as no description.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, date, type, source, amount, description, created_at";

/// Save a new transaction to the database.
///
/// The creation time is set to the current UTC time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (date, type, source, amount, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.date,
                transaction.transaction_type,
                transaction.source,
                transaction.amount,
                transaction.description,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Save many transactions at once, all or nothing.
///
/// Returns the number of transactions saved.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// in which case none of the transactions are saved.
pub fn create_transactions(
    transactions: Vec<NewTransaction>,
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.unchecked_transaction()?;
    let count = transactions.len();

    for transaction in transactions {
        create_transaction(transaction, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(count)
}

/// Get transactions, newest first.
///
/// Transactions on the same date are ordered by when they were saved.
/// If `limit` is `None` or zero, all transactions are returned.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    limit: Option<u32>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // SQLite treats a negative limit as no limit.
    let limit = limit
        .filter(|&limit| limit > 0)
        .map(i64::from)
        .unwrap_or(-1);

    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT ?1"
        ))?
        .query_map([limit], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Get every transaction, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_date(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             ORDER BY date ASC, created_at ASC, id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('income', 'expense', 'investment')),
                source TEXT NOT NULL,
                amount REAL NOT NULL CHECK(amount >= 0),
                description TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'transaction', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'transaction')",
        (),
    )?;

    // Add composite index used for ordering by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_created_at
         ON \"transaction\"(date, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let transaction_type = row.get(2)?;
    let source = row.get(3)?;
    let amount = row.get(4)?;
    let description = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Transaction {
        id,
        date,
        transaction_type,
        source,
        amount,
        description,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

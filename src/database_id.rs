//! Database ID type definition.

/// Alias for the integer type SQLite assigns to transaction rows.
pub type TransactionId = i64;

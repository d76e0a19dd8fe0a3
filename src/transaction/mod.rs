//! Transactions: the model, its database queries, and the endpoints for
//! adding and deleting transactions.

mod amount;
mod api;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod validation;

pub use amount::Amount;
pub use api::{
    TransactionState, create_transaction_api_endpoint, delete_transaction_api_endpoint,
    list_transactions_endpoint,
};
pub use core::{
    NewTransaction, Transaction, TransactionType, count_transactions, create_transaction,
    create_transaction_table, create_transactions, delete_transaction, get_transactions,
    get_transactions_by_date, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use validation::{TransactionPayload, parse_date};

#[cfg(test)]
pub use core::get_transaction;

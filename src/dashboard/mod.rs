//! Dashboard module
//!
//! Provides an overview page with the totals for each transaction type,
//! charts, the most recent transactions and forms for adding data.

mod cards;
mod charts;
mod forms;
mod handlers;
mod tables;

pub use handlers::{get_dashboard_data, get_dashboard_page};

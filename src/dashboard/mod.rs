//! Dashboard module
//!
//! Provides the analytics page with a filterable transactions table, a
//! monthly statistics box, and a price-range bar chart.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::{get_dashboard_page, get_transactions_table_partial};

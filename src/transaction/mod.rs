//! Sale transactions for the analytics dashboard.
//!
//! This module contains everything related to sale transactions:
//! - The `Transaction` model and the SQLite table behind it
//! - Month-filtered query services (pages, statistics, histogram, categories)
//! - The JSON endpoints that expose those services

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Deserialize;

use crate::AppState;

mod all_transactions_endpoint;
mod bar_chart_endpoint;
mod combined_endpoint;
pub(crate) mod core;
mod pie_chart_endpoint;
pub(crate) mod query;
mod statistics_endpoint;
mod transactions_endpoint;

#[cfg(test)]
pub(crate) mod test_utils;

pub use all_transactions_endpoint::get_all_transactions_endpoint;
pub use bar_chart_endpoint::get_bar_chart_endpoint;
pub use combined_endpoint::get_combined_data_endpoint;
pub use core::{Transaction, create_transaction_table, replace_all_transactions};
pub use pie_chart_endpoint::get_pie_chart_endpoint;
pub use statistics_endpoint::get_statistics_endpoint;
pub use transactions_endpoint::get_transactions_endpoint;

/// The state needed to query the transaction store.
#[derive(Debug, Clone)]
pub struct TransactionQueryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionQueryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters shared by the endpoints that take only a month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// The selected month as a `YYYY-MM` token.
    #[serde(default)]
    pub month: String,
}

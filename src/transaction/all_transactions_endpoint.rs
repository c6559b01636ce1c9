//! Defines the endpoint that returns every stored transaction.
use axum::{Json, extract::State};
use serde::Serialize;

use crate::Error;

use super::{
    TransactionQueryState,
    core::{Transaction, count_transactions, get_all_transactions},
};

/// The full contents of the transaction store.
#[derive(Debug, Serialize)]
pub struct AllTransactions {
    /// Every stored transaction, ordered by identifier.
    pub transactions: Vec<Transaction>,
    /// The number of stored transactions.
    pub total: usize,
}

/// A route handler that lists the whole transaction store without any month
/// filter or pagination.
pub async fn get_all_transactions_endpoint(
    State(state): State<TransactionQueryState>,
) -> Result<Json<AllTransactions>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let transactions = get_all_transactions(&connection)?;
    let total = count_transactions(&connection)?;

    Ok(Json(AllTransactions {
        transactions,
        total,
    }))
}

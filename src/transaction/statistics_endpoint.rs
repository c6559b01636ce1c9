//! Defines the endpoint that returns the aggregate statistics for a month.
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{Error, month::SaleMonth};

use super::{
    MonthQuery, TransactionQueryState,
    query::{MonthlyStatistics, monthly_statistics},
};

/// A route handler that returns the total sale amount and the sold/unsold
/// item counts for the requested month.
///
/// # Errors
/// Responds with 400 Bad Request when the month parameter is not a `YYYY-MM`
/// token.
pub async fn get_statistics_endpoint(
    State(state): State<TransactionQueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyStatistics>, Error> {
    let interval = SaleMonth::parse(&query.month)?.interval();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let statistics = monthly_statistics(interval, &connection)?;

    Ok(Json(statistics))
}

//! Defines the endpoint that returns the per-category sale counts for a month.
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{Error, month::SaleMonth};

use super::{
    MonthQuery, TransactionQueryState,
    query::{CategoryCount, category_counts},
};

/// A route handler that counts a month's sales per product category, most
/// frequent category first.
///
/// # Errors
/// Responds with 400 Bad Request when the month parameter is not a `YYYY-MM`
/// token.
pub async fn get_pie_chart_endpoint(
    State(state): State<TransactionQueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let interval = SaleMonth::parse(&query.month)?.interval();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let counts = category_counts(interval, &connection)?;

    Ok(Json(counts))
}

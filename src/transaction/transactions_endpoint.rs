//! Defines the endpoint that returns one page of a month's transactions.
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{Error, month::SaleMonth};

use super::{TransactionQueryState, core::Transaction, query::get_transactions_in_month};

/// The page number used when the client does not send one.
pub const DEFAULT_PAGE: u32 = 1;

/// The page size used when the client does not send one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// The query parameters for the paginated transactions listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// The selected month as a `YYYY-MM` token.
    #[serde(default)]
    pub month: String,
    /// A free-text filter. Accepted for wire compatibility but applied in
    /// the browser over the rendered page, never here.
    #[serde(default)]
    pub search: String,
    /// The 1-based page number.
    pub page: Option<u32>,
    /// The number of records per page.
    pub per_page: Option<u32>,
}

/// One page of a month's transactions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    /// The records on this page.
    pub transactions: Vec<Transaction>,
    /// The 1-based page number that produced this page.
    pub page: u32,
    /// The page size that produced this page.
    pub per_page: u32,
    /// The number of records on this page, not the overall match count.
    pub total: usize,
}

/// A route handler that returns one page of the transactions whose sale date
/// falls in the requested month.
///
/// # Errors
/// Responds with 400 Bad Request when the month parameter is not a `YYYY-MM`
/// token.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionQueryState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsPage>, Error> {
    let interval = SaleMonth::parse(&query.month)?.interval();
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

    if !query.search.is_empty() {
        tracing::debug!(
            "ignoring search parameter {:?}, text filtering happens in the browser",
            query.search
        );
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let transactions = get_transactions_in_month(interval, page, per_page, &connection)?;

    Ok(Json(TransactionsPage {
        total: transactions.len(),
        transactions,
        page,
        per_page,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{TransactionQueryState, replace_all_transactions, test_utils::sale},
    };

    use super::{TransactionsQuery, get_transactions_endpoint};

    fn get_test_state() -> TransactionQueryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionQueryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn query_for_month(month: &str) -> Query<TransactionsQuery> {
        Query(TransactionsQuery {
            month: month.to_owned(),
            search: String::new(),
            page: None,
            per_page: None,
        })
    }

    fn seed_march_sales(state: &TransactionQueryState, count: i64) {
        let conn = state.db_connection.lock().unwrap();
        let transactions: Vec<_> = (1..=count)
            .map(|i| sale(i, i as f64, true, datetime!(2022-03-10 08:00 UTC)))
            .collect();
        replace_all_transactions(&transactions, &conn).unwrap();
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let state = get_test_state();

        let result = get_transactions_endpoint(State(state), query_for_month("March 2022")).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("March 2022".to_owned()))
        );
    }

    #[tokio::test]
    async fn first_page_of_ten_is_the_default() {
        let state = get_test_state();
        seed_march_sales(&state, 25);

        let page = get_transactions_endpoint(State(state), query_for_month("2022-03"))
            .await
            .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.transactions.len(), 10);
        assert_eq!(page.transactions.first().unwrap().id, 1);
    }

    #[tokio::test]
    async fn second_page_returns_middle_window() {
        let state = get_test_state();
        seed_march_sales(&state, 25);

        let page = get_transactions_endpoint(
            State(state),
            Query(TransactionsQuery {
                month: "2022-03".to_owned(),
                search: String::new(),
                page: Some(2),
                per_page: Some(10),
            }),
        )
        .await
        .unwrap();

        assert_eq!(page.transactions.first().unwrap().id, 11);
        assert_eq!(page.transactions.last().unwrap().id, 20);
        assert_eq!(page.total, 10);
    }

    #[tokio::test]
    async fn total_counts_the_returned_page_only() {
        let state = get_test_state();
        seed_march_sales(&state, 25);

        let page = get_transactions_endpoint(
            State(state),
            Query(TransactionsQuery {
                month: "2022-03".to_owned(),
                search: String::new(),
                page: Some(3),
                per_page: Some(10),
            }),
        )
        .await
        .unwrap();

        // The last page holds the 5 remaining records out of 25.
        assert_eq!(page.transactions.len(), 5);
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn month_without_sales_yields_empty_page() {
        let state = get_test_state();
        seed_march_sales(&state, 5);

        let page = get_transactions_endpoint(State(state), query_for_month("2022-07"))
            .await
            .unwrap();

        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 0);
    }
}

//! Defines the endpoint that bundles a month's page, statistics and category
//! counts into one response.
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{Error, month::SaleMonth};

use super::{
    TransactionQueryState,
    core::Transaction,
    query::{CategoryCount, MonthlyStatistics, category_counts, get_transactions_in_month,
        monthly_statistics},
    transactions_endpoint::{DEFAULT_PAGE, DEFAULT_PER_PAGE},
};

/// The query parameters for the combined month view.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedDataQuery {
    /// The selected month as a `YYYY-MM` token.
    #[serde(default)]
    pub month: String,
    /// The 1-based page number for the transactions section.
    pub page: Option<u32>,
    /// The page size for the transactions section.
    pub per_page: Option<u32>,
}

/// The paginated transactions section of the combined response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsSection {
    /// The 1-based page number that produced this section.
    pub page: u32,
    /// The page size that produced this section.
    pub per_page: u32,
    /// The number of records on this page, not the overall match count.
    pub total: usize,
    /// The records on this page.
    pub data: Vec<Transaction>,
}

/// A month's page of transactions, statistics and category counts, fetched
/// against the same month interval.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// One page of the month's transactions.
    pub transactions: TransactionsSection,
    /// The month's aggregate sale statistics.
    pub statistics: MonthlyStatistics,
    /// The month's per-category sale counts.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// A route handler that answers the transactions, statistics and pie-chart
/// queries for one month in a single round trip.
///
/// # Errors
/// Responds with 400 Bad Request when the month parameter is not a `YYYY-MM`
/// token. Any query failure fails the whole response.
pub async fn get_combined_data_endpoint(
    State(state): State<TransactionQueryState>,
    Query(query): Query<CombinedDataQuery>,
) -> Result<Json<CombinedData>, Error> {
    let interval = SaleMonth::parse(&query.month)?.interval();
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let data = get_transactions_in_month(interval, page, per_page, &connection)?;
    let statistics = monthly_statistics(interval, &connection)?;
    let pie_chart_data = category_counts(interval, &connection)?;

    Ok(Json(CombinedData {
        transactions: TransactionsSection {
            page,
            per_page,
            total: data.len(),
            data,
        },
        statistics,
        pie_chart_data,
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

    use super::{CombinedDataQuery, get_combined_data_endpoint};

    fn get_test_state() -> TransactionQueryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionQueryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn query_for_month(month: &str) -> Query<CombinedDataQuery> {
        Query(CombinedDataQuery {
            month: month.to_owned(),
            page: None,
            per_page: None,
        })
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let state = get_test_state();

        let result = get_combined_data_endpoint(State(state), query_for_month("2022-035")).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("2022-035".to_owned()))
        );
    }

    #[tokio::test]
    async fn sections_cover_the_same_month() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            let mut transactions: Vec<_> = (1..=15)
                .map(|i| sale(i, 10.0 * i as f64, i % 2 == 0, datetime!(2022-03-10 08:00 UTC)))
                .collect();
            transactions.push(sale(16, 500.0, true, datetime!(2022-04-10 08:00 UTC)));
            replace_all_transactions(&transactions, &conn).unwrap();
        }

        let data = get_combined_data_endpoint(State(state), query_for_month("2022-03"))
            .await
            .unwrap();

        assert_eq!(data.transactions.page, 1);
        assert_eq!(data.transactions.per_page, 10);
        assert_eq!(data.transactions.data.len(), 10);
        assert_eq!(data.transactions.total, 10);
        // 10 + 20 + ... + 150 = 1200.
        assert_eq!(data.statistics.total_sale_amount, 1200.0);
        assert_eq!(data.statistics.total_sold_items, 7);
        assert_eq!(data.statistics.total_unsold_items, 8);
        assert_eq!(data.pie_chart_data.len(), 1);
        assert_eq!(data.pie_chart_data[0].count, 15);
    }

    #[tokio::test]
    async fn empty_month_yields_empty_sections() {
        let state = get_test_state();

        let data = get_combined_data_endpoint(State(state), query_for_month("2023-01"))
            .await
            .unwrap();

        assert!(data.transactions.data.is_empty());
        assert_eq!(data.transactions.total, 0);
        assert_eq!(data.statistics.total_sale_amount, 0.0);
        assert!(data.pie_chart_data.is_empty());
    }
}

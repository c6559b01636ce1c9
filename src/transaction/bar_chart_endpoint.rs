//! Defines the endpoint that returns the price histogram for a month.
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{Error, month::SaleMonth};

use super::{
    MonthQuery, TransactionQueryState,
    query::{PriceBucket, price_histogram},
};

/// A route handler that counts a month's sales in 100-wide price buckets.
///
/// Only non-empty buckets are returned. Prices of 900 and above share one
/// open-ended bucket identified as `"901-above"`.
///
/// # Errors
/// Responds with 400 Bad Request when the month parameter is not a `YYYY-MM`
/// token.
pub async fn get_bar_chart_endpoint(
    State(state): State<TransactionQueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceBucket>>, Error> {
    let interval = SaleMonth::parse(&query.month)?.interval();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let buckets = price_histogram(interval, &connection)?;

    Ok(Json(buckets))
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
        transaction::{
            MonthQuery, TransactionQueryState, query::BucketId, replace_all_transactions,
            test_utils::sale,
        },
    };

    use super::get_bar_chart_endpoint;

    fn get_test_state() -> TransactionQueryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionQueryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn query_for_month(month: &str) -> Query<MonthQuery> {
        Query(MonthQuery {
            month: month.to_owned(),
        })
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let state = get_test_state();

        let result = get_bar_chart_endpoint(State(state), query_for_month("2022-00")).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("2022-00".to_owned()))
        );
    }

    #[tokio::test]
    async fn buckets_cover_only_the_selected_month() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            replace_all_transactions(
                &[
                    sale(1, 50.0, true, datetime!(2022-03-02 09:00 UTC)),
                    sale(2, 150.0, true, datetime!(2022-03-15 12:00 UTC)),
                    sale(3, 950.0, false, datetime!(2022-03-28 23:00 UTC)),
                    sale(4, 450.0, true, datetime!(2022-04-02 09:00 UTC)),
                ],
                &conn,
            )
            .unwrap();
        }

        let buckets = get_bar_chart_endpoint(State(state), query_for_month("2022-03"))
            .await
            .unwrap();

        assert_eq!(
            buckets
                .iter()
                .map(|bucket| (bucket.id, bucket.count))
                .collect::<Vec<_>>(),
            vec![
                (BucketId::LowerBound(0), 1),
                (BucketId::LowerBound(100), 1),
                (BucketId::Overflow, 1),
            ]
        );
    }

    #[tokio::test]
    async fn overflow_bucket_serializes_with_its_label() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            replace_all_transactions(
                &[
                    sale(1, 50.0, true, datetime!(2022-03-02 09:00 UTC)),
                    sale(2, 1200.0, false, datetime!(2022-03-28 23:00 UTC)),
                ],
                &conn,
            )
            .unwrap();
        }

        let buckets = get_bar_chart_endpoint(State(state), query_for_month("2022-03"))
            .await
            .unwrap();
        let body = serde_json::to_value(&buckets.0).unwrap();

        assert_eq!(
            body,
            serde_json::json!([
                {"_id": 0, "count": 1},
                {"_id": "901-above", "count": 1},
            ])
        );
    }
}

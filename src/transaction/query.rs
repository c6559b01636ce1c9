//! The month-filtered query shapes behind the analytics endpoints.
//!
//! Every query filters by the same half-open sale-date interval produced by
//! [crate::month::SaleMonth::interval].

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, month::MonthInterval};

use super::core::{Transaction, map_transaction_row};

/// The aggregate sale figures for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistics {
    /// The sum of prices of all sales in the month, sold or not.
    pub total_sale_amount: f64,
    /// The number of records marked sold.
    pub total_sold_items: i64,
    /// The number of records not marked sold.
    pub total_unsold_items: i64,
}

/// The identifier of a price-histogram bucket.
///
/// Finite buckets are identified by their lower bound (0, 100, ..., 800);
/// every price of 900 or more falls into a single overflow bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketId {
    /// A 100-wide bucket `[bound, bound + 100)`.
    LowerBound(u32),
    /// The open-ended bucket for prices of 900 and above.
    Overflow,
}

impl BucketId {
    /// The position of this bucket within the ten fixed display ranges.
    pub(crate) fn range_index(self) -> usize {
        match self {
            BucketId::LowerBound(bound) => (bound / 100) as usize,
            BucketId::Overflow => 9,
        }
    }
}

impl Serialize for BucketId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BucketId::LowerBound(bound) => serializer.serialize_u32(*bound),
            BucketId::Overflow => serializer.serialize_str("901-above"),
        }
    }
}

/// A non-empty price-histogram bucket.
///
/// Buckets with no matching records are absent from query results; the
/// dashboard zero-fills them for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    /// The bucket identifier, named `_id` on the wire.
    #[serde(rename = "_id")]
    pub id: BucketId,
    /// The number of sales whose price falls in this bucket.
    pub count: i64,
}

/// The number of sales in one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// The number of sales in the category.
    pub count: i64,
}

/// Get one page of the transactions whose sale date falls in `interval`.
///
/// `page` is 1-based; the query skips `(page - 1) * per_page` records.
/// Results are ordered by identifier to keep pagination stable.
///
/// # Errors
/// Returns [Error::Sql] if the query fails.
pub fn get_transactions_in_month(
    interval: MonthInterval,
    page: u32,
    per_page: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let skip = i64::from(page.saturating_sub(1)) * i64::from(per_page);

    connection
        .prepare(
            "SELECT id, title, price, description, category, image, sold, date_of_sale
             FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2
             ORDER BY id ASC
             LIMIT ?3 OFFSET ?4",
        )?
        .query_map(
            (interval.start, interval.end, i64::from(per_page), skip),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::Sql))
        .collect()
}

/// Aggregate the sale statistics for `interval` in a single pass.
///
/// Returns all zeros when no records match.
///
/// # Errors
/// Returns [Error::Sql] if the query fails.
pub fn monthly_statistics(
    interval: MonthInterval,
    connection: &Connection,
) -> Result<MonthlyStatistics, Error> {
    connection
        .prepare(
            "SELECT TOTAL(price), COALESCE(SUM(sold), 0), COALESCE(SUM(1 - sold), 0)
             FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2",
        )?
        .query_row((interval.start, interval.end), |row| {
            Ok(MonthlyStatistics {
                total_sale_amount: row.get(0)?,
                total_sold_items: row.get(1)?,
                total_unsold_items: row.get(2)?,
            })
        })
        .map_err(|error| error.into())
}

/// Count the sales in `interval` grouped into 100-wide price buckets.
///
/// Prices of 900 and above share one overflow bucket, and prices below zero
/// group into the lowest bucket. Empty buckets are not returned.
///
/// # Errors
/// Returns [Error::Sql] if the query fails.
pub fn price_histogram(
    interval: MonthInterval,
    connection: &Connection,
) -> Result<Vec<PriceBucket>, Error> {
    connection
        .prepare(
            "SELECT MIN(MAX(CAST(price / 100 AS INTEGER), 0), 9) * 100 AS bucket, COUNT(*)
             FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2
             GROUP BY bucket
             ORDER BY bucket ASC",
        )?
        .query_map((interval.start, interval.end), |row| {
            let lower_bound: i64 = row.get(0)?;
            let id = if lower_bound >= 900 {
                BucketId::Overflow
            } else {
                BucketId::LowerBound(lower_bound as u32)
            };

            Ok(PriceBucket {
                id,
                count: row.get(1)?,
            })
        })?
        .map(|bucket_result| bucket_result.map_err(Error::Sql))
        .collect()
}

/// Count the sales in `interval` per category, most frequent first.
///
/// Categories with equal counts may appear in any relative order.
///
/// # Errors
/// Returns [Error::Sql] if the query fails.
pub fn category_counts(
    interval: MonthInterval,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(*) AS item_count
             FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2
             GROUP BY category
             ORDER BY item_count DESC",
        )?
        .query_map((interval.start, interval.end), |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|count_result| count_result.map_err(Error::Sql))
        .collect()
}

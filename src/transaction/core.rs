//! Defines the core data model and database functions for sale transactions.

use rusqlite::{Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::Error;

/// A single product-sale record.
///
/// The whole set is replaced in one operation by the seed loader; individual
/// records are never created, updated, or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The numeric identifier assigned by the third-party feed.
    pub id: i64,
    /// The product title.
    pub title: String,
    /// The sale price. Assumed non-negative, not validated.
    pub price: f64,
    /// A text description of the product.
    pub description: String,
    /// The product category label.
    pub category: String,
    /// A URL to the product image.
    pub image: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the sale happened. Normalized to UTC for storage.
    #[serde(rename = "dateOfSale", with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl Transaction {
    /// The sale timestamp shifted to UTC, without its offset.
    ///
    /// This is the representation stored in the database so that date range
    /// comparisons are plain text comparisons.
    pub(crate) fn date_of_sale_utc(&self) -> PrimitiveDateTime {
        let utc = self.date_of_sale.to_offset(UtcOffset::UTC);
        PrimitiveDateTime::new(utc.date(), utc.time())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL
                )",
        (),
    )?;

    // Index used by every month-filtered query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale
             ON \"transaction\"(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_of_sale: PrimitiveDateTime = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: date_of_sale.assume_utc(),
    })
}

/// Insert a single transaction into the database.
///
/// # Errors
/// Returns [Error::Sql] if the insert fails, e.g. on a duplicate identifier.
pub(crate) fn insert_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO \"transaction\"
             (id, title, price, description, category, image, sold, date_of_sale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            transaction.id,
            &transaction.title,
            transaction.price,
            &transaction.description,
            &transaction.category,
            &transaction.image,
            transaction.sold,
            transaction.date_of_sale_utc(),
        ),
    )?;

    Ok(())
}

/// Replace the entire contents of the transaction table with `transactions`.
///
/// The delete and the inserts run inside one exclusive SQL transaction, so a
/// failed insert rolls back to the previous record set instead of leaving the
/// store empty.
///
/// # Errors
/// Returns [Error::Sql] if the delete or any insert fails.
pub fn replace_all_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    sql_transaction.execute("DELETE FROM \"transaction\"", ())?;

    for transaction in transactions {
        insert_transaction(transaction, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Retrieve every transaction in the database, unfiltered.
///
/// This reads the entire store into memory and is only intended for the
/// list-all endpoint.
///
/// # Errors
/// Returns [Error::Sql] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, price, description, category, image, sold, date_of_sale
             FROM \"transaction\" ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::Sql))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// Returns [Error::Sql] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0).map(|count| count as usize)
        })
        .map_err(|error| error.into())
}

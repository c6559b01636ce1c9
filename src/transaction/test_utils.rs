//! Helpers for building sale transactions in tests.

use time::OffsetDateTime;

use super::Transaction;

/// Build a sale transaction with placeholder text fields.
pub(crate) fn sale(id: i64, price: f64, sold: bool, date_of_sale: OffsetDateTime) -> Transaction {
    Transaction {
        id,
        title: format!("Product {id}"),
        price,
        description: format!("Description for product {id}"),
        category: "electronics".to_owned(),
        image: format!("https://example.com/images/{id}.jpg"),
        sold,
        date_of_sale,
    }
}

/// Build a sale transaction in a specific category.
pub(crate) fn sale_in_category(
    id: i64,
    price: f64,
    category: &str,
    date_of_sale: OffsetDateTime,
) -> Transaction {
    Transaction {
        category: category.to_owned(),
        ..sale(id, price, false, date_of_sale)
    }
}

//! The paginated transactions table for the dashboard.
//!
//! The table is rendered as a self-contained fragment so htmx can swap it in
//! place when the user pages through a month. The search box filters the rows
//! that are currently on the page in the browser, it never hits the server.

use maud::{Markup, html};
use serde::Serialize;

use crate::{
    endpoints,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, format_currency},
    month::SaleMonth,
    transaction::Transaction,
};

/// The query parameters that address one page of the dashboard table.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TableQuery {
    /// The month number (1-12) of the selected month.
    pub month: u8,
    /// The year of the selected month.
    pub year: i32,
    /// The 1-based page number.
    pub page: u32,
    /// The number of rows per page.
    pub per_page: u32,
}

impl TableQuery {
    /// The partial URL for this page of the table.
    fn to_url(self) -> String {
        // Serializing four plain numbers cannot fail.
        let query_string = serde_urlencoded::to_string(self).unwrap_or_default();

        format!("{}?{}", endpoints::DASHBOARD_TABLE, query_string)
    }
}

/// Renders one page of a month's transactions with paging controls.
///
/// `has_next_page` controls whether the Next button is enabled. The search
/// box matches against each row's `data-search-text` attribute, which holds
/// the lowercased title, description and price.
pub(super) fn transactions_table(
    month: SaleMonth,
    query: TableQuery,
    transactions: &[Transaction],
    has_next_page: bool,
) -> Markup {
    html! {
        section id="transactions-table"
        {
            div class="table-controls"
            {
                input
                    type="search"
                    id="table-search"
                    placeholder="Search transaction"
                    oninput="filterTableRows(this)";

                span class="match-count" id="table-match-count"
                {
                    (transactions.len()) " shown"
                }

                span class="page-indicator" { "Page " (query.page) }
            }

            table
            {
                thead
                {
                    tr
                    {
                        th class=(TABLE_HEADER_STYLE) { "ID" }
                        th class=(TABLE_HEADER_STYLE) { "Title" }
                        th class=(TABLE_HEADER_STYLE) { "Description" }
                        th class=(TABLE_HEADER_STYLE) { "Price" }
                        th class=(TABLE_HEADER_STYLE) { "Category" }
                        th class=(TABLE_HEADER_STYLE) { "Sold" }
                        th class=(TABLE_HEADER_STYLE) { "Image" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty()
                    {
                        tr
                        {
                            td class=(TABLE_CELL_STYLE) colspan="7"
                            {
                                "No transactions for " (month.month_name()) " " (month.year) "."
                            }
                        }
                    }

                    @for transaction in transactions
                    {
                        tr data-search-text=(search_text(transaction))
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            td class=(TABLE_CELL_STYLE) { (transaction.title) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.price)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE) { (if transaction.sold { "Yes" } else { "No" }) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                img src=(transaction.image) alt=(transaction.title) loading="lazy";
                            }
                        }
                    }
                }
            }

            div class="table-pagination"
            {
                button
                    disabled[query.page <= 1]
                    hx-get=(TableQuery { page: query.page.saturating_sub(1), ..query }.to_url())
                    hx-target="#transactions-table"
                    hx-swap="outerHTML"
                {
                    "Previous"
                }

                button
                    disabled[!has_next_page]
                    hx-get=(TableQuery { page: query.page + 1, ..query }.to_url())
                    hx-target="#transactions-table"
                    hx-swap="outerHTML"
                {
                    "Next"
                }
            }
        }
    }
}

/// The lowercased text the in-browser search box matches a row against.
fn search_text(transaction: &Transaction) -> String {
    format!(
        "{} {} {}",
        transaction.title, transaction.description, transaction.price
    )
    .to_lowercase()
}

//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and the table partial
//! - HTML view functions that assemble the widgets
//! - State and query types used by the handlers

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error, endpoints,
    html::{HeadElement, base},
    month::SaleMonth,
    transaction::{
        Transaction,
        query::{get_transactions_in_month, monthly_statistics, price_histogram},
    },
};

use super::{
    cards::statistics_card,
    charts::{chart_script, chart_view, fill_price_ranges, price_range_chart},
    tables::{TableQuery, transactions_table},
};

/// The month number shown when the client does not pick one.
const DEFAULT_MONTH: u8 = 3;

/// The year shown when the client does not pick one.
const DEFAULT_YEAR: i32 = 2022;

/// The default number of table rows per page.
const DEFAULT_PER_PAGE: u32 = 10;

/// The years offered by the dashboard's year selector.
const SELECTABLE_YEARS: std::ops::RangeInclusive<i32> = 2020..=2025;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection holding the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the dashboard page and its table partial.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// The month number (1-12) of the selected month.
    pub month: Option<u8>,
    /// The year of the selected month.
    pub year: Option<i32>,
    /// The 1-based page number of the transactions table.
    pub page: Option<u32>,
    /// The number of table rows per page.
    pub per_page: Option<u32>,
}

impl DashboardQuery {
    /// Apply the dashboard defaults and validate the month selection.
    fn normalize(self) -> Result<(SaleMonth, TableQuery), Error> {
        let month_number = self.month.unwrap_or(DEFAULT_MONTH);
        let year = self.year.unwrap_or(DEFAULT_YEAR);
        let month = SaleMonth::from_parts(year, month_number)?;

        let table_query = TableQuery {
            month: month_number,
            year,
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1),
        };

        Ok((month, table_query))
    }
}

/// Display the analytics dashboard for the selected month.
///
/// Each widget is fetched independently, so a failing query degrades that
/// widget to an inline error message instead of failing the whole page.
///
/// # Errors
/// Responds with 400 Bad Request when the month selection is invalid.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (month, table_query) = query.normalize()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let table = match fetch_table_page(month, table_query, &connection) {
        Ok((transactions, has_next_page)) => {
            transactions_table(month, table_query, &transactions, has_next_page)
        }
        Err(error) => {
            tracing::error!("could not load the transactions table: {error}");
            widget_error("Could not load the transactions table.")
        }
    };

    let statistics = match monthly_statistics(month.interval(), &connection) {
        Ok(statistics) => statistics_card(month, &statistics),
        Err(error) => {
            tracing::error!("could not load the statistics box: {error}");
            widget_error("Could not load the statistics.")
        }
    };

    let (chart, script) = match price_histogram(month.interval(), &connection) {
        Ok(buckets) => {
            let range_counts = fill_price_ranges(&buckets);
            (
                chart_view(),
                Some(chart_script(&price_range_chart(month, &range_counts))),
            )
        }
        Err(error) => {
            tracing::error!("could not load the price-range chart: {error}");
            (widget_error("Could not load the price-range chart."), None)
        }
    };

    let mut head_elements = vec![
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js".to_owned(),
        ),
        table_search_script(),
    ];
    head_elements.extend(script);

    Ok(dashboard_view(month, &head_elements, &table, &statistics, &chart).into_response())
}

/// Return one page of the dashboard transactions table as an htmx fragment.
///
/// # Errors
/// Responds with 400 Bad Request when the month selection is invalid.
pub async fn get_transactions_table_partial(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (month, table_query) = query.normalize()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let (transactions, has_next_page) = fetch_table_page(month, table_query, &connection)?;

    Ok(transactions_table(month, table_query, &transactions, has_next_page).into_response())
}

/// Fetch the rows for one table page, plus whether a further page exists.
fn fetch_table_page(
    month: SaleMonth,
    table_query: TableQuery,
    connection: &Connection,
) -> Result<(Vec<Transaction>, bool), Error> {
    let transactions = get_transactions_in_month(
        month.interval(),
        table_query.page,
        table_query.per_page,
        connection,
    )?;
    // A full page may be the last one, so probe the next page for content.
    let next_page = get_transactions_in_month(
        month.interval(),
        table_query.page + 1,
        table_query.per_page,
        connection,
    )?;

    Ok((transactions, !next_page.is_empty()))
}

/// Renders an inline error shown in place of a widget that failed to load.
fn widget_error(message: &str) -> Markup {
    html! {
        p class="widget-error" { (message) }
    }
}

/// The in-browser search that hides table rows not matching the query and
/// keeps the visible match count in step with the filtered subset.
fn table_search_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(
        r#"function filterTableRows(input) {
            const needle = input.value.trim().toLowerCase();
            const rows = document.querySelectorAll('#transactions-table tbody tr[data-search-text]');
            let shown = 0;
            rows.forEach((row) => {
                const matches = needle === '' || row.dataset.searchText.includes(needle);
                row.hidden = !matches;
                if (matches) {
                    shown += 1;
                }
            });
            const counter = document.getElementById('table-match-count');
            if (counter) {
                counter.textContent = shown + ' shown';
            }
        }"#
        .to_owned(),
    ))
}

/// Renders the month selector form.
fn month_selector(month: SaleMonth) -> Markup {
    let selected_month = month.month as u8;

    html! {
        form class="month-selector" method="get" action=(endpoints::DASHBOARD_VIEW)
        {
            label for="month" { "Month" }
            select name="month" id="month"
            {
                @for month_number in 1..=12u8
                {
                    // The unwrap cannot fail: the month number is in range.
                    @let option_month = SaleMonth::from_parts(month.year, month_number).unwrap();
                    option
                        value=(month_number)
                        selected[month_number == selected_month]
                    {
                        (option_month.month_name())
                    }
                }
            }

            label for="year" { "Year" }
            select name="year" id="year"
            {
                @for year in SELECTABLE_YEARS
                {
                    option value=(year) selected[year == month.year] { (year) }
                }
            }

            button type="submit" { "Apply" }
        }
    }
}

/// Assembles the full dashboard page.
fn dashboard_view(
    month: SaleMonth,
    head_elements: &[HeadElement],
    table: &Markup,
    statistics: &Markup,
    chart: &Markup,
) -> Markup {
    let content = html! {
        main class="dashboard"
        {
            h1 { "Transaction Dashboard" }

            (month_selector(month))

            (table)

            (statistics)

            (chart)
        }
    };

    base("Dashboard", head_elements, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{replace_all_transactions, test_utils::sale},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page, get_transactions_table_partial};

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn seed_march_sales(state: &DashboardState, count: i64) {
        let conn = state.db_connection.lock().unwrap();
        let transactions: Vec<_> = (1..=count)
            .map(|i| sale(i, 10.0 * i as f64, i % 2 == 0, datetime!(2022-03-10 08:00 UTC)))
            .collect();
        replace_all_transactions(&transactions, &conn).unwrap();
    }

    fn empty_query() -> Query<DashboardQuery> {
        Query(DashboardQuery {
            month: None,
            year: None,
            page: None,
            per_page: None,
        })
    }

    async fn parse_response_document(response: axum::response::Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn defaults_to_march_2022() {
        let state = get_test_state();
        seed_march_sales(&state, 3);

        let response = get_dashboard_page(State(state), empty_query()).await.unwrap();
        let html = parse_response_document(response).await;

        let heading_selector = Selector::parse("#statistics h2").unwrap();
        let heading: String = html
            .select(&heading_selector)
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(heading, "Statistics - March 2022");
    }

    #[tokio::test]
    async fn renders_table_statistics_and_chart_container() {
        let state = get_test_state();
        seed_march_sales(&state, 12);

        let response = get_dashboard_page(State(state), empty_query()).await.unwrap();
        let html = parse_response_document(response).await;

        let row_selector = Selector::parse("#transactions-table tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 10);

        let statistics_selector = Selector::parse("#statistics dd").unwrap();
        assert_eq!(html.select(&statistics_selector).count(), 3);

        let chart_selector = Selector::parse("#price-range-chart").unwrap();
        assert_eq!(html.select(&chart_selector).count(), 1);
    }

    #[tokio::test]
    async fn rejects_out_of_range_month_number() {
        let state = get_test_state();

        let result = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                month: Some(13),
                year: Some(2022),
                page: None,
                per_page: None,
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("2022-13".to_owned()))
        );
    }

    #[tokio::test]
    async fn rejects_year_outside_the_representable_range() {
        let state = get_test_state();

        let result = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                month: Some(3),
                year: Some(99999),
                page: None,
                per_page: None,
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("99999-03".to_owned()))
        );
    }

    #[tokio::test]
    async fn failed_widget_queries_degrade_to_inline_errors() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            conn.execute("DROP TABLE \"transaction\"", ()).unwrap();
        }

        let response = get_dashboard_page(State(state), empty_query()).await.unwrap();
        let html = parse_response_document(response).await;

        // All three widgets degrade to inline errors, but the page itself
        // still renders with its month selector.
        let error_selector = Selector::parse(".widget-error").unwrap();
        assert_eq!(html.select(&error_selector).count(), 3);

        let form_selector = Selector::parse("form.month-selector").unwrap();
        assert_eq!(html.select(&form_selector).count(), 1);
    }

    #[tokio::test]
    async fn table_partial_returns_the_requested_page() {
        let state = get_test_state();
        seed_march_sales(&state, 25);

        let response = get_transactions_table_partial(
            State(state),
            Query(DashboardQuery {
                month: Some(3),
                year: Some(2022),
                page: Some(3),
                per_page: Some(10),
            }),
        )
        .await
        .unwrap();
        let html = parse_response_document(response).await;

        // The fragment contains the table section but not the page chrome.
        let section_selector = Selector::parse("#transactions-table").unwrap();
        assert_eq!(html.select(&section_selector).count(), 1);
        let title_selector = Selector::parse("title").unwrap();
        assert_eq!(html.select(&title_selector).count(), 0);

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 5);
    }

    #[tokio::test]
    async fn last_page_disables_the_next_button() {
        let state = get_test_state();
        seed_march_sales(&state, 15);

        let response = get_transactions_table_partial(
            State(state),
            Query(DashboardQuery {
                month: Some(3),
                year: Some(2022),
                page: Some(2),
                per_page: Some(10),
            }),
        )
        .await
        .unwrap();
        let html = parse_response_document(response).await;

        let disabled_selector = Selector::parse("button[disabled]").unwrap();
        let disabled: Vec<String> = html
            .select(&disabled_selector)
            .map(|button| button.text().collect())
            .collect();
        assert_eq!(disabled, vec!["Next"]);
    }
}

//! The application's endpoint URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The analytics dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The htmx partial with one page of the dashboard transactions table.
pub const DASHBOARD_TABLE: &str = "/dashboard/transactions-table";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route that re-seeds the transaction store from the third-party feed.
pub const INITIALIZE: &str = "/api/initialize";
/// The route that lists the whole transaction store.
pub const ALL_TRANSACTIONS: &str = "/api/all-transactions";
/// The route that returns one page of a month's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route that returns a month's aggregate statistics.
pub const STATISTICS: &str = "/api/statistics";
/// The route that returns a month's price histogram.
pub const BAR_CHART: &str = "/api/bar-chart";
/// The route that returns a month's per-category counts.
pub const PIE_CHART: &str = "/api/pie-chart";
/// The route that bundles transactions, statistics and pie-chart data.
pub const COMBINED_DATA: &str = "/api/combined-data";

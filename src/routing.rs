//! Application router configuration for the JSON API and the dashboard views.

use axum::{
    Router,
    response::Redirect,
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    AppState,
    dashboard::{get_dashboard_page, get_transactions_table_partial},
    endpoints,
    not_found::get_404_not_found,
    seed::initialize_endpoint,
    transaction::{
        get_all_transactions_endpoint, get_bar_chart_endpoint, get_combined_data_endpoint,
        get_pie_chart_endpoint, get_statistics_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    // The JSON API is also meant for third-party frontends, so it answers
    // cross-origin requests.
    let api_routes = Router::new()
        .route(endpoints::INITIALIZE, get(initialize_endpoint))
        .route(
            endpoints::ALL_TRANSACTIONS,
            get(get_all_transactions_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
        .layer(CorsLayer::permissive());

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::DASHBOARD_TABLE,
            get(get_transactions_table_partial),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

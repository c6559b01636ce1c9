//! Defines the fallback handler for unknown routes.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// A fallback handler that renders the 404 page.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "This page does not exist.",
            "Check the address for typos, or head back to the dashboard.",
        ),
    )
        .into_response()
}

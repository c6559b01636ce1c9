//! Salescope is a small analytics dashboard for product-sale transactions.
//!
//! The backend exposes a JSON REST API that queries and aggregates a single
//! table of sale records seeded from a third-party JSON feed, and the
//! dashboard renders a filterable transactions table, a monthly statistics
//! box, and a price-range bar chart from the same query services.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod month;
mod not_found;
mod routing;
mod seed;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client supplied a month parameter that is not a `YYYY-MM` token.
    ///
    /// Holds the rejected input for server-side logging. The client only
    /// sees a static validation message.
    #[error("invalid month \"{0}\", expected the format YYYY-MM")]
    InvalidMonthFormat(String),

    /// The seed data could not be fetched or decoded from the third-party
    /// feed.
    ///
    /// The error string should only be logged for debugging on the server.
    /// The client sees a generic initialization failure.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::Sql(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonthFormat(month) => {
                tracing::debug!("rejected month parameter {month:?}");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Invalid month format. Please use YYYY-MM"})),
                )
                    .into_response()
            }
            Error::SeedFetch(detail) => {
                tracing::error!("could not initialize the database: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Unable to initialize database"})),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

//! Seeds the transaction store from the third-party JSON feed.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    transaction::{Transaction, replace_all_transactions},
};

/// The state needed to refresh the transaction store from the seed feed.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection holding the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The URL of the JSON feed to seed from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Fetch the seed feed and decode it as a list of transactions.
async fn fetch_seed_transactions(seed_url: &str) -> Result<Vec<Transaction>, Error> {
    let response = reqwest::get(seed_url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetch(error.to_string()))?;

    response
        .json()
        .await
        .map_err(|error| Error::SeedFetch(error.to_string()))
}

/// A route handler that replaces the whole transaction store with the current
/// contents of the seed feed.
///
/// The fetch happens before the database lock is taken so a slow feed does
/// not block readers. Calling this endpoint again re-seeds from scratch.
///
/// # Errors
/// Responds with 500 Internal Server Error when the feed cannot be fetched or
/// decoded. The store keeps its previous contents in that case.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Result<Json<Value>, Error> {
    let transactions = fetch_seed_transactions(&state.seed_url).await?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let count = replace_all_transactions(&transactions, &connection)?;
    tracing::info!("seeded the transaction store with {count} records");

    Ok(Json(json!({
        "message": "Database successfully populated with seed data"
    })))
}

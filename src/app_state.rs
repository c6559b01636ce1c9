//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The URL of the third-party JSON feed used to seed the store.
    pub seed_url: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the transaction
    /// table. The store starts out with whatever the database file already
    /// holds; the seed endpoint fills it from `seed_url`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, seed_url: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            seed_url: seed_url.to_owned(),
        })
    }
}

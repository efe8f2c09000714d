//! Core ConnectionManager struct and basic connection methods.

use mongodb::Client;
use mongodb::bson::doc;
use tokio::runtime::Runtime;

use crate::error::Result;

/// Runs MongoDB operations on an owned Tokio runtime behind a blocking API
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime })
    }

    /// Connect to MongoDB and verify the server answers (runs in Tokio runtime)
    pub fn connect(&self, uri: &str) -> Result<Client> {
        let uri = uri.to_string();
        self.runtime.block_on(async {
            let client = Client::with_uri_str(&uri).await?;

            // Ping to verify connection
            client.database("admin").run_command(doc! { "ping": 1 }).await?;

            Ok(client)
        })
    }

    /// List collection names in a database (runs in Tokio runtime)
    pub fn list_collection_names(&self, client: &Client, database: &str) -> Result<Vec<String>> {
        let client = client.clone();
        let database = database.to_string();

        self.runtime.block_on(async {
            let db = client.database(&database);
            let mut names = db.list_collection_names().await?;
            names.sort_unstable_by_key(|name| name.to_lowercase());
            Ok(names)
        })
    }
}

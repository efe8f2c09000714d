//! Common test utilities and fixtures for integration tests.
//!
//! Most tests are pure: corpora are built in memory with `doc!` and fed straight
//! into the analyzer. Tests of the sampling layer run against a MongoDB 7.0
//! container shared per test binary (each `tests/*.rs` file is its own binary),
//! with every database name suffixed by a short UUID for isolation.
//!
//! `ConnectionManager` blocks on its own runtime, so those tests are plain
//! `#[test]` functions and seeding goes through short-lived runtimes here.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::OnceLock;

use mangoschema::schema::{AggregateState, DocumentProfile, RawIndex};
use mongodb::bson::Document;
use mongodb::{Client, IndexModel, options::ClientOptions};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

/// Fold a corpus into a fresh aggregate, one document at a time.
pub fn fold(docs: &[Document], max_depth: usize) -> AggregateState {
    let mut state = AggregateState::new();
    for doc in docs {
        state.merge(&DocumentProfile::from_document(doc, max_depth));
    }
    state
}

/// Parse `listIndexes`-shaped documents.
pub fn raw_indexes(entries: &[Document]) -> Vec<RawIndex> {
    entries
        .iter()
        .map(|entry| RawIndex::from_document(entry).expect("Failed to parse index entry"))
        .collect()
}

// =============================================================================
// Shared MongoDB container
// =============================================================================

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();

/// Docker container ID, kept globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the shared container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Start the container once per test binary on a thread that keeps it alive.
fn shared_connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let connection_string = format!("mongodb://{}:{}", host, port);

                let opts = ClientOptions::parse(&connection_string).await.expect("Failed to parse");
                let ready = Client::with_options(opts).expect("Failed to create client");
                for _ in 0..30 {
                    if ready.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(ready);

                tx.send(connection_string).expect("Failed to send connection string");

                // Park forever; the container lives until the process exits.
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// Handle to the shared container with a per-test database namespace.
pub struct MongoTestContainer {
    pub connection_string: String,
    test_id: String,
}

impl MongoTestContainer {
    pub fn start() -> Self {
        let connection_string = shared_connection_string().to_string();
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        Self { connection_string, test_id }
    }

    /// Namespaced database name for this test.
    pub fn db_name(&self, name: &str) -> String {
        format!("{}_{}", name, self.test_id)
    }

    /// Run `f` against a fresh client on a short-lived runtime.
    fn with_client<F, Fut>(&self, f: F)
    where
        F: FnOnce(Client) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create seeding runtime");
        rt.block_on(async {
            let client = Client::with_uri_str(&self.connection_string)
                .await
                .expect("Failed to create client");
            f(client).await;
        });
    }

    /// Insert documents into `db.collection` (namespaced).
    pub fn insert_many(&self, db: &str, collection: &str, docs: Vec<Document>) {
        let db = self.db_name(db);
        let collection = collection.to_string();
        self.with_client(|client| async move {
            client
                .database(&db)
                .collection::<Document>(&collection)
                .insert_many(docs)
                .await
                .expect("Failed to insert documents");
        });
    }

    /// Create an index on `db.collection` (namespaced).
    pub fn create_index(&self, db: &str, collection: &str, index: IndexModel) {
        let db = self.db_name(db);
        let collection = collection.to_string();
        self.with_client(|client| async move {
            client
                .database(&db)
                .collection::<Document>(&collection)
                .create_index(index)
                .await
                .expect("Failed to create index");
        });
    }
}

//! Schema sampling operations.

use futures::TryStreamExt;
use mongodb::Client;
use mongodb::bson::Document;

use crate::config::AnalysisConfig;
use crate::connection::ConnectionManager;
use crate::error::{Error, Result};
use crate::schema::{SchemaAnalyzer, SchemaReport};

impl ConnectionManager {
    /// Number of documents a run over `config` will see: matches of the query,
    /// capped by the limit.
    pub fn count_sample(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        config: &AnalysisConfig,
    ) -> Result<u64> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let query = config.query.clone();
        let limit = config.limit;

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let matching = coll.count_documents(query).await?;
            Ok(limit.map_or(matching, |limit| matching.min(limit)))
        })
    }

    /// Stream the sampled documents through a [`SchemaAnalyzer`] and compile the
    /// result together with the collection's indexes.
    pub fn analyze_collection(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        config: &AnalysisConfig,
    ) -> Result<SchemaReport> {
        config.validate()?;

        let declared = self.count_sample(client, database, collection, config)?;
        if declared == 0 {
            log::warn!("Collection {database}.{collection} has no matching documents");
            return Err(Error::InvalidSample { declared: 0, observed: 0 });
        }
        let raw_indexes = self.list_indexes(client, database, collection)?;

        let mut analyzer = SchemaAnalyzer::new(config.max_depth)?;
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let query = config.query.clone();
        let sort = config.sort.clone();
        let limit = config.limit;

        let analyzer: Result<SchemaAnalyzer> = self.runtime.block_on(async move {
            let coll = client.database(&database).collection::<Document>(&collection);
            let mut find = coll.find(query).sort(sort);
            if let Some(limit) = limit {
                find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
            }

            let mut cursor = find.await?;
            while let Some(doc) = cursor.try_next().await? {
                analyzer.observe(&doc);
            }
            Ok(analyzer)
        });

        analyzer?.finish(declared, &raw_indexes)
    }
}

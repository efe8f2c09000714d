//! Analysis settings, read from relaxed JSON.

use std::fmt;
use std::fs;
use std::path::Path;

use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::validate_max_depth;

pub const DEFAULT_MAX_DEPTH: usize = 99;

/// How key frequencies are rendered.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ascii,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Ascii => write!(f, "ascii"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Settings for one analysis run. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub collection: Option<String>,
    /// Filter applied to the sampled documents.
    pub query: Document,
    pub sort: Document,
    /// Cap on the number of sampled documents; `None` samples every match.
    pub limit: Option<u64>,
    pub max_depth: usize,
    pub output_format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            collection: None,
            query: Document::new(),
            sort: doc! { "_id": -1 },
            limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
            output_format: OutputFormat::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a JSON5 document (comments, unquoted keys and trailing commas allowed).
    pub fn from_json5_str(input: &str) -> Result<Self> {
        json5::from_str(input).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json5_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_depth(self.max_depth)?;
        if self.collection.as_deref() == Some("") {
            return Err(Error::InvalidConfiguration("collection name is empty".to_string()));
        }
        if self.limit == Some(0) {
            return Err(Error::InvalidConfiguration("limit must be positive".to_string()));
        }
        Ok(())
    }

    /// Log every effective setting.
    pub fn log_settings(&self) {
        let collection = self.collection.as_deref().unwrap_or("<unset>");
        let limit = self.limit.map_or_else(|| "all".to_string(), |n| n.to_string());
        log::info!("Using collection of {collection}");
        log::info!("Using query of {}", extjson(&self.query));
        log::info!("Using limit of {limit}");
        log::info!("Using maxDepth of {}", self.max_depth);
        log::info!("Using sort of {}", extjson(&self.sort));
        log::info!("Using outputFormat of {}", self.output_format);
    }
}

fn extjson(doc: &Document) -> serde_json::Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

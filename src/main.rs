use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mangoschema::config::{AnalysisConfig, OutputFormat};
use mangoschema::connection::ConnectionManager;
use mangoschema::hooks::HookSet;
use mangoschema::schema::render_ascii_table;

/// Infer a storage schema from a sample of a MongoDB collection.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// MongoDB connection string.
    #[clap(long)]
    uri: String,

    /// Database holding the collection.
    #[clap(long)]
    db: String,

    /// Collection to sample. Overrides `collection` from the config file.
    #[clap(long)]
    collection: Option<String>,

    /// JSON5 file with analysis settings (query, sort, limit, maxDepth, outputFormat).
    #[clap(long)]
    config: Option<PathBuf>,

    /// Maximum nesting depth to descend into.
    #[clap(long)]
    max_depth: Option<usize>,

    /// Maximum number of documents to sample.
    #[clap(long)]
    limit: Option<u64>,

    /// Rendering of the key-frequency table.
    #[clap(value_enum, long)]
    format: Option<OutputFormat>,
}

impl Cli {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(collection) = &self.collection {
            config.collection = Some(collection.clone());
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let hooks = HookSet::new();

    let config = hooks.apply_config(cli.analysis_config()?);
    config.validate().context("Invalid configuration")?;
    config.log_settings();

    let Some(collection) = config.collection.clone() else {
        bail!("No collection given; pass --collection or set `collection` in the config file");
    };

    let manager = ConnectionManager::new().context("Failed to start runtime")?;
    let client = manager.connect(&cli.uri).context("Failed to connect")?;

    let collections = manager
        .list_collection_names(&client, &cli.db)
        .with_context(|| format!("Failed to list collections in {}", cli.db))?;
    if !collections.contains(&collection) {
        bail!("Collection {}.{} does not exist", cli.db, collection);
    }

    let report = manager
        .analyze_collection(&client, &cli.db, &collection, &config)
        .with_context(|| format!("Failed to analyze {}.{}", cli.db, collection))?;

    let custom = hooks.format_results(&report);
    if custom.is_empty() {
        match config.output_format {
            OutputFormat::Ascii => println!("{}", render_ascii_table(&report.key_frequencies)),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report.key_frequencies)?)
            }
        }
    } else {
        for output in custom {
            println!("{output}");
        }
    }

    println!("{}", report.to_json()?);
    Ok(())
}

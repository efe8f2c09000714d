//! Integration tests for analysis settings, hooks and rendering.
//!
//! No MongoDB container needed.

mod common;

use common::fixtures;
use mangoschema::config::{AnalysisConfig, OutputFormat};
use mangoschema::hooks::{AnalysisHook, HookSet};
use mangoschema::schema::{SchemaReport, analyze, render_ascii_table};

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_overrides_defaults() {
    let config = AnalysisConfig::from_json5_str(
        "{ collection: 'orders', sort: { total: 1 }, maxDepth: 2, outputFormat: 'json' }",
    )
    .expect("Failed to parse config");

    assert_eq!(config.collection.as_deref(), Some("orders"));
    assert!(config.sort.contains_key("total"));
    assert_eq!(config.max_depth, 2);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_drives_analysis_depth() {
    let config = AnalysisConfig::from_json5_str("{ maxDepth: 1 }").expect("Failed to parse config");
    let docs = fixtures::generate_test_documents(3);
    let report = analyze(&docs, 3, &[], config.max_depth).expect("Failed to analyze");

    assert!(report.key_frequencies.iter().all(|row| !row.key.contains('.')));
}

// =============================================================================
// Hooks
// =============================================================================

struct JsonOnly;

impl AnalysisHook for JsonOnly {
    fn name(&self) -> &str {
        "json-only"
    }

    fn on_config(&self, config: &AnalysisConfig) -> Option<AnalysisConfig> {
        Some(AnalysisConfig { output_format: OutputFormat::Json, ..config.clone() })
    }

    fn format_results(&self, report: &SchemaReport) -> Option<String> {
        report.to_json().ok()
    }
}

#[test]
fn test_hooks_rewrite_config_and_format() {
    let mut hooks = HookSet::new();
    hooks.register(Box::new(JsonOnly));

    let config = hooks.apply_config(AnalysisConfig::default());
    assert_eq!(config.output_format, OutputFormat::Json);

    let report = analyze(fixtures::people(), 2, &[], config.max_depth).expect("Failed to analyze");
    let outputs = hooks.format_results(&report);
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].contains("\"RowSchema\""));
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_ascii_table_for_people() {
    let report = analyze(fixtures::people(), 2, &[], 99).expect("Failed to analyze");
    let table = render_ascii_table(&report.key_frequencies);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("+--") && lines[0].ends_with("-+"));
    assert_eq!(lines[0], lines[6]);
    assert_eq!(lines[1], "| key  | types  | occurrences | percents |");
    assert_eq!(lines[5], "| age  | Number |           1 |     50.0 |");
}

#[test]
fn test_ascii_table_with_fractional_percents() {
    let report = analyze(fixtures::orders(), 3, &[], 99).expect("Failed to analyze");
    let table = render_ascii_table(&report.key_frequencies);

    assert!(table.contains("66.67"));
    assert!(table.contains("33.33"));
    assert!(table.contains("String (1),Null (1),Number (1)"));
}

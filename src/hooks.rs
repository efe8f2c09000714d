//! Extension points around an analysis run.

use crate::config::AnalysisConfig;
use crate::schema::SchemaReport;

/// A hook may rewrite the configuration before a run and render the report after it.
pub trait AnalysisHook: Send + Sync {
    fn name(&self) -> &str;

    /// Return a replacement config, or `None` to keep the current one.
    fn on_config(&self, _config: &AnalysisConfig) -> Option<AnalysisConfig> {
        None
    }

    /// Return a custom rendering of the report, or `None` to produce nothing.
    fn format_results(&self, _report: &SchemaReport) -> Option<String> {
        None
    }
}

/// Hooks applied in registration order.
#[derive(Default)]
pub struct HookSet {
    hooks: Vec<Box<dyn AnalysisHook>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Box<dyn AnalysisHook>) {
        log::debug!("Registered hook {}", hook.name());
        self.hooks.push(hook);
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Thread the config through every hook; each sees the previous hook's result.
    pub fn apply_config(&self, config: AnalysisConfig) -> AnalysisConfig {
        self.hooks.iter().fold(config, |current, hook| match hook.on_config(&current) {
            Some(replaced) => {
                log::debug!("Hook {} replaced the configuration", hook.name());
                replaced
            }
            None => current,
        })
    }

    /// Collect every hook's rendering of the report.
    pub fn format_results(&self, report: &SchemaReport) -> Vec<String> {
        self.hooks.iter().filter_map(|hook| hook.format_results(report)).collect()
    }
}

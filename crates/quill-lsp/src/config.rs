//! Server configuration and on-disk schema loading.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use eyre::WrapErr;
use quill_complete::{AllPlugins, Dataset, EnabledPlugins, PluginGates, StaticDatasets};
use quill_schema::Schema;

/// Everything the server needs before it can answer requests. Built once
/// at startup; the server itself is immutable apart from document state.
pub struct ServerConfig {
    pub schema: Schema,
    pub datasets: StaticDatasets,
    pub gates: Arc<dyn PluginGates>,
}

impl ServerConfig {
    pub fn new(schema: Schema, datasets: StaticDatasets) -> Self {
        ServerConfig {
            schema,
            datasets,
            gates: Arc::new(AllPlugins),
        }
    }

    /// Restrict plugin-gated schema branches to the named plugins.
    pub fn with_plugins<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gates = Arc::new(EnabledPlugins::new(plugins));
        self
    }
}

/// Load a schema from its JSON file.
pub fn load_schema(path: &Path) -> eyre::Result<Schema> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading schema {}", path.display()))?;
    serde_json::from_str(&source)
        .wrap_err_with(|| format!("parsing schema {}", path.display()))
}

/// Load named datasets from a JSON file: an object mapping dataset names
/// to literal/description maps.
pub fn load_datasets(path: &Path) -> eyre::Result<StaticDatasets> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading datasets {}", path.display()))?;
    let by_name: HashMap<String, Dataset> = serde_json::from_str(&source)
        .wrap_err_with(|| format!("parsing datasets {}", path.display()))?;
    let mut datasets = StaticDatasets::new();
    for (name, dataset) in by_name {
        datasets.insert(name, dataset);
    }
    Ok(datasets)
}

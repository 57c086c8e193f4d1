//! External collaborator interfaces: datasets and plugin gates.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

/// One entry of a named dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub literal: String,
    pub description: Option<String>,
}

/// An ordered enumeration of literals, resolved by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub entries: Vec<DatasetEntry>,
}

impl Dataset {
    pub fn from_pairs<I, L, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, D)>,
        L: Into<String>,
        D: Into<String>,
    {
        Dataset {
            entries: pairs
                .into_iter()
                .map(|(literal, description)| DatasetEntry {
                    literal: literal.into(),
                    description: Some(description.into()),
                })
                .collect(),
        }
    }
}

// On disk a dataset is a JSON object mapping literal to description (or
// null). Entry order is meaningful, so this mirrors the order-preserving
// map visitor used for schemas.
impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DatasetVisitor;

        impl<'de> Visitor<'de> for DatasetVisitor {
            type Value = Dataset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of literals to descriptions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Dataset, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((literal, description)) =
                    map.next_entry::<String, Option<String>>()?
                {
                    entries.push(DatasetEntry {
                        literal,
                        description,
                    });
                }
                Ok(Dataset { entries })
            }
        }

        deserializer.deserialize_map(DatasetVisitor)
    }
}

/// Resolves named enumerations. This is the engine's single asynchronous
/// boundary: a resolution call suspends here at most once and holds no
/// state across the await.
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    /// The dataset registered under `name`, or `None` if unknown.
    async fn get_enum(&self, name: &str) -> Option<Dataset>;
}

/// In-memory dataset provider, used by loaders and tests.
#[derive(Debug, Default)]
pub struct StaticDatasets {
    datasets: HashMap<String, Dataset>,
}

impl StaticDatasets {
    pub fn new() -> Self {
        StaticDatasets::default()
    }

    pub fn with(mut self, name: impl Into<String>, dataset: Dataset) -> Self {
        self.datasets.insert(name.into(), dataset);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) {
        self.datasets.insert(name.into(), dataset);
    }
}

#[async_trait]
impl DatasetProvider for StaticDatasets {
    async fn get_enum(&self, name: &str) -> Option<Dataset> {
        self.datasets.get(name).cloned()
    }
}

/// Answers whether a plugin-gated schema branch is active. Elements with
/// no gate always pass.
pub trait PluginGates: Send + Sync {
    fn is_enabled(&self, plugin: &str) -> bool;
}

/// Gate provider that enables everything (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPlugins;

impl PluginGates for AllPlugins {
    fn is_enabled(&self, _plugin: &str) -> bool {
        true
    }
}

/// Gate provider backed by an explicit enabled set.
#[derive(Debug, Clone, Default)]
pub struct EnabledPlugins {
    enabled: Vec<String>,
}

impl EnabledPlugins {
    pub fn new<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnabledPlugins {
            enabled: plugins.into_iter().map(Into::into).collect(),
        }
    }
}

impl PluginGates for EnabledPlugins {
    fn is_enabled(&self, plugin: &str) -> bool {
        self.enabled.iter().any(|p| p == plugin)
    }
}

impl fmt::Display for DatasetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} ({description})", self.literal),
            None => f.write_str(&self.literal),
        }
    }
}

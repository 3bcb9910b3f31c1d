/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Attribute index configuration.
//!
//! Sizes each category's table and lists names to pre-register, so that
//! well-known features get the same low indices on every start.
//!
//! The expected YAML structure is:
//! ```yaml
//! categories:
//!   node_feature:
//!     capacity: 128
//!     names: [rack1, gpu]
//!   gres:
//!     capacity: 32
//! ```
//!
//! Categories that are not listed keep their default capacity and start
//! empty.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::index::AttrCategory;

/// Smallest accepted capacity: the reserved slot plus one usable slot.
pub const MIN_CAPACITY: usize = 2;

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexConfigFile {
    #[serde(default)]
    categories: BTreeMap<AttrCategory, CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    capacity: Option<usize>,
    #[serde(default)]
    names: Vec<String>,
}

// ── IndexConfig ───────────────────────────────────────────────────────────────

/// Per-category settings for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CategorySettings {
    capacity: usize,
    names: Vec<String>,
}

/// Capacities and seed names for every [`AttrCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    categories: [CategorySettings; AttrCategory::COUNT],
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            categories: AttrCategory::ALL.map(|c| CategorySettings {
                capacity: c.default_capacity(),
                names: Vec::new(),
            }),
        }
    }
}

impl IndexConfig {
    /// Reads and validates a YAML configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed or
    /// names an unknown category, or a capacity is below [`MIN_CAPACITY`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading index configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        for category in AttrCategory::ALL {
            debug!(
                "  {}: capacity {} | {} seed name(s)",
                category,
                config.capacity(category),
                config.names(category).len(),
            );
        }
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: IndexConfigFile = serde_yaml::from_str(yaml).context("Malformed YAML")?;

        let mut config = Self::default();
        for (category, entry) in file.categories {
            if let Some(capacity) = entry.capacity {
                config = config.with_capacity(category, capacity)?;
            }
            config = config.with_names(category, entry.names);
        }
        Ok(config)
    }

    /// Overrides the capacity of `category`.
    ///
    /// # Errors
    /// Fails if `capacity` is below [`MIN_CAPACITY`].
    pub fn with_capacity(mut self, category: AttrCategory, capacity: usize) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            bail!(
                "capacity of '{}' must be at least {} (got {})",
                category,
                MIN_CAPACITY,
                capacity
            );
        }
        self.categories[category.as_index()].capacity = capacity;
        Ok(self)
    }

    /// Replaces the seed names of `category`.
    pub fn with_names<I, S>(mut self, category: AttrCategory, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories[category.as_index()].names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Slot count of `category`, reserved slot included.
    pub fn capacity(&self, category: AttrCategory) -> usize {
        self.categories[category.as_index()].capacity
    }

    /// Names to register in `category`, in order, when the index is built.
    pub fn names(&self, category: AttrCategory) -> &[String] {
        &self.categories[category.as_index()].names
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{AttributeIndex, LookupMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn default_uses_category_defaults() {
        let cfg = IndexConfig::default();
        assert_eq!(cfg.capacity(AttrCategory::NodeFeature), 128);
        assert_eq!(cfg.capacity(AttrCategory::GRes), 128);
        assert_eq!(cfg.capacity(AttrCategory::GMetric), 64);
        assert!(cfg.names(AttrCategory::Opsys).is_empty());
    }

    #[test]
    fn load_yaml_with_capacities_and_names() {
        let yaml = r#"
categories:
  node_feature:
    capacity: 16
    names: [rack1, gpu]
  gres:
    capacity: 32
"#;
        let f = yaml_tempfile(yaml);
        let cfg = IndexConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.capacity(AttrCategory::NodeFeature), 16);
        assert_eq!(cfg.names(AttrCategory::NodeFeature), ["rack1", "gpu"]);
        assert_eq!(cfg.capacity(AttrCategory::GRes), 32);
        assert!(cfg.names(AttrCategory::GRes).is_empty());
        // unlisted categories keep their default
        assert_eq!(cfg.capacity(AttrCategory::Arch), 128);
    }

    #[test]
    fn names_without_capacity_keep_default_capacity() {
        let yaml = "categories:\n  opsys:\n    names: [linux]\n";
        let cfg = IndexConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.capacity(AttrCategory::Opsys), 128);
        assert_eq!(cfg.names(AttrCategory::Opsys), ["linux"]);
    }

    #[test]
    fn empty_document_sections_are_accepted() {
        let cfg = IndexConfig::from_yaml_str("categories: {}\n").unwrap();
        assert_eq!(cfg, IndexConfig::default());
    }

    #[test]
    fn capacity_below_two_is_rejected() {
        let yaml = "categories:\n  arch:\n    capacity: 1\n";
        let err = IndexConfig::from_yaml_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("at least 2"), "{err:#}");

        let cfg = IndexConfig::default();
        assert!(cfg.with_capacity(AttrCategory::Arch, 2).is_ok());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let yaml = "categories:\n  licenses:\n    capacity: 8\n";
        assert!(IndexConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let yaml = "categories:\n  arch:\n    size: 8\n";
        assert!(IndexConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let path = Path::new("/nonexistent/path/index.yaml");
        assert!(IndexConfig::load_from_file(path).is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(IndexConfig::load_from_file(f.path()).is_err());
    }

    // ── AttributeIndex::from_config ───────────────────────────────────────────

    #[test]
    fn seed_names_get_indices_in_order() {
        let cat = AttrCategory::NodeFeature;
        let cfg = IndexConfig::default().with_names(cat, ["rack1", "gpu"]);
        let idx = AttributeIndex::from_config(&cfg);
        assert_eq!(idx.get_or_add_index(cat, "rack1", LookupMode::Verify), 1);
        assert_eq!(idx.get_or_add_index(cat, "gpu", LookupMode::Verify), 2);
    }

    #[test]
    fn overflowing_seed_names_are_skipped() {
        let cfg = IndexConfig::default()
            .with_capacity(AttrCategory::GRes, 3)
            .unwrap()
            .with_names(AttrCategory::GRes, ["a", "b", "c", "d"]);
        let idx = AttributeIndex::from_config(&cfg);

        assert_eq!(idx.len(AttrCategory::GRes), 2);
        assert_eq!(idx.capacity(AttrCategory::GRes), 3);
        assert_eq!(idx.overflow(AttrCategory::GRes).as_deref(), Some("c"));
    }

    #[test]
    fn duplicate_seed_names_share_an_index() {
        let names = ["x86_64", "X86_64"];
        let cfg = IndexConfig::default().with_names(AttrCategory::Arch, names);
        let idx = AttributeIndex::from_config(&cfg);
        assert_eq!(idx.len(AttrCategory::Arch), 1);
    }
}

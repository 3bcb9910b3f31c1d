/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::UnknownCategory;

// ── Default capacities ────────────────────────────────────────────────────────

/// Default slot count for the general attribute categories (features, OS,
/// architecture, generic events).  Includes the reserved slot 0.
pub const DEFAULT_ATTR_CAPACITY: usize = 128;

/// Default slot count for generic resources.
pub const DEFAULT_GRES_CAPACITY: usize = 128;

/// Default slot count for generic metrics.
pub const DEFAULT_GMETRIC_CAPACITY: usize = 64;

// ── AttrCategory ──────────────────────────────────────────────────────────────

/// A namespace of attribute names, each with its own index table.
///
/// The same name (e.g. `"gpu"`) may be registered in several categories and
/// gets independent indices in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrCategory {
    /// Node features (`rack1`, `gpu`, `bigmem`, ...).
    NodeFeature,
    /// Operating system names.
    Opsys,
    /// Architecture names.
    Arch,
    /// Generic resource names.
    #[serde(rename = "gres")]
    GRes,
    /// Job features.
    JobFeature,
    /// Generic event names.
    #[serde(rename = "gevent")]
    GEvent,
    /// Generic metric names.
    #[serde(rename = "gmetric")]
    GMetric,
}

impl AttrCategory {
    /// Every category, in table order.
    pub const ALL: [AttrCategory; 7] = [
        AttrCategory::NodeFeature,
        AttrCategory::Opsys,
        AttrCategory::Arch,
        AttrCategory::GRes,
        AttrCategory::JobFeature,
        AttrCategory::GEvent,
        AttrCategory::GMetric,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this category in per-category arrays.
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Short label used in log output.
    pub fn label(self) -> &'static str {
        match self {
            AttrCategory::NodeFeature => "Feature",
            AttrCategory::Opsys => "Opsys",
            AttrCategory::Arch => "Arch",
            AttrCategory::GRes => "GRes",
            AttrCategory::JobFeature => "JFeature",
            AttrCategory::GEvent => "GEvent",
            AttrCategory::GMetric => "GMetric",
        }
    }

    /// Slot count used when no configuration overrides it.
    pub fn default_capacity(self) -> usize {
        match self {
            AttrCategory::GRes => DEFAULT_GRES_CAPACITY,
            AttrCategory::GMetric => DEFAULT_GMETRIC_CAPACITY,
            _ => DEFAULT_ATTR_CAPACITY,
        }
    }
}

impl fmt::Display for AttrCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttrCategory {
    type Err = UnknownCategory;

    /// Accepts kebab-case, snake_case and the short labels, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "node_feature" | "feature" | "nfeature" => Ok(AttrCategory::NodeFeature),
            "opsys" | "os" => Ok(AttrCategory::Opsys),
            "arch" => Ok(AttrCategory::Arch),
            "gres" => Ok(AttrCategory::GRes),
            "job_feature" | "jfeature" => Ok(AttrCategory::JobFeature),
            "gevent" => Ok(AttrCategory::GEvent),
            "gmetric" | "gmetrics" => Ok(AttrCategory::GMetric),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_index_matches_all_order() {
        for (i, cat) in AttrCategory::ALL.iter().enumerate() {
            assert_eq!(cat.as_index(), i);
        }
    }

    #[test]
    fn parses_kebab_snake_and_labels() {
        assert_eq!("node-feature".parse(), Ok(AttrCategory::NodeFeature));
        assert_eq!("NODE_FEATURE".parse(), Ok(AttrCategory::NodeFeature));
        assert_eq!("Feature".parse(), Ok(AttrCategory::NodeFeature));
        assert_eq!("gres".parse(), Ok(AttrCategory::GRes));
        assert_eq!("JFeature".parse(), Ok(AttrCategory::JobFeature));
        assert_eq!("gmetrics".parse(), Ok(AttrCategory::GMetric));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "licenses".parse::<AttrCategory>().unwrap_err();
        assert_eq!(err, UnknownCategory("licenses".into()));
    }

    #[test]
    fn default_capacities() {
        assert_eq!(AttrCategory::NodeFeature.default_capacity(), 128);
        assert_eq!(AttrCategory::GRes.default_capacity(), 128);
        assert_eq!(AttrCategory::GMetric.default_capacity(), 64);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(AttrCategory::JobFeature.to_string(), "JFeature");
    }
}

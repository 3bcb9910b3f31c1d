/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-category name table and its immutable snapshot.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, warn};

use super::AttrCategory;
use crate::error::IndexError;
use crate::names::NameTable;

// ── CategoryTable ─────────────────────────────────────────────────────────────

/// Append-only name table for one category.
///
/// `names[0]` is the reserved empty slot; assigned names occupy
/// `names[1..]` densely, so `names.len()` is the populated length.  The name
/// vector sits behind an `Arc` so [`CategorySnapshot`]s are a refcount bump;
/// an append while a snapshot is alive copies the vector (`Arc::make_mut`).
#[derive(Debug, Clone)]
pub(crate) struct CategoryTable {
    category: AttrCategory,
    names: Arc<Vec<String>>,
    capacity: usize,
    version: u64,
    overflow: Option<String>,
}

impl CategoryTable {
    pub(crate) fn new(category: AttrCategory, capacity: usize) -> Self {
        Self {
            category,
            names: Arc::new(vec![String::new()]),
            capacity,
            version: 0,
            overflow: None,
        }
    }

    /// Case-insensitive lookup over the assigned slots.
    pub(crate) fn find(&self, name: &str) -> Option<NonZeroUsize> {
        self.names
            .iter()
            .skip(1)
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(|pos| NonZeroUsize::new(pos + 1))
    }

    /// Returns the index of `name`, appending it when absent.
    ///
    /// Fails with [`IndexError::CapacityExhausted`] once `capacity - 1` names
    /// are registered.  The first rejected name is remembered as the
    /// category's overflow name.
    pub(crate) fn find_or_append(&mut self, name: &str) -> Result<NonZeroUsize, IndexError> {
        if name.is_empty() {
            return Err(IndexError::EmptyName);
        }
        if let Some(index) = self.find(name) {
            return Ok(index);
        }

        let next = self.names.len();
        if next >= self.capacity {
            if self.overflow.is_none() {
                self.overflow = Some(name.to_string());
            }
            warn!(
                category = %self.category,
                name,
                capacity = self.capacity,
                "no empty slots in attribute table (increase capacity)"
            );
            return Err(IndexError::CapacityExhausted {
                category: self.category,
                name: name.to_string(),
                capacity: self.capacity,
            });
        }

        Arc::make_mut(&mut self.names).push(name.to_string());
        self.version += 1;

        debug!(
            category = %self.category,
            index = next,
            name,
            "adding attribute name"
        );

        // next >= 1 because slot 0 always exists
        NonZeroUsize::new(next).ok_or(IndexError::EmptyName)
    }

    pub(crate) fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub(crate) fn populated_len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn overflow(&self) -> Option<&str> {
        self.overflow.as_deref()
    }

    pub(crate) fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            category: self.category,
            names: Arc::clone(&self.names),
            version: self.version,
        }
    }
}

// ── CategorySnapshot ──────────────────────────────────────────────────────────

/// Immutable, versioned view of one category's names.
///
/// Taken from [`AttributeIndex::snapshot`](super::AttributeIndex::snapshot).
/// Later appends to the live table are not visible; compare
/// [`version`](Self::version) to detect them.
#[derive(Debug, Clone)]
pub struct CategorySnapshot {
    category: AttrCategory,
    names: Arc<Vec<String>>,
    version: u64,
}

impl CategorySnapshot {
    pub fn category(&self) -> AttrCategory {
        self.category
    }

    /// Number of appends the table had seen when the snapshot was taken.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of assigned names (slot 0 excluded).
    pub fn len(&self) -> usize {
        self.names.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(index, name)` pairs of every assigned slot, in index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, n)| (i, n.as_str()))
    }
}

impl NameTable for CategorySnapshot {
    fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    fn populated_len(&self) -> usize {
        self.names.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table(capacity: usize) -> CategoryTable {
        CategoryTable::new(AttrCategory::NodeFeature, capacity)
    }

    #[test]
    fn first_name_gets_index_one() {
        let mut t = table(8);
        assert_eq!(t.find_or_append("rack1").unwrap().get(), 1);
        assert_eq!(t.populated_len(), 2);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut t = table(8);
        t.find_or_append("Rack1").unwrap();
        assert_eq!(t.find("RACK1").map(NonZeroUsize::get), Some(1));
        assert_eq!(t.find_or_append("rack1").unwrap().get(), 1);
        assert_eq!(t.name_at(1), Some("Rack1"), "first spelling is kept");
    }

    #[test]
    fn full_table_rejects_and_records_overflow() {
        let mut t = table(3);
        t.find_or_append("a").unwrap();
        t.find_or_append("b").unwrap();

        let err = t.find_or_append("c").unwrap_err();
        assert_eq!(
            err,
            IndexError::CapacityExhausted {
                category: AttrCategory::NodeFeature,
                name: "c".into(),
                capacity: 3,
            }
        );
        assert_eq!(t.populated_len(), 3, "table must not grow");
        assert_eq!(t.overflow(), Some("c"));

        t.find_or_append("d").unwrap_err();
        // only the first overflow is kept
        assert_eq!(t.overflow(), Some("c"));
    }

    #[test]
    fn existing_names_still_resolve_when_full() {
        let mut t = table(2);
        t.find_or_append("a").unwrap();
        assert_eq!(t.find_or_append("A").unwrap().get(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut t = table(4);
        assert_eq!(t.find_or_append(""), Err(IndexError::EmptyName));
        assert_eq!(t.populated_len(), 1);
    }

    #[test]
    fn snapshot_is_isolated_from_later_appends() {
        let mut t = table(8);
        t.find_or_append("a").unwrap();
        let snap = t.snapshot();

        t.find_or_append("b").unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.version(), 1);
        assert_eq!(t.snapshot().version(), 2);
        assert_eq!(t.snapshot().populated_len(), 3);
    }

    #[test]
    fn snapshot_entries_skip_reserved_slot() {
        let mut t = table(8);
        t.find_or_append("x").unwrap();
        t.find_or_append("y").unwrap();
        let snap = t.snapshot();
        let entries: Vec<_> = snap.entries().collect();
        assert_eq!(entries, vec![(1, "x"), (2, "y")]);
        assert_eq!(snap.index_of("Y"), Some(2));
    }
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Attribute index tables.
//!
//! [`AttributeIndex`] turns symbolic attribute names into stable small
//! integers, one append-only table per [`AttrCategory`].  Those integers are
//! the bit positions used in [`Bitmap`]s.
//!
//! # Contract
//!
//! | Property | Guarantee |
//! |---|---|
//! | Index 0 | Reserved ("NONE" / not found); never assigned |
//! | Matching | Case-insensitive, exact |
//! | Assignment order | Insertion order, dense from 1 |
//! | Reuse / compaction | Never; an index is stable for the process lifetime |
//! | Full table | `Add` returns 0 (and logs); existing names still resolve |
//! | Concurrency | One mutex guards scan **and** append, so two threads racing to add the same new name get the same index |
//!
//! The evaluator and the text codecs work on [`CategorySnapshot`]s so they
//! never hold the lock while iterating.

mod category;
mod table;

pub use category::{
    AttrCategory, DEFAULT_ATTR_CAPACITY, DEFAULT_GMETRIC_CAPACITY, DEFAULT_GRES_CAPACITY,
};
pub use table::CategorySnapshot;

use std::num::NonZeroUsize;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::bitmap::text::to_names;
use crate::bitmap::Bitmap;
use crate::config::IndexConfig;
use crate::error::{EvalError, IndexError};
use crate::logic::{self, LogicMode, Verdict};
use table::CategoryTable;

// ── Modes ─────────────────────────────────────────────────────────────────────

/// How [`AttributeIndex::get_or_add_index`] treats an unknown name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Report not-found (index 0).
    #[default]
    Verify,
    /// Append the name if there is room.
    Add,
}

/// What [`AttributeIndex::apply`] does to the target bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Clear the bitmap, then behave like [`ApplyMode::Add`].
    Set,
    /// Register the name if needed and set its bit.
    Add,
    /// Set the bit only if the name is already registered.
    Verify,
    /// Unset the bit if the name is registered.
    Unset,
    /// Clear the bitmap; the name is ignored.
    Clear,
}

/// Separators between names in a feature line.
const LIST_DELIMS: &[char] = &[' ', ':', '[', ']', '\t', '|'];

/// Characters that terminate a feature line.
const LIST_TERMINATORS: &[char] = &[';', '#', '\n'];

// ── AttributeIndex ────────────────────────────────────────────────────────────

/// Process-wide registry of attribute names, one table per category.
#[derive(Debug)]
pub struct AttributeIndex {
    tables: Mutex<[CategoryTable; AttrCategory::COUNT]>,
}

impl Default for AttributeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeIndex {
    /// Creates an index with every category at its default capacity.
    pub fn new() -> Self {
        Self::with_capacities(AttrCategory::default_capacity)
    }

    /// Creates an index whose capacities come from `capacity(category)`.
    pub fn with_capacities(capacity: impl Fn(AttrCategory) -> usize) -> Self {
        let table = |c: AttrCategory| CategoryTable::new(c, capacity(c));
        let tables = AttrCategory::ALL.map(table);
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Creates an index sized by `config` and pre-registers its seed names,
    /// in order.  Seed names that do not fit are logged and skipped.
    pub fn from_config(config: &IndexConfig) -> Self {
        let index = Self::with_capacities(|c| config.capacity(c));

        for category in AttrCategory::ALL {
            let mut seeded = 0usize;
            for name in config.names(category) {
                match index.try_add(category, name) {
                    Ok(_) => seeded += 1,
                    Err(e) => {
                        warn!(category = %category, name = %name, "skipping seed name: {e}")
                    }
                }
            }
            if seeded > 0 {
                info!(
                    category = %category,
                    seeded,
                    capacity = config.capacity(category),
                    "seeded attribute table"
                );
            }
        }
        index
    }

    // ── Registration / lookup ─────────────────────────────────────────────────

    /// Looks up `name` in `category`, appending it when `mode` is
    /// [`LookupMode::Add`].
    ///
    /// Returns the index, or `0` when the name is empty, unknown in `Verify`
    /// mode, or the table is full in `Add` mode.  A full table is logged at
    /// `warn` and leaves the table unchanged.
    pub fn get_or_add_index(&self, category: AttrCategory, name: &str, mode: LookupMode) -> usize {
        let found = match mode {
            LookupMode::Verify => self.lookup(category, name),
            LookupMode::Add => self.try_add(category, name).ok(),
        };
        found.map_or(0, NonZeroUsize::get)
    }

    /// Typed `Add`: returns the existing or newly assigned index.
    pub fn try_add(&self, category: AttrCategory, name: &str) -> Result<NonZeroUsize, IndexError> {
        let mut tables = self.tables.lock();
        tables[category.as_index()].find_or_append(name)
    }

    /// Typed `Verify`: returns the index of an already registered name.
    pub fn lookup(&self, category: AttrCategory, name: &str) -> Option<NonZeroUsize> {
        if name.is_empty() {
            return None;
        }
        self.tables.lock()[category.as_index()].find(name)
    }

    /// Name registered at `index`, if any.  Index 0 has no name.
    pub fn name_of(&self, category: AttrCategory, index: usize) -> Option<String> {
        if index == 0 {
            return None;
        }
        self.tables.lock()[category.as_index()]
            .name_at(index)
            .map(str::to_string)
    }

    /// Populated range `[0, n)` of `category` (slot 0 included).
    pub fn populated_len(&self, category: AttrCategory) -> usize {
        self.tables.lock()[category.as_index()].populated_len()
    }

    /// Number of registered names in `category`.
    pub fn len(&self, category: AttrCategory) -> usize {
        self.populated_len(category) - 1
    }

    /// Returns `true` if `category` has no registered names.
    pub fn is_empty(&self, category: AttrCategory) -> bool {
        self.len(category) == 0
    }

    /// Configured slot count of `category` (slot 0 included).
    pub fn capacity(&self, category: AttrCategory) -> usize {
        self.tables.lock()[category.as_index()].capacity()
    }

    /// First name that could not be registered because `category` was full.
    pub fn overflow(&self, category: AttrCategory) -> Option<String> {
        self.tables.lock()[category.as_index()]
            .overflow()
            .map(str::to_string)
    }

    /// Immutable view of `category` for iteration and rendering.
    pub fn snapshot(&self, category: AttrCategory) -> CategorySnapshot {
        self.tables.lock()[category.as_index()].snapshot()
    }

    // ── Bitmap helpers ────────────────────────────────────────────────────────

    /// Resolves `name` and applies it to `bitmap` according to `mode`.
    ///
    /// Returns the resolved index, or `0` when nothing was resolved (empty or
    /// unknown name, full table, or [`ApplyMode::Clear`]).
    pub fn apply(
        &self,
        category: AttrCategory,
        name: &str,
        mode: ApplyMode,
        bitmap: &mut Bitmap,
    ) -> usize {
        match mode {
            ApplyMode::Clear => {
                bitmap.clear();
                0
            }
            ApplyMode::Set => {
                bitmap.clear();
                self.apply(category, name, ApplyMode::Add, bitmap)
            }
            ApplyMode::Add => match self.try_add(category, name) {
                Ok(index) => {
                    bitmap.set(index.get());
                    index.get()
                }
                Err(_) => 0,
            },
            ApplyMode::Verify => match self.lookup(category, name) {
                Some(index) => {
                    bitmap.set(index.get());
                    index.get()
                }
                None => 0,
            },
            ApplyMode::Unset => match self.lookup(category, name) {
                Some(index) => {
                    bitmap.unset(index.get());
                    index.get()
                }
                None => 0,
            },
        }
    }

    /// Parses a feature line into `bitmap`.
    ///
    /// ```text
    /// FORMAT:  <ATTR>[{:|[] \t}<ATTR>]...[;|#|\n <ignored>]
    /// ```
    ///
    /// `bitmap` is cleared first and each token is applied with `mode`
    /// ([`ApplyMode::Set`] behaves as `Add` after the initial clear).  Returns
    /// the number of tokens that resolved to an index.
    pub fn parse_list(
        &self,
        category: AttrCategory,
        line: &str,
        mode: ApplyMode,
        bitmap: &mut Bitmap,
    ) -> usize {
        bitmap.clear();
        if mode == ApplyMode::Clear {
            return 0;
        }
        let mode = if mode == ApplyMode::Set {
            ApplyMode::Add
        } else {
            mode
        };

        let line = line.split(LIST_TERMINATORS).next().unwrap_or("");
        let mut resolved = 0usize;
        let tokens = line.split(LIST_DELIMS);
        for token in tokens.filter(|t| !t.is_empty()) {
            if self.apply(category, token, mode, bitmap) != 0 {
                resolved += 1;
            }
        }

        debug!(
            category = %category,
            line,
            resolved,
            "parsed attribute list"
        );
        resolved
    }

    /// Renders `bitmap` with `category`'s names.
    ///
    /// `Some(c)` joins names with `c`; `None` produces the bracketed form
    /// `[a][b]`.  Returns `""` for an empty map.
    pub fn render(&self, category: AttrCategory, bitmap: &Bitmap, delim: Option<char>) -> String {
        let snapshot = self.snapshot(category);
        match delim {
            Some(c) => {
                let mut buf = [0u8; 4];
                let delim = c.encode_utf8(&mut buf);
                to_names(bitmap, &snapshot, Some(delim), None)
            }
            None => to_names(bitmap, &snapshot, Some("["), None),
        }
    }

    /// Subset evaluation bounded by `category`'s populated range.
    ///
    /// See [`logic::evaluate`].
    pub fn evaluate(
        &self,
        category: AttrCategory,
        available: Option<&Bitmap>,
        required: Option<&Bitmap>,
        mode: LogicMode,
    ) -> Result<Verdict, EvalError> {
        logic::evaluate(available, required, mode, &self.snapshot(category))
    }
}

// ── Process-wide instance ─────────────────────────────────────────────────────

static GLOBAL: OnceCell<AttributeIndex> = OnceCell::new();

/// Returns the process-wide index, creating it with default capacities on
/// first use.
pub fn global() -> &'static AttributeIndex {
    GLOBAL.get_or_init(AttributeIndex::new)
}

/// Installs a configured process-wide index.
///
/// Must run before the first call to [`global`]; afterwards it returns
/// [`IndexError::AlreadyInitialized`] and leaves the existing index in place.
pub fn init_global(config: &IndexConfig) -> Result<&'static AttributeIndex, IndexError> {
    let mut installed = false;
    let index = GLOBAL.get_or_init(|| {
        installed = true;
        AttributeIndex::from_config(config)
    });
    if installed {
        Ok(index)
    } else {
        Err(IndexError::AlreadyInitialized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Name-table abstraction.
//!
//! A name table maps small integer indices to symbolic attribute names.  Slot
//! `0` is always reserved ("NONE") and real names are dense-packed from index
//! `1` upward; the first empty slot terminates the table.
//!
//! The bitmap text codecs ([`crate::bitmap::text`]) and the subset evaluator
//! ([`crate::logic`]) consume tables only through this trait, so they work the
//! same over a caller-supplied string array and over a
//! [`CategorySnapshot`](crate::index::CategorySnapshot) taken from the shared
//! [`AttributeIndex`](crate::index::AttributeIndex).

/// Read-only lookup from index to name and back.
pub trait NameTable {
    /// Name stored at `index`, or `None` if the slot does not exist.
    fn name_at(&self, index: usize) -> Option<&str>;

    /// Length of the populated range `[0, n)`: slot 0 plus every contiguous
    /// non-empty name from index 1 upward.
    ///
    /// This is the iteration bound used by the evaluator and the text
    /// renderer.
    fn populated_len(&self) -> usize;

    /// Case-insensitive exact-match lookup over the populated range.
    ///
    /// Slot 0 never matches.
    fn index_of(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        let matches = |n: &str| n.eq_ignore_ascii_case(name);
        (1..self.populated_len())
            .find(|&i| self.name_at(i).is_some_and(matches))
    }
}

impl<S: AsRef<str>> NameTable for [S] {
    fn name_at(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }

    fn populated_len(&self) -> usize {
        1 + self
            .iter()
            .skip(1)
            .take_while(|name| !name.as_ref().is_empty())
            .count()
    }
}

impl<S: AsRef<str>, const N: usize> NameTable for [S; N] {
    fn name_at(&self, index: usize) -> Option<&str> {
        self.as_slice().name_at(index)
    }

    fn populated_len(&self) -> usize {
        self.as_slice().populated_len()
    }
}

impl<S: AsRef<str>> NameTable for Vec<S> {
    fn name_at(&self, index: usize) -> Option<&str> {
        self.as_slice().name_at(index)
    }

    fn populated_len(&self) -> usize {
        self.as_slice().populated_len()
    }
}

impl<T: NameTable + ?Sized> NameTable for &T {
    fn name_at(&self, index: usize) -> Option<&str> {
        (**self).name_at(index)
    }

    fn populated_len(&self) -> usize {
        (**self).populated_len()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        (**self).index_of(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

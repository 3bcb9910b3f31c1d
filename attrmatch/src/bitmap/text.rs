/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Symbolic text form of a [`Bitmap`].
//!
//! A bitmap renders as the names of its set bits, looked up in a caller
//! supplied [`NameTable`] and joined with a delimiter:
//!
//! ```text
//! table  = ["NONE", "alpha", "beta", "gamma"]
//! bits   = {1, 3}
//! ","    -> "alpha,gamma"
//! "["    -> "[alpha][gamma]"
//! ```
//!
//! Slot 0 is reserved and never rendered.  Parsing is the inverse, except that
//! unrecognised names are skipped rather than rejected.

use tracing::debug;

use super::Bitmap;
use crate::names::NameTable;

/// Separator used by [`to_names`] when none is given.
pub const DEFAULT_DELIM: &str = ",";

/// Token separators used by [`from_names`] when none are given.
pub const DEFAULT_PARSE_DELIMS: &str = ",[] \t\n";

/// Renders the set bits of `bitmap` as a delimited list of names.
///
/// * `delim` defaults to `","`.  A delimiter starting with `[` switches to
///   the bracketed form `[a][b]` with no separator.
/// * When no bit in the table's populated range is set, `empty` is returned
///   (or `""` if `empty` is `None`).
pub fn to_names<T>(bitmap: &Bitmap, table: &T, delim: Option<&str>, empty: Option<&str>) -> String
where
    T: NameTable + ?Sized,
{
    let delim = delim.unwrap_or(DEFAULT_DELIM);
    let bracketed = delim.starts_with('[');

    let mut out = String::new();
    let set = (1..table.populated_len()).filter(|&i| bitmap.is_set(i));
    for index in set {
        let Some(name) = table.name_at(index) else {
            break;
        };
        if bracketed {
            out.push('[');
            out.push_str(name);
            out.push(']');
        } else {
            if !out.is_empty() {
                out.push_str(delim);
            }
            out.push_str(name);
        }
    }

    if out.is_empty() {
        if let Some(empty) = empty {
            out.push_str(empty);
        }
    }
    out
}

/// Parses a delimited list of names into `bitmap`.
///
/// `bitmap` is cleared first.  `delims` is a set of separator characters
/// (default [`DEFAULT_PARSE_DELIMS`]).  Each token is resolved
/// case-insensitively through `table`; unknown tokens are skipped.
///
/// Returns `false` (leaving `bitmap` clear) when `text` is empty.
pub fn from_names<T>(text: &str, table: &T, delims: Option<&str>, bitmap: &mut Bitmap) -> bool
where
    T: NameTable + ?Sized,
{
    bitmap.clear();

    if text.is_empty() {
        return false;
    }

    let delims = delims.unwrap_or(DEFAULT_PARSE_DELIMS);
    let tokens = text.split(|c: char| delims.contains(c));
    for token in tokens.filter(|t| !t.is_empty()) {
        match table.index_of(token) {
            Some(index) => bitmap.set(index),
            None => debug!(token, "ignoring name not present in table"),
        }
    }
    true
}

/// Convenience wrapper around [`from_names`] that returns a fresh bitmap.
pub fn parse_names<T>(text: &str, table: &T, delims: Option<&str>) -> Bitmap
where
    T: NameTable + ?Sized,
{
    let mut bitmap = Bitmap::new();
    from_names(text, table, delims, &mut bitmap);
    bitmap
}

// ── Tests ─────────────────────────────────────────────────────────────────────

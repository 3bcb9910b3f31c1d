/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Feature requirement gate.
//!
//! A [`FeatureRequirement`] is what a job asks of a node: a set of features
//! combined under a [`LogicMode`], and an optional exclusion set.  The gate
//! runs two checks, in order:
//!
//! | # | Check | Rejects with |
//! |---|---|---|
//! | 1 | `required` is satisfied by the node's features under `mode` | [`RejectReason::InadequateFeatures`] |
//! | 2 | `excluded` is non-empty and is satisfied under `excluded_mode` | [`RejectReason::ExcludedFeatures`] |
//!
//! The exclusion check rejects on a *match*: with `excluded_mode = OR`, any
//! excluded feature present on the node disqualifies it.

use tracing::debug;

use crate::bitmap::text::to_names;
use crate::bitmap::Bitmap;
use crate::error::RejectReason;
use crate::index::{ApplyMode, AttrCategory, AttributeIndex};
use crate::logic::{evaluate, LogicMode, Verdict};
use crate::names::NameTable;

/// Rendered in place of an empty feature list.
const NONE_LABEL: &str = "NONE";

/// Features a job asks of a node, plus features that disqualify a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRequirement {
    pub required: Bitmap,
    pub mode: LogicMode,
    pub excluded: Bitmap,
    pub excluded_mode: LogicMode,
}

impl FeatureRequirement {
    /// Builds a requirement from feature lines, registering unknown names in
    /// `category`.
    ///
    /// Lines use the [`AttributeIndex::parse_list`] format.  `excluded` may be
    /// `None` for "no exclusions".
    pub fn parse(
        index: &AttributeIndex,
        category: AttrCategory,
        required: &str,
        mode: LogicMode,
        excluded: Option<&str>,
        excluded_mode: LogicMode,
    ) -> Self {
        let mut req = Self {
            mode,
            excluded_mode,
            ..Self::default()
        };
        index.parse_list(category, required, ApplyMode::Add, &mut req.required);
        if let Some(line) = excluded {
            index.parse_list(category, line, ApplyMode::Add, &mut req.excluded);
        }
        req
    }

    /// Checks `available` against this requirement.
    ///
    /// `table` supplies the evaluation bound and the names used in the
    /// rejection message; pass a snapshot of the same category the bitmaps
    /// were built from.
    pub fn check<T>(&self, available: &Bitmap, table: &T) -> Result<(), RejectReason>
    where
        T: NameTable + ?Sized,
    {
        let verdict = evaluate(Some(available), Some(&self.required), self.mode, table)?;
        if verdict == Verdict::NotSatisfied {
            let reason = RejectReason::InadequateFeatures {
                needed: to_names(&self.required, table, None, Some(NONE_LABEL)),
                found: to_names(available, table, None, Some(NONE_LABEL)),
            };
            debug!(mode = %self.mode, "requirement rejected: {reason}");
            return Err(reason);
        }

        if self.excluded.is_clear() {
            return Ok(());
        }
        let verdict = evaluate(
            Some(available),
            Some(&self.excluded),
            self.excluded_mode,
            table,
        )?;
        if verdict.is_satisfied() {
            let reason = RejectReason::ExcludedFeatures {
                excluded: to_names(&self.excluded, table, None, Some(NONE_LABEL)),
                found: to_names(available, table, None, Some(NONE_LABEL)),
            };
            debug!(mode = %self.excluded_mode, "requirement rejected: {reason}");
            return Err(reason);
        }

        Ok(())
    }
}

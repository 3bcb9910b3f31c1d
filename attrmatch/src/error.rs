/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for attribute matching.
//!
//! Three layers can fail:
//!
//! * [`IndexError`]: registering or resolving a name in an
//!   [`AttributeIndex`](crate::index::AttributeIndex) category.
//! * [`EvalError`]: a subset evaluation was handed a missing operand.
//! * [`RejectReason`]: a [`FeatureRequirement`](crate::requirement::FeatureRequirement)
//!   did not accept an available feature set.  This one is a normal outcome,
//!   not a fault, but it carries the rendered feature lists so the caller can
//!   log *why* without re-rendering.
//!
//! Sentinel-returning entry points
//! ([`get_or_add_index`](crate::index::AttributeIndex::get_or_add_index),
//! [`apply`](crate::index::AttributeIndex::apply)) are thin wrappers that map
//! these errors to index `0`.

use thiserror::Error;

use crate::index::AttrCategory;

// ── Index errors ──────────────────────────────────────────────────────────────

/// Failure to register or resolve a name in the attribute index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Names must be non-empty; the empty string is the table terminator.
    #[error("attribute name is empty")]
    EmptyName,

    /// Every usable slot of the category is taken.
    ///
    /// `capacity` counts the reserved slot 0, so `capacity - 1` names fit.
    #[error("no empty slots for '{name}' in {category} table (capacity {capacity})")]
    CapacityExhausted {
        category: AttrCategory,
        name: String,
        capacity: usize,
    },

    /// [`init_global`](crate::index::init_global) was called after the
    /// process-wide index had already been created.
    #[error("process-wide attribute index is already initialised")]
    AlreadyInitialized,
}

/// A category name that does not match any [`AttrCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute category: '{0}' (valid: node-feature, opsys, arch, gres, job-feature, gevent, gmetric)")]
pub struct UnknownCategory(pub String);

// ── Evaluator errors ──────────────────────────────────────────────────────────

/// Which side of a subset evaluation was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Available,
    Required,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Available => write!(f, "available"),
            Operand::Required => write!(f, "required"),
        }
    }
}

/// Invalid input to [`evaluate`](crate::logic::evaluate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An operand bitmap was absent.  This is never treated as vacuously
    /// satisfied.
    #[error("{operand} bitmap is missing")]
    MissingOperand { operand: Operand },
}

/// A logic-mode string that is not `and`, `or` or `not`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown logic mode: '{0}' (valid: and, or, not)")]
pub struct UnknownLogicMode(pub String);

// ── Requirement rejection ─────────────────────────────────────────────────────

/// Why an available feature set failed a
/// [`FeatureRequirement`](crate::requirement::FeatureRequirement).
///
/// Feature lists are pre-rendered with `,` as delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The required features were not satisfied under the requirement's mode.
    #[error("inadequate features ({needed} needed, {found} found)")]
    InadequateFeatures { needed: String, found: String },

    /// The available set matched the exclusion list.
    #[error("excluded features ({excluded} excluded, {found} found)")]
    ExcludedFeatures { excluded: String, found: String },

    /// The evaluator refused its input.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

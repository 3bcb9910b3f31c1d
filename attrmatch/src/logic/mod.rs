/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Required-vs-available subset evaluation.
//!
//! Decides whether a *required* attribute bitmap is satisfied by an
//! *available* one under a three-valued [`LogicMode`].  Only indices in
//! `[0, bound)` are examined, where `bound` is the populated length of the
//! category's name table.  Bits above it belong to no registered name and are
//! ignored.
//!
//! # Truth table
//!
//! | Mode | `Satisfied` iff | Empty `required` |
//! |---|---|---|
//! | `AND` | every required bit is also available | `Satisfied` |
//! | `OR`  | at least one required bit is also available | `NotSatisfied` |
//! | `NOT` | no required bit is also available | `Satisfied` |
//!
//! A job that requires nothing passes every `AND` eligibility check.
//!
//! `NOT` rejects on the first index where both maps have the bit set.  It is
//! the negation of `OR` and is **not** "required is a proper non-subset".

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::bitmap::{Bitmap, WORD_BITS};
use crate::error::{EvalError, Operand, UnknownLogicMode};
use crate::names::NameTable;

// ── LogicMode ─────────────────────────────────────────────────────────────────

/// How the required bits are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicMode {
    /// Required must be a subset of available.
    #[default]
    And,
    /// Some required bit must be available.
    Or,
    /// No required bit may be available.
    Not,
}

impl fmt::Display for LogicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicMode::And => write!(f, "AND"),
            LogicMode::Or => write!(f, "OR"),
            LogicMode::Not => write!(f, "NOT"),
        }
    }
}

impl FromStr for LogicMode {
    type Err = UnknownLogicMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" | "&" | "&&" => Ok(LogicMode::And),
            "or" | "|" | "||" => Ok(LogicMode::Or),
            "not" | "!" => Ok(LogicMode::Not),
            _ => Err(UnknownLogicMode(s.to_string())),
        }
    }
}

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Outcome of a subset evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    NotSatisfied,
}

impl Verdict {
    pub fn is_satisfied(self) -> bool {
        self == Verdict::Satisfied
    }

    fn from_bool(ok: bool) -> Self {
        if ok {
            Verdict::Satisfied
        } else {
            Verdict::NotSatisfied
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "satisfied"),
            Verdict::NotSatisfied => write!(f, "not satisfied"),
        }
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// Evaluates `required` against `available` over indices `[0, bound)`.
///
/// Pure and total.  Works a word at a time; the result is identical to
/// scanning each index in order and stopping at the first decisive bit.
pub fn subset(available: &Bitmap, required: &Bitmap, mode: LogicMode, bound: usize) -> Verdict {
    // words past `required`'s storage read as zero and decide nothing
    let words = bound.div_ceil(WORD_BITS).min(required.word_capacity());

    // `missing`: some required bit is absent from available.
    // `overlap`: some required bit is also present in available.
    let mut missing = false;
    let mut overlap = false;

    for w in 0..words {
        let mut req = required.word(w);
        let tail = bound - w * WORD_BITS;
        if tail < WORD_BITS {
            req &= (1u64 << tail) - 1;
        }
        if req == 0 {
            continue;
        }

        let avl = available.word(w);
        missing |= req & !avl != 0;
        overlap |= req & avl != 0;

        match mode {
            LogicMode::And if missing => return Verdict::NotSatisfied,
            LogicMode::Or if overlap => return Verdict::Satisfied,
            LogicMode::Not if overlap => return Verdict::NotSatisfied,
            _ => {}
        }
    }

    match mode {
        LogicMode::And => Verdict::from_bool(!missing),
        LogicMode::Or => Verdict::from_bool(overlap),
        LogicMode::Not => Verdict::from_bool(!overlap),
    }
}

/// Evaluates `required` against `available`, bounded by `table`'s populated
/// range.
///
/// # Errors
/// [`EvalError::MissingOperand`] if either bitmap is `None`.  A missing map
/// is an invalid argument and never counts as vacuously satisfied.
pub fn evaluate<T>(
    available: Option<&Bitmap>,
    required: Option<&Bitmap>,
    mode: LogicMode,
    table: &T,
) -> Result<Verdict, EvalError>
where
    T: NameTable + ?Sized,
{
    let available = available.ok_or(EvalError::MissingOperand {
        operand: Operand::Available,
    })?;
    let required = required.ok_or(EvalError::MissingOperand {
        operand: Operand::Required,
    })?;

    let bound = table.populated_len();
    let verdict = subset(available, required, mode, bound);

    trace!(
        mode = %mode,
        bound,
        available = ?available,
        required = ?required,
        verdict = %verdict,
        "attribute subset evaluated"
    );

    Ok(verdict)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [&str; 3] = ["NONE", "rack1", "gpu"];

    fn bm(bits: &[usize]) -> Bitmap {
        bits.iter().copied().collect()
    }

    fn eval(a: &Bitmap, r: &Bitmap, mode: LogicMode) -> Verdict {
        evaluate(Some(a), Some(r), mode, &TABLE).unwrap()
    }

    /// Reference implementation: per-index scan in the documented order.
    fn oracle(a: &Bitmap, r: &Bitmap, mode: LogicMode, bound: usize) -> Verdict {
        let required: Vec<usize> = (0..bound).filter(|&i| r.is_set(i)).collect();
        let ok = match mode {
            LogicMode::And => required.iter().all(|&i| a.is_set(i)),
            LogicMode::Or => required.iter().any(|&i| a.is_set(i)),
            LogicMode::Not => !required.iter().any(|&i| a.is_set(i)),
        };
        Verdict::from_bool(ok)
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn rack1_available_rack1_gpu_required() {
        let a = bm(&[1]);
        let r = bm(&[1, 2]);
        assert_eq!(
            eval(&a, &r, LogicMode::And),
            Verdict::NotSatisfied,
            "gpu missing"
        );
        assert_eq!(
            eval(&a, &r, LogicMode::Or),
            Verdict::Satisfied,
            "rack1 matches"
        );
        assert_eq!(
            eval(&a, &r, LogicMode::Not),
            Verdict::NotSatisfied,
            "rack1 agrees"
        );
    }

    #[test]
    fn both_empty() {
        let a = Bitmap::new();
        let r = Bitmap::new();
        assert_eq!(eval(&a, &r, LogicMode::And), Verdict::Satisfied);
        assert_eq!(eval(&a, &r, LogicMode::Or), Verdict::NotSatisfied);
        assert_eq!(eval(&a, &r, LogicMode::Not), Verdict::Satisfied);
    }

    #[test]
    fn empty_required_is_independent_of_available() {
        let r = Bitmap::new();
        for a in [Bitmap::new(), bm(&[1]), bm(&[0, 1, 2])] {
            assert_eq!(eval(&a, &r, LogicMode::And), Verdict::Satisfied);
            assert_eq!(eval(&a, &r, LogicMode::Or), Verdict::NotSatisfied);
            assert_eq!(eval(&a, &r, LogicMode::Not), Verdict::Satisfied);
        }
    }

    #[test]
    fn not_mode_satisfied_when_disjoint() {
        let (a, r) = (bm(&[1]), bm(&[2]));
        assert_eq!(eval(&a, &r, LogicMode::Not), Verdict::Satisfied);
    }

    #[test]
    fn and_mode_satisfied_by_superset() {
        let (a, r) = (bm(&[1, 2]), bm(&[2]));
        assert_eq!(eval(&a, &r, LogicMode::And), Verdict::Satisfied);
    }

    #[test]
    fn bits_beyond_populated_range_are_ignored() {
        // index 5 has no name in TABLE (populated range is [0, 3))
        let a = bm(&[1]);
        let r = bm(&[1, 5]);
        assert_eq!(eval(&a, &r, LogicMode::And), Verdict::Satisfied);

        let only = bm(&[5]);
        assert_eq!(eval(&only, &only, LogicMode::Or), Verdict::NotSatisfied);
        assert_eq!(eval(&only, &only, LogicMode::Not), Verdict::Satisfied);
    }

    #[test]
    fn reserved_slot_zero_is_inside_the_range() {
        let zero = bm(&[0]);
        let none = Bitmap::new();
        assert_eq!(eval(&none, &zero, LogicMode::And), Verdict::NotSatisfied);
        assert_eq!(eval(&zero, &zero, LogicMode::Or), Verdict::Satisfied);
    }

    #[test]
    fn bound_splits_a_word_correctly() {
        let a = Bitmap::new();
        let r = bm(&[64, 65]);
        assert_eq!(subset(&a, &r, LogicMode::And, 65), Verdict::NotSatisfied);
        assert_eq!(subset(&a, &r, LogicMode::And, 64), Verdict::Satisfied);

        let b = bm(&[200]);
        assert_eq!(subset(&b, &b, LogicMode::Or, 201), Verdict::Satisfied);
        assert_eq!(subset(&b, &b, LogicMode::Or, 200), Verdict::NotSatisfied);
    }

    #[test]
    fn unbounded_range_stops_at_required_storage() {
        let a = bm(&[1]);
        let r = bm(&[1, 2]);

        let v = subset(&a, &r, LogicMode::And, usize::MAX);
        assert_eq!(v, Verdict::NotSatisfied);
        let v = subset(&a, &r, LogicMode::Or, usize::MAX);
        assert_eq!(v, Verdict::Satisfied);
        let v = subset(&a, &Bitmap::new(), LogicMode::Or, usize::MAX);
        assert_eq!(v, Verdict::NotSatisfied);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = bm(&[1]);
        let r = bm(&[1, 2]);
        let (a0, r0) = (a.clone(), r.clone());
        for mode in [LogicMode::And, LogicMode::Or, LogicMode::Not] {
            eval(&a, &r, mode);
        }
        assert_eq!(a, a0);
        assert_eq!(r, r0);
    }

    // ── Laws, exhaustively over a small width ─────────────────────────────────

    #[test]
    fn and_or_not_laws_hold_for_all_six_bit_maps() {
        const WIDTH: usize = 6;

        fn from_mask(m: u32) -> Bitmap {
            (0..WIDTH).filter(|i| (m >> i) & 1 == 1).collect()
        }

        for bound in [0, 1, 3, WIDTH] {
            for am in 0..(1u32 << WIDTH) {
                for rm in 0..(1u32 << WIDTH) {
                    let a = from_mask(am);
                    let r = from_mask(rm);
                    for mode in [LogicMode::And, LogicMode::Or, LogicMode::Not] {
                        assert_eq!(
                            subset(&a, &r, mode, bound),
                            oracle(&a, &r, mode, bound),
                            "mode={mode} bound={bound} a={a:?} r={r:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn not_is_negation_of_or() {
        let maps = [
            Bitmap::new(),
            bm(&[1]),
            bm(&[2]),
            bm(&[1, 2]),
            bm(&[0, 2]),
        ];
        for a in &maps {
            for r in &maps {
                let or = eval(a, r, LogicMode::Or).is_satisfied();
                let not = eval(a, r, LogicMode::Not).is_satisfied();
                assert_ne!(or, not, "a={a:?} r={r:?}");
            }
        }
    }

    // ── Errors / parsing ──────────────────────────────────────────────────────

    #[test]
    fn missing_operands_are_errors() {
        let b = Bitmap::new();
        assert_eq!(
            evaluate(None, Some(&b), LogicMode::And, &TABLE),
            Err(EvalError::MissingOperand {
                operand: Operand::Available
            })
        );
        assert_eq!(
            evaluate(Some(&b), None, LogicMode::Or, &TABLE),
            Err(EvalError::MissingOperand {
                operand: Operand::Required
            })
        );
    }

    #[test]
    fn logic_mode_parses_words_and_symbols() {
        assert_eq!("AND".parse(), Ok(LogicMode::And));
        assert_eq!("or".parse(), Ok(LogicMode::Or));
        assert_eq!(" Not ".parse(), Ok(LogicMode::Not));
        assert_eq!("&".parse(), Ok(LogicMode::And));
        assert_eq!("|".parse(), Ok(LogicMode::Or));
        assert_eq!("!".parse(), Ok(LogicMode::Not));
        assert!("xor".parse::<LogicMode>().is_err());
    }

    #[test]
    fn logic_mode_display_is_upper_case() {
        assert_eq!(LogicMode::Not.to_string(), "NOT");
    }
}

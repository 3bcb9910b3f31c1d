/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Growable attribute bitmap.
//!
//! A [`Bitmap`] records "this object has attribute *N*" for small integer
//! attribute indices handed out by the [`AttributeIndex`].  Owners (a node's
//! feature set, a job's required features, a credential's flags) embed the
//! bitmap by value; there is no sharing or reference counting.
//!
//! # Storage model
//!
//! | Aspect | Behaviour |
//! |---|---|
//! | Backing store | `Vec<u64>`, little-endian bit order inside each word |
//! | Growth | [`Bitmap::set`] extends the word vector on demand; no index is too large |
//! | Absent words | Read as zero: `is_set` past the end is `false`, `unset` past the end is a no-op |
//! | `clear()` vs `release()` | `clear` zeroes the words and keeps the allocation; `release` drops it |
//! | Equality | Trailing zero words are equivalent to absent words |
//!
//! Allocation failure while growing is **fatal**: the global allocator aborts
//! the process.  There is no fallible `set`.
//!
//! [`AttributeIndex`]: crate::index::AttributeIndex

pub mod text;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAndAssign, BitOrAssign};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Number of bits stored in one backing word.
pub const WORD_BITS: usize = u64::BITS as usize;

#[inline]
fn word_of(index: usize) -> usize {
    index / WORD_BITS
}

#[inline]
fn mask_of(index: usize) -> u64 {
    1u64 << (index % WORD_BITS)
}

/// Mask selecting the low `bits` bits of a word (`bits` in `1..=64`).
#[inline]
fn low_mask(bits: usize) -> u64 {
    if bits >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

// ── Bitmap ────────────────────────────────────────────────────────────────────

/// A dynamically sized set of boolean flags indexed by `usize`.
#[derive(Clone, Default)]
pub struct Bitmap {
    words: Vec<u64>,
}

impl Bitmap {
    /// Creates an empty bitmap with no backing storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an all-zero bitmap with room for at least `bits` flags.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(WORD_BITS)],
        }
    }

    // ── Single-bit operations ─────────────────────────────────────────────────

    /// Marks bit `index` as set, growing the backing storage if needed.
    ///
    /// Idempotent.  Growth failure aborts through the global allocator.
    pub fn set(&mut self, index: usize) {
        let word = word_of(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= mask_of(index);
    }

    /// Marks bit `index` as clear.  No-op when `index` is beyond capacity.
    pub fn unset(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(word_of(index)) {
            *word &= !mask_of(index);
        }
    }

    /// Sets or unsets bit `index` depending on `value`.
    pub fn set_bool(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            self.unset(index);
        }
    }

    /// Returns `true` if bit `index` is set.  Bits beyond capacity read as
    /// unset.
    pub fn is_set(&self, index: usize) -> bool {
        self.words
            .get(word_of(index))
            .is_some_and(|word| word & mask_of(index) != 0)
    }

    /// Copies the single bit at `index` from `src` into `self`.
    pub fn copy_bit(&mut self, src: &Bitmap, index: usize) {
        self.set_bool(index, src.is_set(index));
    }

    // ── Whole-map operations ──────────────────────────────────────────────────

    /// Zeroes every word.  The allocation is kept for reuse.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Drops the backing storage entirely (the owner's "destroy" step).
    pub fn release(&mut self) {
        self.words = Vec::new();
    }

    /// Returns `true` if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Sets every bit in `[0, max)`.
    pub fn set_all(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        self.ensure_bits(max);

        let full = max / WORD_BITS;
        self.words[..full].fill(u64::MAX);

        let rem = max % WORD_BITS;
        if rem > 0 {
            self.words[full] |= low_mask(rem);
        }
    }

    /// Returns `true` if every bit in `[0, max)` is set.  Vacuously `true`
    /// for `max == 0`.
    pub fn is_set_all(&self, max: usize) -> bool {
        let full = max / WORD_BITS;
        let rem = max % WORD_BITS;

        if (0..full).any(|w| self.word(w) != u64::MAX) {
            return false;
        }
        rem == 0 || self.word(full) & low_mask(rem) == low_mask(rem)
    }

    /// Deep copy of `src` into `self`.  The two maps share no storage
    /// afterwards.
    pub fn copy_from(&mut self, src: &Bitmap) {
        self.words.clear();
        self.words.extend_from_slice(&src.words);
    }

    /// In-place union: `self |= src`.
    pub fn union_with(&mut self, src: &Bitmap) {
        if src.words.len() > self.words.len() {
            self.words.resize(src.words.len(), 0);
        }
        for (dst, &s) in self.words.iter_mut().zip(&src.words) {
            *dst |= s;
        }
    }

    /// In-place intersection: `self &= src`.
    ///
    /// Bits of `self` beyond `src`'s storage are cleared, since `src` reads
    /// them as unset.
    pub fn intersect_with(&mut self, src: &Bitmap) {
        for (i, dst) in self.words.iter_mut().enumerate() {
            *dst &= src.words.get(i).copied().unwrap_or(0);
        }
    }

    /// Complements every bit in `[0, max)`; bits at or above `max` are left
    /// untouched.
    pub fn negate(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        self.ensure_bits(max);

        let full = max / WORD_BITS;
        for word in &mut self.words[..full] {
            *word = !*word;
        }

        let rem = max % WORD_BITS;
        if rem > 0 {
            self.words[full] ^= low_mask(rem);
        }
    }

    /// Compares two bitmaps.
    ///
    /// Returns [`Ordering::Equal`] iff both maps agree on every bit (trailing
    /// zero words are ignored).  Unequal maps are ordered by their highest
    /// differing bit; only the equal / not-equal distinction is meant to be
    /// relied upon.
    pub fn compare(&self, other: &Bitmap) -> Ordering {
        let a = self.normalized();
        let b = other.normalized();
        a.len()
            .cmp(&b.len())
            .then_with(|| a.iter().rev().cmp(b.iter().rev()))
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    /// Number of allocated backing words.
    pub fn word_capacity(&self) -> usize {
        self.words.len()
    }

    /// Number of bits addressable without growing.
    pub fn bit_capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Highest set index, or `None` for a clear map.
    pub fn highest_set(&self) -> Option<usize> {
        let word = self.words.iter().rposition(|&w| w != 0)?;
        let top = WORD_BITS - 1 - self.words[word].leading_zeros() as usize;
        Some(word * WORD_BITS + top)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the set indices in ascending order.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Debug rendering of the raw storage: one `0`/`1` per allocated bit,
    /// lowest bit first, with `_` between bytes.  An unallocated map renders
    /// as `<empty>`.
    ///
    /// ```text
    /// bits {1, 3, 9} -> "01010000_01000000_00000000_..."
    /// ```
    pub fn to_bit_string(&self) -> String {
        if self.words.is_empty() {
            return String::from("<empty>");
        }

        let bits = self.bit_capacity();
        let mut out = String::with_capacity(bits + bits / 8);
        for bit in 0..bits {
            if bit > 0 && bit % 8 == 0 {
                out.push('_');
            }
            out.push(if self.is_set(bit) { '1' } else { '0' });
        }
        out
    }

    /// Word `i` of the backing store, zero when not allocated.
    pub(crate) fn word(&self, i: usize) -> u64 {
        self.words.get(i).copied().unwrap_or(0)
    }

    /// Storage with trailing zero words trimmed.
    fn normalized(&self) -> &[u64] {
        let end = self
            .words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |last| last + 1);
        &self.words[..end]
    }

    /// Grows storage so that bits `[0, bits)` are addressable.
    fn ensure_bits(&mut self, bits: usize) {
        let words = bits.div_ceil(WORD_BITS);
        if words > self.words.len() {
            self.words.resize(words, 0);
        }
    }
}

// ── Trait impls ───────────────────────────────────────────────────────────────

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Bitmap {}

impl Hash for Bitmap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

impl FromIterator<usize> for Bitmap {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut bm = Bitmap::new();
        bm.extend(iter);
        bm
    }
}

impl Extend<usize> for Bitmap {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.set(index);
        }
    }
}

impl BitOrAssign<&Bitmap> for Bitmap {
    fn bitor_assign(&mut self, rhs: &Bitmap) {
        self.union_with(rhs);
    }
}

impl BitAndAssign<&Bitmap> for Bitmap {
    fn bitand_assign(&mut self, rhs: &Bitmap) {
        self.intersect_with(rhs);
    }
}

// ── Ones iterator ─────────────────────────────────────────────────────────────

/// Ascending iterator over the set indices of a [`Bitmap`].
///
/// Produced by [`Bitmap::iter_ones`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                // drop lowest set bit
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

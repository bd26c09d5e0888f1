//! Field arithmetic and place catalogues.
//!
//! The kernel never implements a field itself. It consumes:
//!
//! - [`Field`]: exact commutative-field arithmetic with decidable equality;
//! - [`Places`]: a catalogue of rank-one *steps*. A validated sequence of
//!   steps is a place tower (see [`crate::tower`]); the tower is the
//!   canonical defining predicate of a valuation subring;
//! - [`Membership`]: an arbitrary candidate set, audited before it is
//!   trusted as a valuation subring.

use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// A commutative field with exact arithmetic.
///
/// Implementations must satisfy `zero_elem() != one_elem()`.
pub trait Field: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn zero_elem() -> Self;

    fn one_elem() -> Self;

    fn add_ref(&self, rhs: &Self) -> Self;

    fn mul_ref(&self, rhs: &Self) -> Self;

    fn neg_ref(&self) -> Self;

    /// Multiplicative inverse, `None` for zero.
    fn inv_ref(&self) -> Option<Self>;

    fn is_zero_elem(&self) -> bool {
        *self == Self::zero_elem()
    }

    fn is_one_elem(&self) -> bool {
        *self == Self::one_elem()
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        self.add_ref(&rhs.neg_ref())
    }

    /// `self / rhs`, `None` when `rhs` is zero.
    fn div_ref(&self, rhs: &Self) -> Option<Self> {
        rhs.inv_ref().map(|r| self.mul_ref(&r))
    }

    /// A small deterministic family of elements.
    ///
    /// Construction-time audits quantify over these (plus any caller
    /// witnesses) in place of the whole field.
    fn probes() -> Vec<Self>;
}

/// A field together with a catalogue of discrete rank-one places.
///
/// A tower `[s_1, …, s_n]` is admissible when every `s_i` is a place of the
/// residue field left by `s_1, …, s_{i-1}`. Its composite valuation takes
/// values in `ℤ^n` ordered lexicographically, and its valuation subring is
/// `{ x | order(x) ≥ 0 }`.
pub trait Places: Field {
    /// Canonical identifier of a rank-one step.
    type Step: Clone
        + Eq
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Serialize
        + Send
        + Sync
        + 'static;

    /// Whether `step` may extend the (already admissible) tower `prefix`.
    fn admits(prefix: &[Self::Step], step: &Self::Step) -> bool;

    /// Composite order of `x` along an admissible tower.
    ///
    /// Returns `None` exactly when `x` is zero; otherwise a vector with one
    /// coordinate per step.
    fn order(x: &Self, steps: &[Self::Step]) -> Option<Vec<i64>>;
}

/// A candidate subset of a field, given by its membership test.
pub trait Membership<F>: Send + Sync {
    fn contains(&self, x: &F) -> bool;
}

impl<F, M> Membership<F> for M
where
    M: Fn(&F) -> bool + Send + Sync,
{
    fn contains(&self, x: &F) -> bool {
        self(x)
    }
}

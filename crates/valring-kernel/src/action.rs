//! Pointwise action of field automorphisms on valuation subrings.
//!
//! `g • A = { g • x | x ∈ A }`, so `x ∈ g • A ⇔ g⁻¹ • x ∈ A`. The transported
//! subring gets its tower by moving each step along `g`; the carrier is the
//! pulled-back membership test, and the two are audited against each other
//! like any derived subring.

use crate::error::ValuationError;
use crate::field::{Membership, Places};
use crate::subring::{Origin, ValuationSubring};
use crate::tower::PlaceTower;
use std::sync::Arc;

/// A group acting on `F` by field automorphisms.
///
/// `compose` must satisfy `(g.compose(h)).act(x) == g.act(&h.act(x))`.
pub trait FieldAction<F: Places>: Clone + Send + Sync + 'static {
    fn act(&self, x: &F) -> F;

    fn inverse(&self) -> Self;

    fn compose(&self, other: &Self) -> Self;

    /// Image of `step`, where `prefix` is the untransported tower above it.
    fn transport(&self, prefix: &[F::Step], step: &F::Step) -> F::Step;
}

/// The trivial action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trivial;

impl<F: Places> FieldAction<F> for Trivial {
    fn act(&self, x: &F) -> F {
        x.clone()
    }

    fn inverse(&self) -> Self {
        Trivial
    }

    fn compose(&self, _other: &Self) -> Self {
        Trivial
    }

    fn transport(&self, _prefix: &[F::Step], step: &F::Step) -> F::Step {
        step.clone()
    }
}

impl<F: Places> ValuationSubring<F> {
    /// `g • self`.
    pub fn pointwise<G: FieldAction<F>>(&self, g: &G) -> Result<Self, ValuationError> {
        let steps = self.steps();
        let moved = steps
            .iter()
            .enumerate()
            .map(|(i, step)| g.transport(&steps[..i], step))
            .collect();
        let tower = PlaceTower::new(moved)?;

        let base = self.clone();
        let g_inv = g.inverse();
        let carrier: Arc<dyn Membership<F>> = Arc::new(move |x: &F| base.contains(&g_inv.act(x)));
        tracing::trace!(from = %self, to = %tower, "pointwise transport");
        ValuationSubring::derived(tower, carrier, Origin::Pointwise)
    }
}

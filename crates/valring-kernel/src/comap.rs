//! Restriction of valuation subrings along field embeddings.
//!
//! For `ι : E → F` and `A ⊆ F`, `ι⁻¹(A)` is a valuation subring of `E`. Its
//! tower is computed by the embedding (`contract`); its carrier is the
//! pulled-back membership test.

use crate::error::ValuationError;
use crate::field::{Membership, Places};
use crate::subring::{Origin, ValuationSubring};
use crate::tower::PlaceTower;
use std::marker::PhantomData;
use std::sync::Arc;

/// A field embedding `E → F` that knows how towers restrict.
pub trait FieldEmbedding<E: Places, F: Places>: Clone + Send + Sync + 'static {
    fn map(&self, x: &E) -> F;

    /// The tower of `ι⁻¹(A)` for the subring `A` of `steps`.
    fn contract(&self, steps: &[F::Step]) -> Vec<E::Step>;
}

/// The identity embedding of a field into itself.
pub struct Identity<F>(PhantomData<fn() -> F>);

impl<F> Identity<F> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<F> Default for Identity<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for Identity<F> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<F: Places> FieldEmbedding<F, F> for Identity<F> {
    fn map(&self, x: &F) -> F {
        x.clone()
    }

    fn contract(&self, steps: &[F::Step]) -> Vec<F::Step> {
        steps.to_vec()
    }
}

impl<F: Places> ValuationSubring<F> {
    /// `ι⁻¹(self)` as a valuation subring of `E`.
    pub fn comap<E: Places, I: FieldEmbedding<E, F>>(
        &self,
        embedding: &I,
    ) -> Result<ValuationSubring<E>, ValuationError> {
        let tower = PlaceTower::new(embedding.contract(self.steps()))?;
        let base = self.clone();
        let iota = embedding.clone();
        let carrier: Arc<dyn Membership<E>> = Arc::new(move |x: &E| base.contains(&iota.map(x)));
        tracing::trace!(from = %self, to = %tower, "comap");
        ValuationSubring::derived(tower, carrier, Origin::Comap)
    }
}

//! The prime fields `𝔽_p`.
//!
//! A finite field has no nontrivial valuations: its only valuation subring
//! is the field itself, with maximal ideal `{0}` and every nonzero element a
//! unit.

use super::is_prime;
use crate::error::ValuationError;
use crate::field::{Field, Places};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An element of `𝔽_P`, kept reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimeField<const P: u64>(u64);

impl<const P: u64> PrimeField<P> {
    const PRIME: () = assert!(is_prime(P), "modulus must be prime");

    pub fn new(value: u64) -> Self {
        let () = Self::PRIME;
        Self(value % P)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl<const P: u64> fmt::Display for PrimeField<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Field for PrimeField<P> {
    fn zero_elem() -> Self {
        Self::new(0)
    }

    fn one_elem() -> Self {
        Self::new(1)
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        Self::new(((u128::from(self.0) + u128::from(rhs.0)) % u128::from(P)) as u64)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        Self::new(super::mul_mod(self.0, rhs.0, P))
    }

    fn neg_ref(&self) -> Self {
        Self::new((P - self.0) % P)
    }

    fn inv_ref(&self) -> Option<Self> {
        super::inv_mod(self.0, P).map(Self::new)
    }

    /// The whole field when small, otherwise its first 32 elements.
    fn probes() -> Vec<Self> {
        (0..P.min(32)).map(Self::new).collect()
    }
}

/// The empty place catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoPlace {}

impl fmt::Display for NoPlace {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl FromStr for NoPlace {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Err(ValuationError::Parse(format!("prime fields have no places: {s}")))
    }
}

impl Serialize for NoPlace {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        match *self {}
    }
}

impl<const P: u64> Places for PrimeField<P> {
    type Step = NoPlace;

    fn admits(_prefix: &[NoPlace], step: &NoPlace) -> bool {
        match *step {}
    }

    fn order(x: &Self, steps: &[NoPlace]) -> Option<Vec<i64>> {
        if x.is_zero_elem() {
            return None;
        }
        Some(steps.iter().map(|s| match *s {}).collect())
    }
}

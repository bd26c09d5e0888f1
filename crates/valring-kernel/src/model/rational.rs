//! The rational numbers and their `p`-adic places.
//!
//! Every nontrivial valuation subring of `ℚ` is `ℤ_(p)` for a prime `p`, so
//! the catalogue has one step kind and towers have length at most one.

use super::{call_parts, is_prime, padic_order};
use crate::error::ValuationError;
use crate::field::{Field, Places};
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RationalPlace {
    /// `v_p`.
    Adic(u64),
}

impl fmt::Display for RationalPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adic(p) => write!(f, "adic({p})"),
        }
    }
}

impl FromStr for RationalPlace {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match call_parts(s) {
            Some(("adic", p)) => p
                .parse()
                .map(Self::Adic)
                .map_err(|_| ValuationError::Parse(format!("bad prime in {s}"))),
            _ => Err(ValuationError::Parse(format!("unknown rational place: {s}"))),
        }
    }
}

impl Serialize for RationalPlace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn ratio(n: i64, d: i64) -> BigRational {
    BigRational::new(n.into(), d.into())
}

impl Field for BigRational {
    fn zero_elem() -> Self {
        BigRational::zero()
    }

    fn one_elem() -> Self {
        BigRational::one()
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn neg_ref(&self) -> Self {
        -self
    }

    fn inv_ref(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.recip())
        }
    }

    fn is_zero_elem(&self) -> bool {
        self.is_zero()
    }

    fn probes() -> Vec<Self> {
        [
            (0, 1),
            (1, 1),
            (-1, 1),
            (2, 1),
            (3, 1),
            (-3, 1),
            (4, 1),
            (6, 1),
            (1, 2),
            (1, 3),
            (2, 3),
            (3, 4),
            (5, 6),
            (9, 4),
            (10, 7),
            (7, 5),
            (1, 12),
            (15, 8),
        ]
        .into_iter()
        .map(|(n, d)| ratio(n, d))
        .collect()
    }
}

impl Places for BigRational {
    type Step = RationalPlace;

    fn admits(prefix: &[RationalPlace], step: &RationalPlace) -> bool {
        match step {
            RationalPlace::Adic(p) => prefix.is_empty() && is_prime(*p),
        }
    }

    fn order(x: &Self, steps: &[RationalPlace]) -> Option<Vec<i64>> {
        if x.is_zero() {
            return None;
        }
        steps
            .iter()
            .map(|step| match step {
                RationalPlace::Adic(p) => padic_order(x, *p),
            })
            .collect()
    }
}

//! Unit-group stratification of a valuation subring.
//!
//! Inside `K` the elements of `A` split into nonunits (`v < 1`, the maximal
//! ideal) and units (`v = 1`); among the units sit the principal units
//! `u ≡ 1 mod m`. Each stratum is a thin handle over its ring:
//!
//! ```text
//! PrincipalUnitGroup(A) ≤ UnitGroup(A) ≤ K*
//! Nonunits(A) = m_A
//! ```
//!
//! Varying `A`: `UnitGroup` grows with `A`, while `Nonunits` and
//! `PrincipalUnitGroup` shrink.

use crate::error::ValuationError;
use crate::field::Places;
use crate::subring::ValuationSubring;
use crate::value_group::ValueGroupElement;
use std::fmt;

/// `unitGroup(A)`: the units of `A`, as a subgroup of `K*`.
pub struct UnitGroup<F: Places> {
    ring: ValuationSubring<F>,
}

/// An element of [`UnitGroup`].
pub struct Unit<F: Places> {
    ring: ValuationSubring<F>,
    val: F,
}

/// A unit of the ring `A` itself: a value together with its inverse, both
/// members of `A`.
pub struct RingUnit<F: Places> {
    ring: ValuationSubring<F>,
    val: F,
    inv: F,
}

/// `unitGroup(A) ≃ Aˣ`.
pub struct UnitGroupEquiv<F: Places> {
    ring: ValuationSubring<F>,
}

/// `nonunits(A)`: the multiplicative semigroup `{ x | v(x) < 1 }`.
pub struct Nonunits<F: Places> {
    ring: ValuationSubring<F>,
}

/// `principalUnitGroup(A)`: units `u` with `v(u - 1) < 1`.
pub struct PrincipalUnitGroup<F: Places> {
    ring: ValuationSubring<F>,
}

impl<F: Places> ValuationSubring<F> {
    pub fn unit_group(&self) -> UnitGroup<F> {
        UnitGroup { ring: self.clone() }
    }

    pub fn unit_group_mul_equiv(&self) -> UnitGroupEquiv<F> {
        UnitGroupEquiv { ring: self.clone() }
    }

    pub fn nonunits(&self) -> Nonunits<F> {
        Nonunits { ring: self.clone() }
    }

    pub fn principal_unit_group(&self) -> PrincipalUnitGroup<F> {
        PrincipalUnitGroup { ring: self.clone() }
    }

    /// `v(u) = 1` for a unit of `A`.
    pub fn valuation_unit(&self, u: &RingUnit<F>) -> Result<ValueGroupElement<F>, ValuationError> {
        self.same_ring(&u.ring)?;
        Ok(self.valuation(&u.val))
    }

    fn require_unit(&self, x: &F) -> Result<(), ValuationError> {
        if self.is_unit(x) {
            Ok(())
        } else {
            Err(ValuationError::NotAUnit {
                element: x.to_string(),
                ring: self.to_string(),
            })
        }
    }

    /// `u` is a unit and `u - 1` lies in the maximal ideal.
    pub fn is_principal_unit(&self, u: &F) -> bool {
        self.is_unit(u) && self.is_nonunit(&u.sub_ref(&F::one_elem()))
    }
}

impl<F: Places> UnitGroup<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn contains(&self, x: &F) -> bool {
        self.ring.valuation_eq_one(x)
    }

    pub fn element(&self, x: &F) -> Result<Unit<F>, ValuationError> {
        self.ring.require_unit(x)?;
        Ok(Unit {
            ring: self.ring.clone(),
            val: x.clone(),
        })
    }

    pub fn one(&self) -> Unit<F> {
        Unit {
            ring: self.ring.clone(),
            val: F::one_elem(),
        }
    }

    /// `unitGroup(self) ≤ unitGroup(other)` iff `self.ring ≤ other.ring`.
    pub fn le(&self, other: &Self) -> bool {
        self.ring.le(&other.ring)
    }
}

impl<F: Places> Unit<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn value(&self) -> &F {
        &self.val
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        self.ring.same_ring(&other.ring)?;
        Ok(Self {
            ring: self.ring.clone(),
            val: self.val.mul_ref(&other.val),
        })
    }

    pub fn inverse(&self) -> Result<Self, ValuationError> {
        let val = self.val.inv_ref().ok_or(ValuationError::DivisionByZero)?;
        Ok(Self {
            ring: self.ring.clone(),
            val,
        })
    }

    pub fn is_principal(&self) -> bool {
        self.ring.is_principal_unit(&self.val)
    }
}

impl<F: Places> RingUnit<F> {
    /// Checks `val, inv ∈ A` and `val · inv = 1`.
    pub fn new(ring: &ValuationSubring<F>, val: F, inv: F) -> Result<Self, ValuationError> {
        ring.require_member(&val)?;
        ring.require_member(&inv)?;
        if !val.mul_ref(&inv).is_one_elem() {
            return Err(ValuationError::NotAUnit {
                element: val.to_string(),
                ring: ring.to_string(),
            });
        }
        Ok(Self {
            ring: ring.clone(),
            val,
            inv,
        })
    }

    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn value(&self) -> &F {
        &self.val
    }

    pub fn inv(&self) -> &F {
        &self.inv
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        self.ring.same_ring(&other.ring)?;
        Ok(Self {
            ring: self.ring.clone(),
            val: self.val.mul_ref(&other.val),
            inv: self.inv.mul_ref(&other.inv),
        })
    }

    pub fn inverse(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            val: self.inv.clone(),
            inv: self.val.clone(),
        }
    }
}

impl<F: Places> UnitGroupEquiv<F> {
    pub fn to_ring_unit(&self, u: &Unit<F>) -> Result<RingUnit<F>, ValuationError> {
        self.ring.same_ring(&u.ring)?;
        let inv = u.val.inv_ref().ok_or(ValuationError::DivisionByZero)?;
        RingUnit::new(&self.ring, u.val.clone(), inv)
    }

    pub fn to_unit(&self, u: &RingUnit<F>) -> Result<Unit<F>, ValuationError> {
        self.ring.same_ring(&u.ring)?;
        Ok(Unit {
            ring: self.ring.clone(),
            val: u.val.clone(),
        })
    }
}

impl<F: Places> Nonunits<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn contains(&self, x: &F) -> bool {
        self.ring.valuation_lt_one(x)
    }

    /// `nonunits(self) ≤ nonunits(other)` iff `other.ring ≤ self.ring`.
    pub fn le(&self, other: &Self) -> bool {
        other.ring.le(&self.ring)
    }
}

impl<F: Places> PrincipalUnitGroup<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn contains(&self, x: &F) -> bool {
        self.ring.is_principal_unit(x)
    }

    /// The inclusion into [`UnitGroup`].
    pub fn element(&self, x: &F) -> Result<Unit<F>, ValuationError> {
        if !self.contains(x) {
            return Err(ValuationError::NotInRing {
                element: x.to_string(),
                ring: format!("1 + m({})", self.ring),
            });
        }
        self.ring.unit_group().element(x)
    }

    /// `principalUnitGroup(self) ≤ principalUnitGroup(other)` iff
    /// `other.ring ≤ self.ring`.
    pub fn le(&self, other: &Self) -> bool {
        other.ring.le(&self.ring)
    }
}

impl<F: Places> Clone for Unit<F> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            val: self.val.clone(),
        }
    }
}

impl<F: Places> PartialEq for Unit<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring && self.val == other.val
    }
}

impl<F: Places> fmt::Debug for Unit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({} in {})", self.val, self.ring)
    }
}

impl<F: Places> Clone for RingUnit<F> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            val: self.val.clone(),
            inv: self.inv.clone(),
        }
    }
}

impl<F: Places> PartialEq for RingUnit<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring && self.val == other.val
    }
}

impl<F: Places> fmt::Debug for RingUnit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingUnit({}, {} in {})", self.val, self.inv, self.ring)
    }
}

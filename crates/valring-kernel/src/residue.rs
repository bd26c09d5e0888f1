//! The residue field `A / m_A` and the quotient of units by principal units.
//!
//! Residue classes are kept as `(A, representative)` with equality taken
//! modulo the maximal ideal. The reduction map on units has kernel exactly
//! the principal units, and every nonzero class has a unit representative,
//! which gives
//!
//! ```text
//! unitGroup(A) / principalUnitGroup(A) ≅ (A / m_A)*
//! ```

use crate::error::ValuationError;
use crate::field::Places;
use crate::subring::ValuationSubring;
use crate::units::Unit;
use std::fmt;

/// `A / m_A`.
pub struct ResidueField<F: Places> {
    ring: ValuationSubring<F>,
}

/// An element of [`ResidueField`].
pub struct ResidueClass<F: Places> {
    ring: ValuationSubring<F>,
    rep: F,
}

/// A nonzero class, i.e. an element of `(A / m_A)*`.
pub struct ResidueUnit<F: Places> {
    class: ResidueClass<F>,
    /// `rep⁻¹` in `K`; also a unit of `A`.
    inv: F,
}

/// The reduction `unitGroup(A) → (A / m_A)*`.
pub struct ResidueUnitsHom<F: Places> {
    ring: ValuationSubring<F>,
}

/// A coset `u · principalUnitGroup(A)`.
pub struct PrincipalCoset<F: Places> {
    unit: Unit<F>,
}

/// `unitGroup(A) / principalUnitGroup(A) ≃ (A / m_A)*`.
pub struct UnitsModPrincipalEquiv<F: Places> {
    ring: ValuationSubring<F>,
}

impl<F: Places> ValuationSubring<F> {
    pub fn residue_field(&self) -> ResidueField<F> {
        ResidueField { ring: self.clone() }
    }

    pub fn unit_group_to_residue_field_units(&self) -> ResidueUnitsHom<F> {
        ResidueUnitsHom { ring: self.clone() }
    }

    pub fn units_mod_principal_equiv(&self) -> UnitsModPrincipalEquiv<F> {
        UnitsModPrincipalEquiv { ring: self.clone() }
    }
}

impl<F: Places> ResidueField<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    /// The class of `x ∈ A`.
    pub fn class(&self, x: &F) -> Result<ResidueClass<F>, ValuationError> {
        self.ring.require_member(x)?;
        Ok(ResidueClass {
            ring: self.ring.clone(),
            rep: x.clone(),
        })
    }

    pub fn zero(&self) -> ResidueClass<F> {
        ResidueClass {
            ring: self.ring.clone(),
            rep: F::zero_elem(),
        }
    }

    pub fn one(&self) -> ResidueClass<F> {
        ResidueClass {
            ring: self.ring.clone(),
            rep: F::one_elem(),
        }
    }
}

impl<F: Places> ResidueClass<F> {
    pub fn representative(&self) -> &F {
        &self.rep
    }

    pub fn is_zero(&self) -> bool {
        self.ring.is_nonunit(&self.rep)
    }

    fn combine(&self, other: &Self, op: impl Fn(&F, &F) -> F) -> Result<Self, ValuationError> {
        self.ring.same_ring(&other.ring)?;
        Ok(Self {
            ring: self.ring.clone(),
            rep: op(&self.rep, &other.rep),
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self, ValuationError> {
        self.combine(other, F::add_ref)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, ValuationError> {
        self.combine(other, F::sub_ref)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        self.combine(other, F::mul_ref)
    }

    pub fn neg(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            rep: self.rep.neg_ref(),
        }
    }

    /// `None` for the zero class.
    pub fn inverse(&self) -> Option<Self> {
        self.to_unit().map(|u| u.inverse().class)
    }

    /// `None` for the zero class.
    pub fn to_unit(&self) -> Option<ResidueUnit<F>> {
        if self.is_zero() {
            return None;
        }
        Some(ResidueUnit {
            class: self.clone(),
            inv: self.rep.inv_ref()?,
        })
    }
}

impl<F: Places> ResidueUnit<F> {
    pub fn class(&self) -> &ResidueClass<F> {
        &self.class
    }

    pub fn into_class(self) -> ResidueClass<F> {
        self.class
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        Ok(Self {
            class: self.class.mul(&other.class)?,
            inv: self.inv.mul_ref(&other.inv),
        })
    }

    pub fn inverse(&self) -> Self {
        Self {
            class: ResidueClass {
                ring: self.class.ring.clone(),
                rep: self.inv.clone(),
            },
            inv: self.class.rep.clone(),
        }
    }
}

impl<F: Places> ResidueUnitsHom<F> {
    /// The class of `u`, which is nonzero because `u ∉ m_A`.
    pub fn apply(&self, u: &Unit<F>) -> Result<ResidueUnit<F>, ValuationError> {
        self.ring.same_ring(u.ring())?;
        let class = self.ring.residue_field().class(u.value())?;
        class.to_unit().ok_or_else(|| ValuationError::NotAUnit {
            element: u.value().to_string(),
            ring: self.ring.to_string(),
        })
    }

    /// Whether `u` reduces to `1`, i.e. is a principal unit.
    pub fn in_kernel(&self, u: &Unit<F>) -> Result<bool, ValuationError> {
        Ok(*self.apply(u)?.class() == self.ring.residue_field().one())
    }
}

impl<F: Places> PrincipalCoset<F> {
    pub fn representative(&self) -> &Unit<F> {
        &self.unit
    }

    /// `(u · U1)(w · U1) = uw · U1`.
    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        Ok(Self {
            unit: self.unit.mul(&other.unit)?,
        })
    }

    pub fn inverse(&self) -> Result<Self, ValuationError> {
        Ok(Self {
            unit: self.unit.inverse()?,
        })
    }

    pub fn is_one(&self) -> bool {
        self.unit.is_principal()
    }
}

impl<F: Places> UnitsModPrincipalEquiv<F> {
    pub fn coset(&self, u: &Unit<F>) -> Result<PrincipalCoset<F>, ValuationError> {
        self.ring.same_ring(u.ring())?;
        Ok(PrincipalCoset { unit: u.clone() })
    }

    /// The identity coset `U1` itself.
    pub fn one(&self) -> PrincipalCoset<F> {
        PrincipalCoset {
            unit: self.ring.unit_group().one(),
        }
    }

    pub fn to_residue(&self, c: &PrincipalCoset<F>) -> Result<ResidueUnit<F>, ValuationError> {
        self.ring.unit_group_to_residue_field_units().apply(&c.unit)
    }

    /// Lift a residue unit to the coset of any of its representatives.
    pub fn from_residue(&self, c: &ResidueUnit<F>) -> Result<PrincipalCoset<F>, ValuationError> {
        self.ring.same_ring(&c.class.ring)?;
        let unit = self.ring.unit_group().element(&c.class.rep)?;
        Ok(PrincipalCoset { unit })
    }
}

impl<F: Places> Clone for ResidueClass<F> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            rep: self.rep.clone(),
        }
    }
}

impl<F: Places> PartialEq for ResidueClass<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring && self.ring.is_nonunit(&self.rep.sub_ref(&other.rep))
    }
}

impl<F: Places> fmt::Debug for ResidueClass<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] mod m({})", self.rep, self.ring)
    }
}

impl<F: Places> Clone for ResidueUnit<F> {
    fn clone(&self) -> Self {
        Self {
            class: self.class.clone(),
            inv: self.inv.clone(),
        }
    }
}

impl<F: Places> PartialEq for ResidueUnit<F> {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
    }
}

impl<F: Places> fmt::Debug for ResidueUnit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}*", self.class)
    }
}

impl<F: Places> Clone for PrincipalCoset<F> {
    fn clone(&self) -> Self {
        Self {
            unit: self.unit.clone(),
        }
    }
}

/// `u ~ w` iff `u · w⁻¹` is a principal unit.
impl<F: Places> PartialEq for PrincipalCoset<F> {
    fn eq(&self, other: &Self) -> bool {
        let ring = self.unit.ring();
        if ring != other.unit.ring() {
            return false;
        }
        self.unit
            .value()
            .div_ref(other.unit.value())
            .is_some_and(|ratio| ring.is_principal_unit(&ratio))
    }
}

impl<F: Places> fmt::Debug for PrincipalCoset<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}·U1", self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::function::{FunctionPlace, RationalFunction};
    use crate::model::rational::RationalPlace;
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn adic(p: u64) -> ValuationSubring<BigRational> {
        ValuationSubring::of_steps(vec![RationalPlace::Adic(p)]).unwrap()
    }

    #[test]
    fn residue_field_of_two_adic_is_f2() {
        let a = adic(2);
        let k = a.residue_field();
        let one = k.one();
        assert_eq!(k.class(&q(3, 5)).unwrap(), one);
        assert_eq!(k.class(&q(-7, 3)).unwrap(), one);
        assert!(k.class(&q(6, 1)).unwrap().is_zero());
        assert_eq!(one.add(&one).unwrap(), k.zero());
        assert!(matches!(
            k.class(&q(1, 2)),
            Err(ValuationError::NotInRing { .. })
        ));

        // (𝔽₂)* is trivial: every unit lands in the kernel.
        let hom = a.unit_group_to_residue_field_units();
        let units = a.unit_group();
        for x in [q(3, 1), q(5, 7), q(-1, 1)] {
            assert!(hom.in_kernel(&units.element(&x).unwrap()).unwrap());
        }
    }

    #[test]
    fn residue_arithmetic_mod_five() {
        let a = adic(5);
        let k = a.residue_field();
        let c = |n, d| k.class(&q(n, d)).unwrap();

        assert_eq!(c(2, 1).mul(&c(3, 1)).unwrap(), c(1, 1));
        assert_eq!(c(1, 2), c(3, 1));
        assert_eq!(c(2, 1).inverse().unwrap(), c(3, 1));
        assert_eq!(c(4, 1).neg(), c(1, 1));
        assert_eq!(c(7, 1).sub(&c(2, 1)).unwrap(), k.zero());
        assert!(c(10, 3).inverse().is_none());
        assert_ne!(c(2, 1), c(4, 1));
    }

    #[test]
    fn kernel_is_principal_units() {
        let a = adic(3);
        let hom = a.unit_group_to_residue_field_units();
        let units = a.unit_group();
        let principal = a.principal_unit_group();
        for x in [q(4, 1), q(2, 1), q(-1, 1), q(7, 5), q(5, 7), q(10, 1), q(1, 1)] {
            let u = units.element(&x).unwrap();
            assert_eq!(hom.in_kernel(&u).unwrap(), principal.contains(&x), "{x}");
        }
    }

    #[test]
    fn reduction_is_multiplicative() {
        let a = adic(7);
        let hom = a.unit_group_to_residue_field_units();
        let units = a.unit_group();
        let u = units.element(&q(3, 2)).unwrap();
        let w = units.element(&q(-5, 4)).unwrap();
        let lhs = hom.apply(&u.mul(&w).unwrap()).unwrap();
        let rhs = hom.apply(&u).unwrap().mul(&hom.apply(&w).unwrap()).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn units_mod_principal_is_bijective() {
        let a = adic(3);
        let equiv = a.units_mod_principal_equiv();
        let k = a.residue_field();
        let units = a.unit_group();

        for n in [1, 2] {
            let class = k.class(&q(n, 1)).unwrap().to_unit().unwrap();
            let coset = equiv.from_residue(&class).unwrap();
            assert_eq!(equiv.to_residue(&coset).unwrap(), class);
        }

        let two = equiv.coset(&units.element(&q(2, 1)).unwrap()).unwrap();
        let five = equiv.coset(&units.element(&q(5, 1)).unwrap()).unwrap();
        let four = equiv.coset(&units.element(&q(4, 1)).unwrap()).unwrap();
        assert_eq!(two, five);
        assert_ne!(two, four);
        assert_eq!(
            equiv
                .from_residue(&equiv.to_residue(&two).unwrap())
                .unwrap(),
            two
        );

        assert!(k.class(&q(3, 1)).unwrap().to_unit().is_none());
    }

    #[test]
    fn cosets_form_a_group() {
        let a = adic(7);
        let equiv = a.units_mod_principal_equiv();
        let units = a.unit_group();
        let coset = |n, d| equiv.coset(&units.element(&q(n, d)).unwrap()).unwrap();

        // 3 · 5 = 15 ≡ 1 mod 7
        assert!(coset(3, 1).mul(&coset(5, 1)).unwrap().is_one());
        assert_eq!(coset(3, 1).inverse().unwrap(), coset(5, 1));
        assert_eq!(coset(2, 3).mul(&equiv.one()).unwrap(), coset(2, 3));
        assert_eq!(coset(8, 1), equiv.one());

        let product = coset(2, 1).mul(&coset(4, 3)).unwrap();
        let lhs = equiv.to_residue(&product).unwrap();
        let rhs = equiv
            .to_residue(&coset(2, 1))
            .unwrap()
            .mul(&equiv.to_residue(&coset(4, 3)).unwrap())
            .unwrap();
        assert_eq!(lhs, rhs);
        let k = a.residue_field();
        assert_eq!(equiv.to_residue(&equiv.one()).unwrap().into_class(), k.one());

        let image = equiv.to_residue(&coset(3, 1)).unwrap();
        assert_eq!(image.inverse(), equiv.to_residue(&coset(5, 1)).unwrap());
        assert_eq!(image.mul(&image.inverse()).unwrap().into_class(), k.one());
    }

    #[test]
    fn units_never_reduce_to_zero() {
        let a = adic(5);
        let hom = a.unit_group_to_residue_field_units();
        let units = a.unit_group();
        for x in [q(1, 1), q(2, 3), q(-4, 7), q(6, 11)] {
            let image = hom.apply(&units.element(&x).unwrap()).unwrap();
            assert!(!image.class().is_zero());
        }
    }

    #[test]
    fn gauss_residue_field_is_function_field() {
        let a = ValuationSubring::<RationalFunction>::of_steps(vec![FunctionPlace::Gauss(5)])
            .unwrap();
        let k = a.residue_field();
        let f = |s: &str| s.parse::<RationalFunction>().unwrap();
        let t = k.class(&f("t")).unwrap();
        assert_eq!(k.class(&f("t + 5")).unwrap(), t);
        assert_eq!(k.class(&f("(6*t + 10)/(1 - 5*t)")).unwrap(), t);
        assert_ne!(k.class(&f("t + 1")).unwrap(), t);
        assert!(k.class(&f("t/5")).is_err());
        assert!(k.class(&f("5*t^2")).unwrap().is_zero());
        assert_eq!(t.mul(&t.inverse().unwrap()).unwrap(), k.one());
    }
}

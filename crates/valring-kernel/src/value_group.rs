//! Value groups, valuations, and the coarsening maps between them.
//!
//! `ValueGroup(A)` is `K*` modulo the units of `A`, with a zero adjoined.
//! Elements are kept as `(A, representative)`; comparisons go through
//! divisibility in `A`, so they never depend on a chosen normal form:
//!
//! ```text
//! v(x) ≤ v(y)  ⇔  ∃ a ∈ A, a·y = x
//! v(x) ≤ 1     ⇔  x ∈ A
//! ```
//!
//! An inclusion `A ≤ B` induces [`Coarsening`]: the same representative read
//! in `ValueGroup(B)`.

use crate::error::ValuationError;
use crate::field::Places;
use crate::ideal::PrimeIdeal;
use crate::subring::ValuationSubring;
use std::cmp::Ordering;
use std::fmt;

/// An element of `ValueGroup(A)`.
pub struct ValueGroupElement<F: Places> {
    ring: ValuationSubring<F>,
    rep: F,
}

impl<F: Places> ValueGroupElement<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    /// Some field element with this value.
    pub fn representative(&self) -> &F {
        &self.rep
    }

    pub fn is_zero(&self) -> bool {
        self.rep.is_zero_elem()
    }

    pub fn is_one(&self) -> bool {
        self.ring.is_unit(&self.rep)
    }

    /// Coordinates in `ℤ^rank` (order of the representative), `None` for zero.
    pub fn coordinates(&self) -> Option<Vec<i64>> {
        self.ring.order(&self.rep)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ValuationError> {
        self.ring.same_ring(&other.ring)?;
        Ok(Self {
            ring: self.ring.clone(),
            rep: self.rep.mul_ref(&other.rep),
        })
    }

    /// Group inverse; `None` for the zero value.
    pub fn inverse(&self) -> Option<Self> {
        self.rep.inv_ref().map(|rep| Self {
            ring: self.ring.clone(),
            rep,
        })
    }
}

impl<F: Places> Clone for ValueGroupElement<F> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            rep: self.rep.clone(),
        }
    }
}

impl<F: Places> PartialEq for ValueGroupElement<F> {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/// Linear within one value group; values of different subrings are
/// incomparable.
impl<F: Places> PartialOrd for ValueGroupElement<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ring != other.ring {
            return None;
        }
        let le = self.ring.value_le(&self.rep, &other.rep);
        let ge = self.ring.value_le(&other.rep, &self.rep);
        match (le, ge) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<F: Places> fmt::Debug for ValueGroupElement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueGroupElement")
            .field("ring", &self.ring.to_string())
            .field("rep", &self.rep)
            .finish()
    }
}

impl<F: Places> fmt::Display for ValueGroupElement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v({})", self.rep)
    }
}

impl<F: Places> ValuationSubring<F> {
    /// The canonical map `K → ValueGroup(A)`.
    pub fn valuation(&self, x: &F) -> ValueGroupElement<F> {
        ValueGroupElement {
            ring: self.clone(),
            rep: x.clone(),
        }
    }

    /// `v(x) ≤ v(y)`, i.e. `∃ a ∈ A, a·y = x`.
    pub fn value_le(&self, x: &F, y: &F) -> bool {
        match x.div_ref(y) {
            Some(quotient) => self.contains(&quotient),
            None => x.is_zero_elem(),
        }
    }

    /// `v(x) ≤ 1`, equivalently `x ∈ A`.
    pub fn valuation_le_one(&self, x: &F) -> bool {
        self.value_le(x, &F::one_elem())
    }

    /// `v(x) < 1`, equivalently `x` is in the maximal ideal.
    pub fn valuation_lt_one(&self, x: &F) -> bool {
        self.valuation_le_one(x) && !self.value_le(&F::one_elem(), x)
    }

    /// `v(x) = 1`, equivalently `x` is a unit of `A`.
    pub fn valuation_eq_one(&self, x: &F) -> bool {
        self.valuation_le_one(x) && self.value_le(&F::one_elem(), x)
    }

    /// The coarsening `ValueGroup(self) → ValueGroup(upper)`.
    pub fn map_of_le(&self, upper: &Self) -> Result<Coarsening<F>, ValuationError> {
        Ok(Inclusion::new(self, upper)?.coarsening())
    }
}

/// A checked inclusion `lower ≤ upper`.
pub struct Inclusion<F: Places> {
    lower: ValuationSubring<F>,
    upper: ValuationSubring<F>,
}

impl<F: Places> Inclusion<F> {
    /// Fails with [`ValuationError::NotContained`] unless `lower ≤ upper`.
    pub fn new(
        lower: &ValuationSubring<F>,
        upper: &ValuationSubring<F>,
    ) -> Result<Self, ValuationError> {
        if !lower.le(upper) {
            tracing::debug!(%lower, %upper, "rejected inclusion");
            return Err(ValuationError::NotContained {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(Self {
            lower: lower.clone(),
            upper: upper.clone(),
        })
    }

    pub fn refl(ring: &ValuationSubring<F>) -> Self {
        Self {
            lower: ring.clone(),
            upper: ring.clone(),
        }
    }

    pub fn lower(&self) -> &ValuationSubring<F> {
        &self.lower
    }

    pub fn upper(&self) -> &ValuationSubring<F> {
        &self.upper
    }

    /// The inclusion ring homomorphism `lower → upper`, on elements.
    pub fn map(&self, x: &F) -> Result<F, ValuationError> {
        self.lower.require_member(x)?;
        Ok(x.clone())
    }

    /// `A ≤ B` and `B ≤ C` give `A ≤ C`.
    pub fn trans(&self, next: &Self) -> Result<Self, ValuationError> {
        self.upper.same_ring(&next.lower)?;
        Ok(Self {
            lower: self.lower.clone(),
            upper: next.upper.clone(),
        })
    }

    pub fn coarsening(&self) -> Coarsening<F> {
        Coarsening {
            inclusion: self.clone(),
        }
    }

    /// The maximal ideal of `upper`, pulled back to `lower`.
    pub fn ideal(&self) -> PrimeIdeal<F> {
        PrimeIdeal::new(self.lower.clone(), self.upper.clone())
    }
}

impl<F: Places> Clone for Inclusion<F> {
    fn clone(&self) -> Self {
        Self {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
        }
    }
}

impl<F: Places> PartialEq for Inclusion<F> {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.upper == other.upper
    }
}

impl<F: Places> Eq for Inclusion<F> {}

/// Overrings of one base subring, ordered by their upper end.
impl<F: Places> PartialOrd for Inclusion<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.lower != other.lower {
            return None;
        }
        self.upper.partial_cmp(&other.upper)
    }
}

impl<F: Places> fmt::Debug for Inclusion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inclusion({} ≤ {})", self.lower, self.upper)
    }
}

/// The monotone, surjective, zero-preserving map
/// `ValueGroup(lower) → ValueGroup(upper)`.
pub struct Coarsening<F: Places> {
    inclusion: Inclusion<F>,
}

impl<F: Places> Coarsening<F> {
    pub fn inclusion(&self) -> &Inclusion<F> {
        &self.inclusion
    }

    pub fn apply(&self, v: &ValueGroupElement<F>) -> Result<ValueGroupElement<F>, ValuationError> {
        self.inclusion.lower.same_ring(&v.ring)?;
        Ok(self.inclusion.upper.valuation(&v.rep))
    }

    /// A preimage of `w`.
    pub fn lift(&self, w: &ValueGroupElement<F>) -> Result<ValueGroupElement<F>, ValuationError> {
        self.inclusion.upper.same_ring(&w.ring)?;
        Ok(self.inclusion.lower.valuation(&w.rep))
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

    fn f(s: &str) -> RationalFunction {
        s.parse().unwrap()
    }

    #[test]
    fn two_adic_values() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let v = |n, d| a.valuation(&q(n, d));

        assert!(v(0, 1).is_zero());
        assert!(v(0, 1) < v(5, 1));
        assert_eq!(v(6, 1), v(2, 3));
        assert!(v(4, 1) < v(2, 1));
        assert!(v(3, 1) < v(1, 2));
        assert!(v(3, 7).is_one());
        assert_eq!(v(12, 1).coordinates(), Some(vec![2]));
        assert_eq!(v(0, 1).coordinates(), None);

        let product = v(2, 1).mul(&v(1, 8)).unwrap();
        assert_eq!(product, v(1, 4));
        assert_eq!(v(8, 3).inverse().unwrap(), v(3, 8));
        assert!(v(0, 1).inverse().is_none());
    }

    #[test]
    fn valuation_predicates() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(3)]).unwrap();
        assert!(a.valuation_le_one(&q(3, 2)));
        assert!(a.valuation_lt_one(&q(3, 2)));
        assert!(a.valuation_eq_one(&q(2, 5)));
        assert!(!a.valuation_le_one(&q(1, 9)));
        assert!(a.valuation_lt_one(&q(0, 1)));
        assert!(!a.valuation_eq_one(&q(0, 1)));
        assert!(a.value_le(&q(0, 1), &q(0, 1)));
        assert!(!a.value_le(&q(1, 1), &q(0, 1)));
    }

    #[test]
    fn values_of_different_rings_do_not_compare() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let b = ValuationSubring::of_steps(vec![RationalPlace::Adic(3)]).unwrap();
        let x = q(6, 1);
        assert_eq!(a.valuation(&x).partial_cmp(&b.valuation(&x)), None);
        assert!(matches!(
            a.valuation(&x).mul(&b.valuation(&x)),
            Err(ValuationError::ForeignRing { .. })
        ));
    }

    #[test]
    fn coarsening_commutes_with_valuation() {
        let a = ValuationSubring::<RationalFunction>::of_steps(vec![
            FunctionPlace::Infinity,
            FunctionPlace::Adic(5),
        ])
        .unwrap();
        let b = a.overring(1);
        let coarsen = a.map_of_le(&b).unwrap();

        for x in [f("t"), f("1/t"), f("5"), f("(5*t + 1)/(t^2 + 1)"), f("0")] {
            let image = coarsen.apply(&a.valuation(&x)).unwrap();
            assert_eq!(image, b.valuation(&x));
        }

        // Strictly different values below can collapse above.
        assert!(a.valuation(&f("5")) < a.valuation(&f("1")));
        assert_eq!(
            coarsen.apply(&a.valuation(&f("5"))).unwrap(),
            coarsen.apply(&a.valuation(&f("1"))).unwrap()
        );

        let w = b.valuation(&f("t^3"));
        assert_eq!(coarsen.apply(&coarsen.lift(&w).unwrap()).unwrap(), w);
    }

    #[test]
    fn coarsening_rejects_bad_inputs() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let b = ValuationSubring::of_steps(vec![RationalPlace::Adic(3)]).unwrap();
        assert!(matches!(
            a.map_of_le(&b),
            Err(ValuationError::NotContained { .. })
        ));

        let to_top = a.map_of_le(&ValuationSubring::top()).unwrap();
        assert!(matches!(
            to_top.apply(&b.valuation(&q(1, 1))),
            Err(ValuationError::ForeignRing { .. })
        ));
    }

    #[test]
    fn identity_coarsening() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let id = a.map_of_le(&a).unwrap();
        for x in [q(1, 2), q(4, 3), q(0, 1), q(-7, 1)] {
            let v = a.valuation(&x);
            let image = id.apply(&v).unwrap();
            assert_eq!(image, v);
            assert_eq!(image.ring(), &a);
        }
    }

    #[test]
    fn inclusion_transitivity_and_map() {
        let a = ValuationSubring::<RationalFunction>::of_steps(vec![
            FunctionPlace::Gauss(3),
            FunctionPlace::ReducedInfinity,
        ])
        .unwrap();
        let b = a.overring(1);
        let top = ValuationSubring::top();
        let ab = Inclusion::new(&a, &b).unwrap();
        let bt = Inclusion::new(&b, &top).unwrap();
        let at = ab.trans(&bt).unwrap();
        assert_eq!(at, Inclusion::new(&a, &top).unwrap());
        assert!(matches!(
            bt.trans(&ab),
            Err(ValuationError::ForeignRing { .. })
        ));
        assert!(Inclusion::new(&top, &a).is_err());

        assert_eq!(ab.map(&f("3*t + 1")).unwrap(), f("3*t + 1"));
        assert!(matches!(
            ab.map(&f("t^2 / 3")),
            Err(ValuationError::NotInRing { .. })
        ));
        assert_eq!(Inclusion::refl(&a).upper(), &a);
    }
}

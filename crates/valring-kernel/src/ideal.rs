//! Prime ideals and the overring correspondence.
//!
//! For a fixed `A` the two maps
//!
//! ```text
//! ideal_of_le : { B | A ≤ B } → Spec(A)     B ↦ m_B ∩ A
//! of_prime    : Spec(A) → { B | A ≤ B }     P ↦ A_P ⊆ K
//! ```
//!
//! are built independently (pullback and localization) and are mutually
//! inverse and order-reversing. Because the overrings of `A` form a chain of
//! length `rank(A)`, a prime ideal is determined by the overring it comes
//! from; [`PrimeIdeal`] keeps that overring as its description while its
//! membership test stays the pullback.

use crate::error::ValuationError;
use crate::field::{Membership, Places};
use crate::subring::ValuationSubring;
use crate::value_group::Inclusion;
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::sync::Arc;

/// A prime ideal of a valuation subring.
pub struct PrimeIdeal<F: Places> {
    ring: ValuationSubring<F>,
    /// The overring whose maximal ideal pulls back to this ideal.
    upper: ValuationSubring<F>,
}

impl<F: Places> PrimeIdeal<F> {
    pub(crate) fn new(ring: ValuationSubring<F>, upper: ValuationSubring<F>) -> Self {
        Self { ring, upper }
    }

    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    /// `x ∈ A` and `x` is a nonunit of the defining overring.
    pub fn contains(&self, x: &F) -> bool {
        self.ring.contains(x) && self.upper.is_nonunit(x)
    }

    /// Length of the longest chain of primes below this one.
    pub fn height(&self) -> usize {
        self.upper.rank()
    }

    pub fn is_bottom(&self) -> bool {
        self.height() == 0
    }

    pub fn is_maximal(&self) -> bool {
        self.height() == self.ring.rank()
    }
}

impl<F: Places> Clone for PrimeIdeal<F> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            upper: self.upper.clone(),
        }
    }
}

impl<F: Places> PartialEq for PrimeIdeal<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring && self.upper == other.upper
    }
}

impl<F: Places> Eq for PrimeIdeal<F> {}

/// Inclusion of ideals. Primes of a valuation ring form a chain, so two
/// primes of the same ring always compare.
impl<F: Places> PartialOrd for PrimeIdeal<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ring != other.ring {
            return None;
        }
        Some(self.height().cmp(&other.height()))
    }
}

impl<F: Places> fmt::Debug for PrimeIdeal<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeIdeal")
            .field("ring", &self.ring.to_string())
            .field("height", &self.height())
            .finish()
    }
}

impl<F: Places> fmt::Display for PrimeIdeal<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m({}) ∩ {}", self.upper, self.ring)
    }
}

impl<F: Places> ValuationSubring<F> {
    /// Pull the maximal ideal of `upper` back to `self`.
    ///
    /// Rejects a claimed inclusion that does not hold.
    pub fn ideal_of_le(&self, upper: &Self) -> Result<PrimeIdeal<F>, ValuationError> {
        let ideal = Inclusion::new(self, upper)?.ideal();
        tracing::trace!(ring = %self, %upper, height = ideal.height(), "ideal_of_le");
        Ok(ideal)
    }

    /// Localize `self` at the prime `p`, inside `K`.
    ///
    /// `x ∈ A_P` iff `x ∈ A` or `x⁻¹ ∈ A \ P`.
    pub fn of_prime(&self, p: &PrimeIdeal<F>) -> Result<Self, ValuationError> {
        self.same_ring(&p.ring)?;
        let base = self.clone();
        let prime = p.clone();
        let carrier: Arc<dyn Membership<F>> = Arc::new(move |x: &F| {
            base.contains(x) || x.inv_ref().is_some_and(|inv| !prime.contains(&inv))
        });
        tracing::trace!(ring = %self, height = p.height(), "of_prime");
        self.localized(p.height(), carrier)
    }

    /// `Spec(A)`, from `⊥` up to the maximal ideal.
    pub fn prime_spectrum(&self) -> Vec<PrimeIdeal<F>> {
        self.overrings()
            .into_iter()
            .map(|upper| PrimeIdeal::new(self.clone(), upper))
            .collect()
    }

    pub fn maximal_ideal(&self) -> PrimeIdeal<F> {
        PrimeIdeal::new(self.clone(), self.clone())
    }

    /// The zero ideal.
    pub fn bottom_ideal(&self) -> PrimeIdeal<F> {
        PrimeIdeal::new(self.clone(), self.overring(0))
    }

    pub fn prime_spectrum_equiv(&self) -> SpectrumEquiv<F> {
        SpectrumEquiv { ring: self.clone() }
    }

    pub fn prime_spectrum_order_equiv(&self) -> SpectrumOrderEquiv<F> {
        SpectrumOrderEquiv {
            equiv: self.prime_spectrum_equiv(),
        }
    }
}

/// `Spec(A) ≃ { B | A ≤ B }`.
pub struct SpectrumEquiv<F: Places> {
    ring: ValuationSubring<F>,
}

impl<F: Places> SpectrumEquiv<F> {
    pub fn ring(&self) -> &ValuationSubring<F> {
        &self.ring
    }

    pub fn to_overring(&self, p: &PrimeIdeal<F>) -> Result<Inclusion<F>, ValuationError> {
        let upper = self.ring.of_prime(p)?;
        Inclusion::new(&self.ring, &upper)
    }

    pub fn to_ideal(&self, le: &Inclusion<F>) -> Result<PrimeIdeal<F>, ValuationError> {
        self.ring.same_ring(le.lower())?;
        Ok(le.ideal())
    }
}

/// The same bijection as an order isomorphism from the reversed spectrum:
/// larger primes go to smaller overrings.
pub struct SpectrumOrderEquiv<F: Places> {
    equiv: SpectrumEquiv<F>,
}

impl<F: Places> SpectrumOrderEquiv<F> {
    pub fn to_overring(&self, p: &Reverse<PrimeIdeal<F>>) -> Result<Inclusion<F>, ValuationError> {
        self.equiv.to_overring(&p.0)
    }

    pub fn to_ideal(&self, le: &Inclusion<F>) -> Result<Reverse<PrimeIdeal<F>>, ValuationError> {
        self.equiv.to_ideal(le).map(Reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::function::{FunctionPlace, RationalFunction};
    use crate::check::CheckPolicy;
    use crate::model::rational::RationalPlace;
    use crate::subring::Origin;
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn f(s: &str) -> RationalFunction {
        s.parse().unwrap()
    }

    fn chain() -> ValuationSubring<RationalFunction> {
        ValuationSubring::of_steps(vec![FunctionPlace::Point(q(0, 1)), FunctionPlace::Adic(2)])
            .unwrap()
    }

    #[test]
    fn two_adic_spectrum() {
        let a = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let spectrum = a.prime_spectrum();
        assert_eq!(spectrum.len(), 2);
        assert!(spectrum[0].is_bottom());
        assert!(spectrum[1].is_maximal());
        assert_eq!(spectrum[1], a.maximal_ideal());

        let m = a.maximal_ideal();
        assert!(m.contains(&q(2, 3)));
        assert!(m.contains(&q(0, 1)));
        assert!(!m.contains(&q(3, 1)));
        assert!(!m.contains(&q(1, 2)));

        let bottom = a.bottom_ideal();
        assert!(bottom.contains(&q(0, 1)));
        assert!(!bottom.contains(&q(2, 1)));
    }

    #[test]
    fn ideal_of_top_is_bottom() {
        let a: ValuationSubring<BigRational> = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        assert_eq!(a.ideal_of_le(&ValuationSubring::top()).unwrap(), a.bottom_ideal());
        assert_eq!(a.ideal_of_le(&a).unwrap(), a.maximal_ideal());
    }

    #[test]
    fn boundary_fixed_points() {
        let a = chain();
        assert_eq!(a.of_prime(&a.maximal_ideal()).unwrap(), a);
        assert!(a.of_prime(&a.bottom_ideal()).unwrap().is_top());
        assert_eq!(
            a.of_prime(&a.maximal_ideal()).unwrap().origin(),
            Origin::Localization
        );
    }

    #[test]
    fn localizations_are_audited_once_per_height() {
        let a = chain();
        let p = a.prime_spectrum()[1].clone();
        assert!(!a.localization_audited(p.height()));
        let first = a.of_prime(&p).unwrap();
        let audited = CheckPolicy::current().enabled();
        assert_eq!(a.localization_audited(p.height()), audited);
        assert_eq!(a.clone().localization_audited(p.height()), audited);
        assert!(!a.localization_audited(0));

        let again = a.of_prime(&p).unwrap();
        assert_eq!(again, first);
        let f = |s: &str| s.parse::<RationalFunction>().unwrap();
        for x in ["1/t", "t/3", "3/t", "(t + 1)/t^2"] {
            assert_eq!(again.contains(&f(x)), first.contains(&f(x)), "{x}");
        }
    }

    #[test]
    fn correspondence_round_trips() {
        let a = chain();
        for p in a.prime_spectrum() {
            let b = a.of_prime(&p).unwrap();
            assert!(a.le(&b));
            assert_eq!(a.ideal_of_le(&b).unwrap(), p);
        }
        for b in a.overrings() {
            let p = a.ideal_of_le(&b).unwrap();
            assert_eq!(a.of_prime(&p).unwrap(), b);
        }
    }

    #[test]
    fn middle_prime_membership() {
        let a = chain();
        let b = a.overring(1);
        let p = a.ideal_of_le(&b).unwrap();
        assert_eq!(p.height(), 1);
        assert!(p.contains(&f("t")));
        assert!(p.contains(&f("t/(t + 1)")));
        assert!(!p.contains(&f("2")));
        assert!(a.maximal_ideal().contains(&f("2")));
        assert!(p.contains(&f("t/2")));
        assert!(!p.contains(&f("1/2")));
        assert!(p < a.maximal_ideal());

        // 1/2 becomes a member once the elements outside P are inverted.
        let local = a.of_prime(&p).unwrap();
        assert!(local.contains(&f("1/2")));
        assert!(!local.contains(&f("1/t")));
    }

    #[test]
    fn order_reversal() {
        let a = chain();
        let overrings = a.overrings();
        for b in &overrings {
            for c in &overrings {
                if !b.le(c) {
                    continue;
                }
                let pb = a.ideal_of_le(b).unwrap();
                let pc = a.ideal_of_le(c).unwrap();
                assert!(pc <= pb);
                if b != c {
                    assert!(pc < pb);
                }
            }
        }
    }

    #[test]
    fn order_equiv_reverses() {
        let a = chain();
        let equiv = a.prime_spectrum_order_equiv();
        let spectrum = a.prime_spectrum();
        for p in &spectrum {
            for r in &spectrum {
                let bp = equiv.to_overring(&Reverse(p.clone())).unwrap();
                let br = equiv.to_overring(&Reverse(r.clone())).unwrap();
                assert_eq!(Reverse(p.clone()) <= Reverse(r.clone()), bp <= br);
                assert_eq!(equiv.to_ideal(&bp).unwrap(), Reverse(p.clone()));
            }
        }
    }

    #[test]
    fn rejects_foreign_ideal_and_false_inclusion() {
        let a: ValuationSubring<BigRational> = ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let b = ValuationSubring::of_steps(vec![RationalPlace::Adic(3)]).unwrap();
        assert!(matches!(
            a.of_prime(&b.maximal_ideal()),
            Err(ValuationError::ForeignRing { .. })
        ));
        assert!(matches!(
            a.ideal_of_le(&b),
            Err(ValuationError::NotContained { .. })
        ));
        let equiv = a.prime_spectrum_equiv();
        let foreign = Inclusion::refl(&b);
        assert!(equiv.to_ideal(&foreign).is_err());
    }
}

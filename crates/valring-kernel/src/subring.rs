//! The valuation subring value type and its inclusion order.
//!
//! A [`ValuationSubring`] is an immutable handle. Its identity is its place
//! tower; its membership test is either the tower itself or a caller-supplied
//! carrier that was audited against the tower when the handle was built.

use crate::check::{self, CheckPolicy};
use crate::error::ValuationError;
use crate::field::{Membership, Places};
use crate::tower::PlaceTower;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// How a subring handle was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Directly from a place tower (the valuation-map constructor).
    Tower,
    /// From an audited candidate set.
    Subring,
    /// As an overring of an existing subring.
    Overring,
    /// As the join of two subrings.
    Join,
    /// By localizing at a prime ideal.
    Localization,
    /// By transporting along a field automorphism.
    Pointwise,
    /// By pulling back along a field embedding.
    Comap,
}

struct Inner<F: Places> {
    tower: PlaceTower<F>,
    carrier: Option<Arc<dyn Membership<F>>>,
    origin: Origin,
    /// Heights whose localization carrier has already passed the audit.
    localized: Mutex<BTreeSet<usize>>,
}

/// A valuation subring `A ⊆ K`.
///
/// Cloning is cheap. Equality, hashing and order are decided by the place
/// tower alone, so two handles built differently for the same subring are
/// interchangeable (including as cache keys).
pub struct ValuationSubring<F: Places> {
    inner: Arc<Inner<F>>,
}

impl<F: Places> ValuationSubring<F> {
    fn from_parts(
        tower: PlaceTower<F>,
        carrier: Option<Arc<dyn Membership<F>>>,
        origin: Origin,
    ) -> Self {
        tracing::trace!(%tower, ?origin, "valuation subring constructed");
        Self {
            inner: Arc::new(Inner {
                tower,
                carrier,
                origin,
                localized: Mutex::new(BTreeSet::new()),
            }),
        }
    }

    /// The improper subring `K`.
    pub fn top() -> Self {
        Self::of_tower(PlaceTower::top())
    }

    /// The valuation subring `{ x | order(x) ≥ 0 }` of a tower.
    pub fn of_tower(tower: PlaceTower<F>) -> Self {
        Self::from_parts(tower, None, Origin::Tower)
    }

    pub fn of_steps(steps: Vec<F::Step>) -> Result<Self, ValuationError> {
        Ok(Self::of_tower(PlaceTower::new(steps)?))
    }

    /// Lift an arbitrary candidate set, claimed to be the subring of `tower`.
    ///
    /// Under the current [`CheckPolicy`] the candidate is audited over
    /// `witness` plus the field probes; the first broken law is returned.
    pub fn of_subring(
        carrier: impl Membership<F> + 'static,
        tower: PlaceTower<F>,
        witness: &[F],
    ) -> Result<Self, ValuationError> {
        Self::of_subring_with_policy(CheckPolicy::current(), carrier, tower, witness)
    }

    pub fn of_subring_with_policy(
        policy: CheckPolicy,
        carrier: impl Membership<F> + 'static,
        tower: PlaceTower<F>,
        witness: &[F],
    ) -> Result<Self, ValuationError> {
        let carrier: Arc<dyn Membership<F>> = Arc::new(carrier);
        if policy.enabled() {
            check::audit(carrier.as_ref(), &tower, &check::probe_family(witness))?;
        }
        Ok(Self::from_parts(tower, Some(carrier), Origin::Subring))
    }

    /// Lift a ring-closed superset of `self` to a valuation subring.
    ///
    /// The inverse-membership property is inherited from `self`; the audit
    /// additionally checks that `carrier` really contains `self`.
    pub fn of_le(
        &self,
        carrier: impl Membership<F> + 'static,
        tower: PlaceTower<F>,
        witness: &[F],
    ) -> Result<Self, ValuationError> {
        self.of_le_with_policy(CheckPolicy::current(), carrier, tower, witness)
    }

    pub fn of_le_with_policy(
        &self,
        policy: CheckPolicy,
        carrier: impl Membership<F> + 'static,
        tower: PlaceTower<F>,
        witness: &[F],
    ) -> Result<Self, ValuationError> {
        if !tower.is_prefix_of(self.tower()) {
            return Err(ValuationError::NotContained {
                lower: self.to_string(),
                upper: tower.to_string(),
            });
        }
        let carrier: Arc<dyn Membership<F>> = Arc::new(carrier);
        if policy.enabled() {
            let probes = check::probe_family(witness);
            let lower = |x: &F| self.contains(x);
            check::audit_containment(&lower, carrier.as_ref(), &tower, &probes)?;
            check::audit(carrier.as_ref(), &tower, &probes)?;
        }
        Ok(Self::from_parts(tower, Some(carrier), Origin::Overring))
    }

    /// Build a subring whose carrier is derived from other subrings.
    ///
    /// The audit is quadratic in the probe family and reruns on every call;
    /// [`localized`](Self::localized) memoizes it for localizations.
    pub(crate) fn derived(
        tower: PlaceTower<F>,
        carrier: Arc<dyn Membership<F>>,
        origin: Origin,
    ) -> Result<Self, ValuationError> {
        if CheckPolicy::current().enabled() {
            check::audit(carrier.as_ref(), &tower, &F::probes())?;
        }
        Ok(Self::from_parts(tower, Some(carrier), origin))
    }

    /// The localization of `self` with the given carrier, whose tower is the
    /// prefix of length `height`. The carrier depends only on `self` and
    /// `height`, so it is audited at most once per handle and height.
    pub(crate) fn localized(
        &self,
        height: usize,
        carrier: Arc<dyn Membership<F>>,
    ) -> Result<Self, ValuationError> {
        let tower = self.tower().prefix(height);
        if CheckPolicy::current().enabled() && !self.localization_audited(height) {
            check::audit(carrier.as_ref(), &tower, &F::probes())?;
            if let Ok(mut seen) = self.inner.localized.lock() {
                seen.insert(height);
            }
        }
        Ok(Self::from_parts(tower, Some(carrier), Origin::Localization))
    }

    pub(crate) fn localization_audited(&self, height: usize) -> bool {
        self.inner
            .localized
            .lock()
            .is_ok_and(|seen| seen.contains(&height))
    }

    pub fn contains(&self, x: &F) -> bool {
        match &self.inner.carrier {
            Some(carrier) => carrier.contains(x),
            None => self.inner.tower.contains(x),
        }
    }

    /// `x ∈ A ∨ x⁻¹ ∈ A`; true for every element of the field.
    pub fn mem_or_inv_mem(&self, x: &F) -> bool {
        self.contains(x) || x.inv_ref().is_some_and(|inv| self.contains(&inv))
    }

    /// `x ∈ A` and `x⁻¹ ∈ A`.
    pub fn is_unit(&self, x: &F) -> bool {
        x.inv_ref()
            .is_some_and(|inv| self.contains(x) && self.contains(&inv))
    }

    /// `x` lies in the maximal ideal (zero included).
    pub fn is_nonunit(&self, x: &F) -> bool {
        match x.inv_ref() {
            None => true,
            Some(inv) => self.contains(x) && !self.contains(&inv),
        }
    }

    pub fn tower(&self) -> &PlaceTower<F> {
        &self.inner.tower
    }

    pub fn steps(&self) -> &[F::Step] {
        self.inner.tower.steps()
    }

    /// Krull dimension: the number of proper overrings above `self`.
    pub fn rank(&self) -> usize {
        self.inner.tower.rank()
    }

    pub fn is_top(&self) -> bool {
        self.inner.tower.is_top()
    }

    pub fn origin(&self) -> Origin {
        self.inner.origin
    }

    /// Value coordinates of `x` in `ℤ^rank`, `None` for zero.
    pub fn order(&self, x: &F) -> Option<Vec<i64>> {
        self.inner.tower.order(x)
    }

    /// `self ⊆ other`.
    pub fn le(&self, other: &Self) -> bool {
        other.tower().is_prefix_of(self.tower())
    }

    /// The smallest valuation subring containing both.
    pub fn sup(&self, other: &Self) -> Self {
        let tower = self.tower().common_prefix(other.tower());
        if tower == *self.tower() {
            return self.clone();
        }
        if tower == *other.tower() {
            return other.clone();
        }
        Self::from_parts(tower, None, Origin::Join)
    }

    /// The overring of height `height` (`⊤` at 0, `self` at `rank`).
    pub fn overring(&self, height: usize) -> Self {
        if height >= self.rank() {
            return self.clone();
        }
        Self::from_parts(self.tower().prefix(height), None, Origin::Overring)
    }

    /// Every overring of `self`, from `⊤` down to `self`.
    pub fn overrings(&self) -> Vec<Self> {
        (0..=self.rank()).map(|h| self.overring(h)).collect()
    }

    pub(crate) fn same_ring(&self, other: &Self) -> Result<(), ValuationError> {
        if self == other {
            Ok(())
        } else {
            Err(ValuationError::ForeignRing {
                expected: self.to_string(),
                actual: other.to_string(),
            })
        }
    }

    pub(crate) fn require_member(&self, x: &F) -> Result<(), ValuationError> {
        if self.contains(x) {
            Ok(())
        } else {
            Err(ValuationError::NotInRing {
                element: x.to_string(),
                ring: self.to_string(),
            })
        }
    }
}

impl<F: Places> Clone for ValuationSubring<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Places> PartialEq for ValuationSubring<F> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.tower() == other.tower()
    }
}

impl<F: Places> Eq for ValuationSubring<F> {}

impl<F: Places> Hash for ValuationSubring<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tower().hash(state);
    }
}

/// Inclusion order. Incomparable subrings yield `None`.
impl<F: Places> PartialOrd for ValuationSubring<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.le(other), other.le(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<F: Places> fmt::Debug for ValuationSubring<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuationSubring")
            .field("tower", self.tower())
            .field("origin", &self.inner.origin)
            .finish()
    }
}

impl<F: Places> fmt::Display for ValuationSubring<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.tower(), f)
    }
}

impl<F: Places> Serialize for ValuationSubring<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tower().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Law;
    use crate::model::function::{FunctionPlace, RationalFunction};
    use crate::model::rational::RationalPlace;
    use num_bigint::BigInt;
    use num_integer::Integer;
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn z2() -> ValuationSubring<BigRational> {
        ValuationSubring::of_steps(vec![RationalPlace::Adic(2)]).unwrap()
    }

    #[test]
    fn two_adic_membership() {
        let a = z2();
        assert!(a.contains(&q(3, 1)));
        assert!(!a.contains(&q(1, 2)));
        assert!(a.contains(&q(2, 1)));
        assert!(a.contains(&q(5, 3)));
        assert!(a.is_unit(&q(3, 5)));
        assert!(a.is_nonunit(&q(6, 5)));
        assert!(a.is_nonunit(&q(0, 1)));
        assert!(!a.is_nonunit(&q(1, 2)));
        for x in [q(1, 2), q(7, 12), q(-9, 4), q(0, 1)] {
            assert!(a.mem_or_inv_mem(&x));
        }
    }

    #[test]
    fn audited_carrier_accepted() {
        let tower = PlaceTower::new(vec![RationalPlace::Adic(2)]).unwrap();
        let a = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Always,
            |x: &BigRational| x.denom().is_odd(),
            tower,
            &[q(17, 9)],
        )
        .unwrap();
        assert_eq!(a, z2());
        assert_eq!(a.origin(), Origin::Subring);
        assert!(a.contains(&q(4, 9)));
    }

    fn rejected_law(err: ValuationError) -> Law {
        match err {
            ValuationError::Construction(v) => v.law,
            other => panic!("expected construction violation, got {other}"),
        }
    }

    #[test]
    fn audit_rejects_non_closed_set() {
        let tower = PlaceTower::new(vec![RationalPlace::Adic(2)]).unwrap();
        let half = q(1, 2);
        let err = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Always,
            move |x: &BigRational| x.denom().is_odd() || *x == half || *x == -half.clone(),
            tower,
            &[],
        )
        .unwrap_err();
        assert_eq!(rejected_law(err), Law::AddClosed);
    }

    #[test]
    fn audit_rejects_semilocal_ring() {
        let tower = PlaceTower::new(vec![RationalPlace::Adic(2)]).unwrap();
        let err = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Always,
            |x: &BigRational| x.denom().is_odd() && !x.denom().is_multiple_of(&BigInt::from(3)),
            tower,
            &[],
        )
        .unwrap_err();
        match err {
            ValuationError::Construction(v) => {
                assert_eq!(v.law, Law::InverseMember);
                assert_eq!(v.elements, vec!["2/3".to_string()]);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn audit_rejects_wrong_tower() {
        let tower = PlaceTower::new(vec![RationalPlace::Adic(2)]).unwrap();
        let err = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Always,
            |x: &BigRational| !x.denom().is_multiple_of(&BigInt::from(3)),
            tower,
            &[],
        )
        .unwrap_err();
        assert_eq!(rejected_law(err), Law::TowerAgreement);
    }

    #[test]
    fn never_policy_trusts_caller() {
        let tower = PlaceTower::new(vec![RationalPlace::Adic(2)]).unwrap();
        let a = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Never,
            |x: &BigRational| !x.denom().is_multiple_of(&BigInt::from(3)),
            tower,
            &[],
        );
        assert!(a.is_ok());
    }

    #[test]
    fn of_le_requires_prefix_tower() {
        let a = z2();
        let whole = a
            .of_le_with_policy(CheckPolicy::Always, |_: &BigRational| true, PlaceTower::top(), &[])
            .unwrap();
        assert!(whole.is_top());
        assert!(a.le(&whole));

        let wrong = PlaceTower::new(vec![RationalPlace::Adic(3)]).unwrap();
        let err = a
            .of_le_with_policy(
                CheckPolicy::Always,
                |x: &BigRational| !x.denom().is_multiple_of(&BigInt::from(3)),
                wrong,
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, ValuationError::NotContained { .. }));
    }

    #[test]
    fn of_le_rejects_missing_members() {
        let a = z2();
        let err = a
            .of_le_with_policy(
                CheckPolicy::Always,
                |x: &BigRational| x.is_integer() && x.numer().is_even(),
                PlaceTower::top(),
                &[],
            )
            .unwrap_err();
        assert_eq!(rejected_law(err), Law::Containment);
    }

    #[test]
    fn lattice_laws_on_rank_two_chain() {
        let a = ValuationSubring::<RationalFunction>::of_steps(vec![
            FunctionPlace::Point(q(0, 1)),
            FunctionPlace::Adic(2),
        ])
        .unwrap();
        let b = ValuationSubring::<RationalFunction>::of_steps(vec![FunctionPlace::Point(
            q(0, 1),
        )])
        .unwrap();
        let c = ValuationSubring::<RationalFunction>::of_steps(vec![FunctionPlace::Point(
            q(1, 1),
        )])
        .unwrap();
        let top = ValuationSubring::top();

        assert!(a.le(&b));
        assert!(!b.le(&a));
        assert!(a < b);
        assert!(b < top);
        assert_eq!(b.partial_cmp(&c), None);
        assert_eq!(a.sup(&b), b);
        assert_eq!(a.sup(&a), a);
        assert_eq!(a.sup(&c), top);
        assert_eq!(a.sup(&c).origin(), Origin::Join);
        assert_eq!(a.sup(&c), c.sup(&a));
        assert_eq!(a.overrings(), vec![top.clone(), b.clone(), a.clone()]);
        assert!(a.le(&ValuationSubring::top()));
    }

    #[test]
    fn equality_ignores_construction_route() {
        let via_tower = z2();
        let via_carrier = ValuationSubring::of_subring_with_policy(
            CheckPolicy::Never,
            |x: &BigRational| x.denom().is_odd(),
            via_tower.tower().clone(),
            &[],
        )
        .unwrap();
        let mut set = std::collections::HashSet::new();
        set.insert(via_tower);
        assert!(set.contains(&via_carrier));
    }
}

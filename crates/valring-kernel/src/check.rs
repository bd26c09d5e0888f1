//! Construction-time invariant audits.
//!
//! Valuation subrings are built only through validated constructors. The
//! audit quantifies every subring law over a finite probe family (caller
//! witnesses plus [`Field::probes`]); afterwards the value is trusted.
//!
//! Whether audits run is governed by [`CheckPolicy`]:
//!
//! - **always**: every construction is audited
//! - **debug_only**: audited when `debug_assertions` are on (the default)
//! - **never**: constructor arguments are treated as preconditions

use crate::error::{Law, ValuationError};
use crate::field::{Field, Membership, Places};
use crate::tower::PlaceTower;
use crate::witness::violation;
use std::sync::OnceLock;

/// Environment variable read once by [`CheckPolicy::current`].
pub const CHECKS_ENV: &str = "VALRING_CHECKS";

/// When construction-time audits run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckPolicy {
    Always,
    DebugOnly,
    Never,
}

impl CheckPolicy {
    /// Whether this policy audits in the current build.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::DebugOnly => cfg!(debug_assertions),
            Self::Never => false,
        }
    }

    /// Policy from [`CHECKS_ENV`], falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(CHECKS_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(value = %raw, error = %err, "ignoring unparsable check policy");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// The process-wide policy, read once.
    pub fn current() -> Self {
        static POLICY: OnceLock<CheckPolicy> = OnceLock::new();
        *POLICY.get_or_init(Self::from_env)
    }
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self::DebugOnly
    }
}

impl std::fmt::Display for CheckPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::DebugOnly => write!(f, "debug_only"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl std::str::FromStr for CheckPolicy {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" | "on" => Ok(Self::Always),
            "debug" | "debug_only" | "debug-only" => Ok(Self::DebugOnly),
            "never" | "off" => Ok(Self::Never),
            _ => Err(ValuationError::Parse(format!("unknown check policy: {s}"))),
        }
    }
}

/// Caller witnesses followed by the field's own probes.
pub(crate) fn probe_family<F: Field>(witness: &[F]) -> Vec<F> {
    let mut probes = witness.to_vec();
    probes.extend(F::probes());
    probes
}

/// Audit `carrier` as the valuation subring of `tower`.
///
/// Checks run in a fixed order: ring laws, then the inverse-membership
/// disjunction, then agreement with the tower. The first failure wins.
pub(crate) fn audit<F: Places>(
    carrier: &dyn Membership<F>,
    tower: &PlaceTower<F>,
    probes: &[F],
) -> Result<(), ValuationError> {
    tracing::debug!(%tower, probes = probes.len(), "auditing candidate subring");
    let fail = |law: Law, elements: &[&F], description: &str| {
        let elements = elements.iter().map(ToString::to_string).collect();
        let v = violation(law, tower.to_string(), elements, description);
        tracing::warn!(witness = %v.witness_id, %law, %tower, "candidate subring rejected");
        Err(ValuationError::Construction(v))
    };

    let zero = F::zero_elem();
    let one = F::one_elem();
    if !carrier.contains(&zero) {
        return fail(Law::ZeroMember, &[&zero], "0 is not a member");
    }
    if !carrier.contains(&one) {
        return fail(Law::OneMember, &[&one], "1 is not a member");
    }

    let members: Vec<&F> = probes.iter().filter(|x| carrier.contains(x)).collect();
    for x in &members {
        if !carrier.contains(&x.neg_ref()) {
            return fail(Law::NegClosed, &[*x], "negation leaves the set");
        }
        for y in &members {
            if !carrier.contains(&x.add_ref(y)) {
                return fail(Law::AddClosed, &[*x, *y], "sum leaves the set");
            }
            if !carrier.contains(&x.mul_ref(y)) {
                return fail(Law::MulClosed, &[*x, *y], "product leaves the set");
            }
        }
    }

    for x in probes {
        if let Some(inv) = x.inv_ref() {
            if !carrier.contains(x) && !carrier.contains(&inv) {
                return fail(
                    Law::InverseMember,
                    &[x],
                    "neither the element nor its inverse is a member",
                );
            }
        }
    }

    for x in probes {
        if carrier.contains(x) != tower.contains(x) {
            return fail(
                Law::TowerAgreement,
                &[x],
                "membership disagrees with the declared tower",
            );
        }
    }

    Ok(())
}

/// Audit that every probe in `lower` is also in `upper`.
pub(crate) fn audit_containment<F: Places>(
    lower: &dyn Membership<F>,
    upper: &dyn Membership<F>,
    tower: &PlaceTower<F>,
    probes: &[F],
) -> Result<(), ValuationError> {
    for x in probes {
        if lower.contains(x) && !upper.contains(x) {
            let v = violation(
                Law::Containment,
                tower.to_string(),
                vec![x.to_string()],
                "member of the base subring is missing from the overring",
            );
            tracing::warn!(witness = %v.witness_id, %tower, "overring candidate rejected");
            return Err(ValuationError::Construction(v));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parse() {
        assert_eq!("always".parse::<CheckPolicy>().unwrap(), CheckPolicy::Always);
        assert_eq!("debug".parse::<CheckPolicy>().unwrap(), CheckPolicy::DebugOnly);
        assert_eq!(
            "debug_only".parse::<CheckPolicy>().unwrap(),
            CheckPolicy::DebugOnly
        );
        assert_eq!("OFF".parse::<CheckPolicy>().unwrap(), CheckPolicy::Never);
        assert!("sometimes".parse::<CheckPolicy>().is_err());
    }

    #[test]
    fn policy_display_round_trips() {
        for policy in [CheckPolicy::Always, CheckPolicy::DebugOnly, CheckPolicy::Never] {
            assert_eq!(policy.to_string().parse::<CheckPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn policy_serde() {
        let json = serde_json::to_value(CheckPolicy::DebugOnly).unwrap();
        assert_eq!(json, serde_json::json!("debug_only"));
        let back: CheckPolicy = serde_json::from_value(serde_json::json!("never")).unwrap();
        assert_eq!(back, CheckPolicy::Never);
    }

    #[test]
    fn policy_enabled() {
        assert!(CheckPolicy::Always.enabled());
        assert!(!CheckPolicy::Never.enabled());
        assert_eq!(CheckPolicy::DebugOnly.enabled(), cfg!(debug_assertions));
    }
}

//! Error types for Valring kernel operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors arising from contract violations or invalid operations.
#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    /// A candidate set failed the construction-time audit.
    #[error("construction violation: {0}")]
    Construction(Violation),

    /// A step cannot extend the given tower prefix.
    #[error("invalid tower: step {step} cannot follow [{prefix}]")]
    InvalidTower { step: String, prefix: String },

    /// An inclusion `lower ≤ upper` was claimed but does not hold.
    #[error("{lower} is not contained in {upper}")]
    NotContained { lower: String, upper: String },

    /// A value, ideal or overring of one subring was handed to another.
    #[error("value belongs to {actual}, expected {expected}")]
    ForeignRing { expected: String, actual: String },

    /// The element does not lie in the subring.
    #[error("{element} is not a member of {ring}")]
    NotInRing { element: String, ring: String },

    /// The element is not a unit of the subring.
    #[error("{element} is not a unit of {ring}")]
    NotAUnit { element: String, ring: String },

    /// Attempted to form a fraction with zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// A textual element, step or policy could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Which subring law a candidate set broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    ZeroMember,
    OneMember,
    NegClosed,
    AddClosed,
    MulClosed,
    /// Every nonzero `x` has `x` or `x⁻¹` in the set.
    InverseMember,
    /// The set and its declared place tower agree on the probes.
    TowerAgreement,
    /// The set contains the subring it claims to be an overring of.
    Containment,
}

impl Law {
    /// Stable reference string, used in witness keys.
    pub fn law_ref(self) -> &'static str {
        match self {
            Self::ZeroMember => "subring.zero",
            Self::OneMember => "subring.one",
            Self::NegClosed => "subring.neg",
            Self::AddClosed => "subring.add",
            Self::MulClosed => "subring.mul",
            Self::InverseMember => "valuation.inverse",
            Self::TowerAgreement => "valuation.tower",
            Self::Containment => "overring.containment",
        }
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.law_ref())
    }
}

/// A concrete violation found while auditing a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Deterministic witness id (see [`crate::witness`]).
    pub witness_id: String,
    pub law: Law,
    /// The tower the candidate claimed to realise.
    pub tower: String,
    /// Offending elements, rendered.
    pub elements: Vec<String>,
    pub description: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at [{}] for {}",
            self.description,
            self.law,
            self.elements.join(", "),
            self.tower
        )
    }
}

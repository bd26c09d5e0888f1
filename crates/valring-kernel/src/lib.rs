//! # Valring Kernel
//!
//! Valuation subrings of a field: subrings `A ⊆ K` such that every nonzero
//! `x` has `x ∈ A` or `x⁻¹ ∈ A`.
//!
//! This crate is **field-agnostic**: it does not prescribe which field is
//! valued. A field supplies exact arithmetic and a catalogue of place steps;
//! the kernel supplies the order theory, the value group, the
//! overring/prime correspondence and the unit strata.
//!
//! ## Architecture
//!
//! ```text
//! Field + Places        ← Exact arithmetic, rank-one place steps
//!     │
//! PlaceTower            ← Validated step sequence, lexicographic ℤ^n order
//!     │
//! ValuationSubring      ← Canonical tower + audited membership carrier
//!     │
//!     ├── ValueGroupElement, Inclusion, Coarsening
//!     ├── PrimeIdeal, SpectrumEquiv      (overrings ≃ primes, reversed)
//!     └── UnitGroup ⊇ PrincipalUnitGroup, Nonunits
//!             │
//!         ResidueField                   (units / principal units ≃ k*)
//!
//! FieldAction, FieldEmbedding  ← Pointwise transport and restriction
//! ```
//!
//! Concrete fields live in [`model`]: `ℚ`, `ℚ(t)` and `𝔽_p`.

pub mod action;
pub mod check;
pub mod comap;
pub mod error;
pub mod field;
pub mod ideal;
pub mod model;
pub mod residue;
pub mod subring;
pub mod survey;
pub mod tower;
pub mod units;
pub mod value_group;
pub mod witness;

pub use action::{FieldAction, Trivial};
pub use check::CheckPolicy;
pub use comap::{FieldEmbedding, Identity};
pub use error::{Law, ValuationError, Violation};
pub use field::{Field, Membership, Places};
pub use ideal::{PrimeIdeal, SpectrumEquiv, SpectrumOrderEquiv};
pub use residue::{
    PrincipalCoset, ResidueClass, ResidueField, ResidueUnit, ResidueUnitsHom,
    UnitsModPrincipalEquiv,
};
pub use subring::{Origin, ValuationSubring};
pub use survey::{Stratum, StratumClass, Survey};
pub use tower::PlaceTower;
pub use units::{Nonunits, PrincipalUnitGroup, RingUnit, Unit, UnitGroup, UnitGroupEquiv};
pub use value_group::{Coarsening, Inclusion, ValueGroupElement};

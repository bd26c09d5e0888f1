//! Place towers: canonical descriptions of valuation subrings.
//!
//! A tower `[s_1, …, s_n]` composes rank-one steps into a valuation
//! `K* → ℤ^n` (lexicographic). Two facts make the tower the right identity
//! for a valuation subring:
//!
//! - the overrings of `A` are exactly the subrings of the prefixes of its
//!   tower, so `A ≤ B` iff `tower(B)` is a prefix of `tower(A)`;
//! - the smallest common overring of `A` and `B` is the subring of the
//!   longest common prefix.

use crate::error::ValuationError;
use crate::field::Places;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated sequence of place steps, coarsest first.
pub struct PlaceTower<F: Places> {
    steps: Vec<F::Step>,
}

impl<F: Places> PlaceTower<F> {
    /// The empty tower; its subring is the whole field.
    pub fn top() -> Self {
        Self { steps: Vec::new() }
    }

    /// Validate `steps` one at a time against the field's catalogue.
    pub fn new(steps: Vec<F::Step>) -> Result<Self, ValuationError> {
        for (i, step) in steps.iter().enumerate() {
            if !F::admits(&steps[..i], step) {
                return Err(ValuationError::InvalidTower {
                    step: step.to_string(),
                    prefix: join_steps::<F>(&steps[..i]),
                });
            }
        }
        Ok(Self { steps })
    }

    /// Extend by one step.
    pub fn push(&self, step: F::Step) -> Result<Self, ValuationError> {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self::new(steps)
    }

    pub fn steps(&self) -> &[F::Step] {
        &self.steps
    }

    /// Number of steps: the rank of the valuation (Krull dimension of its ring).
    pub fn rank(&self) -> usize {
        self.steps.len()
    }

    pub fn is_top(&self) -> bool {
        self.steps.is_empty()
    }

    /// The first `height` steps (the whole tower when `height ≥ rank`).
    pub fn prefix(&self, height: usize) -> Self {
        let n = height.min(self.steps.len());
        Self {
            steps: self.steps[..n].to_vec(),
        }
    }

    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.steps.starts_with(&self.steps)
    }

    pub fn common_prefix(&self, other: &Self) -> Self {
        let n = self
            .steps
            .iter()
            .zip(&other.steps)
            .take_while(|(a, b)| a == b)
            .count();
        self.prefix(n)
    }

    /// Composite order of `x`, `None` for zero.
    pub fn order(&self, x: &F) -> Option<Vec<i64>> {
        F::order(x, &self.steps)
    }

    /// `order(x) ≥ 0`.
    pub fn contains(&self, x: &F) -> bool {
        self.order(x).is_none_or(|v| is_nonnegative(&v))
    }

    /// `order(x) > 0`, zero included.
    pub fn is_nonunit(&self, x: &F) -> bool {
        self.order(x).is_none_or(|v| is_positive(&v))
    }
}

/// Lexicographic `v ≥ 0`.
pub fn is_nonnegative(v: &[i64]) -> bool {
    v.iter().find(|c| **c != 0).is_none_or(|c| *c > 0)
}

/// Lexicographic `v > 0`.
pub fn is_positive(v: &[i64]) -> bool {
    v.iter().find(|c| **c != 0).is_some_and(|c| *c > 0)
}

fn join_steps<F: Places>(steps: &[F::Step]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" > ")
}

impl<F: Places> Clone for PlaceTower<F> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<F: Places> PartialEq for PlaceTower<F> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl<F: Places> Eq for PlaceTower<F> {}

impl<F: Places> Hash for PlaceTower<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.steps.hash(state);
    }
}

impl<F: Places> fmt::Debug for PlaceTower<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.steps).finish()
    }
}

impl<F: Places> fmt::Display for PlaceTower<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            f.write_str("top")
        } else {
            f.write_str(&join_steps::<F>(&self.steps))
        }
    }
}

impl<F: Places> Serialize for PlaceTower<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.steps.iter())
    }
}

impl<F: Places> std::str::FromStr for PlaceTower<F>
where
    F::Step: std::str::FromStr<Err = ValuationError>,
{
    type Err = ValuationError;

    /// Parse `top` or steps separated by `>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "top" {
            return Ok(Self::top());
        }
        let steps = s
            .split('>')
            .map(|part| part.trim().parse::<F::Step>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(steps)
    }
}

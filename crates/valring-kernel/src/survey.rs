//! Serializable stratification reports.
//!
//! A [`Survey`] records, for a subring and a list of elements, which stratum
//! each element falls in and its value coordinates, together with the chain
//! of overrings and the heights of the matching primes. Golden fixtures
//! compare surveys as JSON.

use crate::field::Places;
use crate::subring::ValuationSubring;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratumClass {
    /// Not a member of the subring.
    Outside,
    /// In the maximal ideal.
    Nonunit,
    /// A unit, not congruent to 1.
    Unit,
    /// A unit congruent to 1 modulo the maximal ideal.
    PrincipalUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stratum {
    pub element: String,
    pub class: StratumClass,
    /// Value coordinates; absent for zero.
    pub coordinates: Option<Vec<i64>>,
    /// Height of the smallest prime containing the element, if any.
    pub prime_height: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub tower: String,
    pub rank: usize,
    /// Overrings from `⊤` down to the subring itself.
    pub overrings: Vec<String>,
    pub strata: Vec<Stratum>,
}

impl<F: Places> ValuationSubring<F> {
    pub fn classify(&self, x: &F) -> StratumClass {
        if !self.contains(x) {
            StratumClass::Outside
        } else if self.is_nonunit(x) {
            StratumClass::Nonunit
        } else if self.is_principal_unit(x) {
            StratumClass::PrincipalUnit
        } else {
            StratumClass::Unit
        }
    }

    pub fn survey(&self, elements: &[F]) -> Survey {
        let spectrum = self.prime_spectrum();
        let strata = elements
            .iter()
            .map(|x| Stratum {
                element: x.to_string(),
                class: self.classify(x),
                coordinates: self.order(x),
                prime_height: spectrum.iter().find(|p| p.contains(x)).map(|p| p.height()),
            })
            .collect();
        Survey {
            tower: self.to_string(),
            rank: self.rank(),
            overrings: self.overrings().iter().map(ToString::to_string).collect(),
            strata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rational::RationalPlace;
    use num_rational::BigRational;

    #[test]
    fn survey_of_two_adic() {
        let a = ValuationSubring::<BigRational>::of_steps(vec![RationalPlace::Adic(2)]).unwrap();
        let xs: Vec<BigRational> = ["0", "3", "1/2", "6", "-1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let survey = a.survey(&xs);
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tower": "adic(2)",
                "rank": 1,
                "overrings": ["top", "adic(2)"],
                "strata": [
                    {"element": "0", "class": "nonunit", "coordinates": null, "primeHeight": 0},
                    {"element": "3", "class": "principal_unit", "coordinates": [0], "primeHeight": null},
                    {"element": "1/2", "class": "outside", "coordinates": [-1], "primeHeight": null},
                    {"element": "6", "class": "nonunit", "coordinates": [1], "primeHeight": 1},
                    {"element": "-1", "class": "principal_unit", "coordinates": [0], "primeHeight": null}
                ]
            })
        );
    }
}

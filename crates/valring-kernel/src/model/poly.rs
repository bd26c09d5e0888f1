//! Dense univariate polynomials over `ℚ`, plus reductions modulo a prime.

use super::{int_order, mul_mod, reduce_mod};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Coefficients in ascending degree, without trailing zeros.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Polynomial {
    coeffs: Vec<BigRational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The indeterminate `t`.
    pub fn variable() -> Self {
        Self::from_coeffs(vec![BigRational::zero(), BigRational::one()])
    }

    pub fn from_coeffs(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn from_ints(coeffs: &[i64]) -> Self {
        Self::from_coeffs(
            coeffs
                .iter()
                .map(|c| BigRational::from_integer(BigInt::from(*c)))
                .collect(),
        )
    }

    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn leading(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    pub fn scale(&self, c: &BigRational) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|a| a * c).collect())
    }

    /// Divide by the leading coefficient; zero stays zero.
    pub fn monic(&self) -> Self {
        match self.leading() {
            Some(lead) => self.scale(&lead.recip()),
            None => Self::zero(),
        }
    }

    /// Euclidean division. A zero divisor leaves everything in the remainder.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let (Some(d_deg), Some(d_lead)) = (divisor.degree(), divisor.leading()) else {
            return (Self::zero(), self.clone());
        };
        let mut rem = self.coeffs.clone();
        let mut quot = vec![BigRational::zero(); self.coeffs.len().saturating_sub(d_deg)];
        while rem.len() > d_deg {
            let shift = rem.len() - 1 - d_deg;
            let factor = rem[rem.len() - 1].clone() / d_lead;
            for (i, c) in divisor.coeffs.iter().enumerate() {
                rem[shift + i] -= &factor * c;
            }
            quot[shift] = factor;
            rem.pop();
            while rem.last().is_some_and(Zero::is_zero) {
                rem.pop();
            }
        }
        (Self::from_coeffs(quot), Self::from_coeffs(rem))
    }

    /// Monic greatest common divisor (`0` only for `gcd(0, 0)`).
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b);
            a = b;
            b = r;
        }
        a.monic()
    }

    pub fn pow(&self, k: u32) -> Self {
        (0..k).fold(Self::one(), |acc, _| &acc * self)
    }

    pub fn eval(&self, x: &BigRational) -> BigRational {
        self.coeffs
            .iter()
            .rev()
            .fold(BigRational::zero(), |acc, c| acc * x + c)
    }

    /// `p(a·t + b)`.
    pub fn compose_linear(&self, a: &BigRational, b: &BigRational) -> Self {
        let inner = Self::from_coeffs(vec![b.clone(), a.clone()]);
        self.coeffs.iter().rev().fold(Self::zero(), |acc, c| {
            &(&acc * &inner) + &Self::constant(c.clone())
        })
    }

    /// `p(t + c)`.
    pub fn shift(&self, c: &BigRational) -> Self {
        self.compose_linear(&BigRational::one(), c)
    }

    /// Index of the lowest nonzero coefficient, `None` for zero.
    pub fn low_order(&self) -> Option<usize> {
        self.coeffs.iter().position(|c| !c.is_zero())
    }

    /// `min v_p` over the coefficients (the Gauss valuation), `None` for zero.
    pub fn content_order(&self, p: u64) -> Option<i64> {
        self.coeffs
            .iter()
            .filter(|c| !c.is_zero())
            .filter_map(|c| Some(int_order(c.numer(), p)? - int_order(c.denom(), p)?))
            .min()
    }

    /// Image in `𝔽_p[t]` after dividing out the `p`-content.
    pub(crate) fn reduce_primitive(&self, p: u64) -> Option<ModPoly> {
        let v = self.content_order(p)?;
        let base = BigRational::from_integer(BigInt::from(p));
        let unit = base.pow(i32::try_from(-v).ok()?);
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| reduce_mod(&(c * &unit), p))
            .collect::<Option<Vec<_>>>()?;
        Some(ModPoly::new(coeffs, p))
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let zero = BigRational::zero();
        Polynomial::from_coeffs(
            (0..n)
                .map(|i| {
                    self.coeffs.get(i).unwrap_or(&zero) + rhs.coeffs.get(i).unwrap_or(&zero)
                })
                .collect(),
        )
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Polynomial {
        self + &(-rhs)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![BigRational::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::from_coeffs(out)
    }
}

/// Number of terms, for deciding whether the text form needs parentheses.
pub(crate) fn term_count(p: &Polynomial) -> usize {
    p.coeffs.iter().filter(|c| !c.is_zero()).count()
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let sign = if c.is_negative() { "-" } else { "+" };
            if first {
                if c.is_negative() {
                    f.write_str("-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            first = false;

            let mag = c.abs();
            let mono = match k {
                0 => String::new(),
                1 => "t".to_string(),
                _ => format!("t^{k}"),
            };
            match (k, mag.is_one()) {
                (0, _) => write!(f, "{mag}")?,
                (_, true) => f.write_str(&mono)?,
                (_, false) => write!(f, "{mag}*{mono}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial({self})")
    }
}

/// A polynomial over `𝔽_p`, ascending, without trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModPoly {
    coeffs: Vec<u64>,
    p: u64,
}

impl ModPoly {
    pub(crate) fn new(mut coeffs: Vec<u64>, p: u64) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { coeffs, p }
    }

    pub(crate) fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    fn eval(&self, c: u64) -> u64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0, |acc, a| (mul_mod(acc, c, self.p) + a) % self.p)
    }

    /// Quotient by `t - c`, assuming `c` is a root.
    fn deflate(&self, c: u64) -> Self {
        let n = self.coeffs.len();
        let mut quot = vec![0u64; n.saturating_sub(1)];
        let mut carry = 0u64;
        for i in (1..n).rev() {
            carry = (mul_mod(carry, c, self.p) + self.coeffs[i]) % self.p;
            quot[i - 1] = carry;
        }
        Self::new(quot, self.p)
    }

    /// Multiplicity of `c` as a root; zero polynomials have none.
    pub(crate) fn root_multiplicity(&self, c: u64) -> usize {
        let mut poly = self.clone();
        let mut k = 0;
        while poly.degree().is_some_and(|d| d > 0) && poly.eval(c) == 0 {
            poly = poly.deflate(c);
            k += 1;
        }
        k
    }
}

//! The rational function field `ℚ(t)`.
//!
//! Place catalogue (degree-one places only):
//!
//! ```text
//! point(c)      order of vanishing at t = c        residue field ℚ
//! infinity      deg(den) - deg(num)                residue field ℚ
//! gauss(p)      p-adic content (Gauss extension)   residue field 𝔽_p(t)
//!   └ below point/infinity: adic(p)               on the residue value
//!   └ below gauss(p):       reduced-point(c), reduced-infinity
//! ```
//!
//! The affine automorphisms `t ↦ ±t + b` act on `ℚ(t)` and move points; the
//! constants `ℚ ⊆ ℚ(t)` restrict every tower to a `p`-adic one or to `⊤`.

use super::poly::{ModPoly, Polynomial, term_count};
use super::{call_parts, is_prime, padic_order};
use crate::action::FieldAction;
use crate::comap::FieldEmbedding;
use crate::error::ValuationError;
use crate::field::{Field, Places};
use crate::model::rational::RationalPlace;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A reduced fraction `num / den` with `den` monic.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RationalFunction {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFunction {
    pub fn new(num: Polynomial, den: Polynomial) -> Result<Self, ValuationError> {
        if den.is_zero() {
            return Err(ValuationError::DivisionByZero);
        }
        Ok(Self::normalized(num, den))
    }

    /// Requires a nonzero denominator.
    fn normalized(num: Polynomial, den: Polynomial) -> Self {
        if num.is_zero() {
            return Self::from_polynomial(Polynomial::zero());
        }
        let g = num.gcd(&den);
        let (num, _) = num.div_rem(&g);
        let (den, _) = den.div_rem(&g);
        let lead = den.leading().map(|c| c.recip()).unwrap_or_else(BigRational::one);
        Self {
            num: num.scale(&lead),
            den: den.scale(&lead),
        }
    }

    pub fn from_polynomial(num: Polynomial) -> Self {
        Self {
            num,
            den: Polynomial::one(),
        }
    }

    pub fn constant(c: BigRational) -> Self {
        Self::from_polynomial(Polynomial::constant(c))
    }

    pub fn variable() -> Self {
        Self::from_polynomial(Polynomial::variable())
    }

    /// `num / den` from ascending integer coefficients.
    pub fn from_ints(num: &[i64], den: &[i64]) -> Result<Self, ValuationError> {
        Self::new(Polynomial::from_ints(num), Polynomial::from_ints(den))
    }

    pub fn numer(&self) -> &Polynomial {
        &self.num
    }

    pub fn denom(&self) -> &Polynomial {
        &self.den
    }

    pub fn pow(&self, k: u32) -> Self {
        Self {
            num: self.num.pow(k),
            den: self.den.pow(k),
        }
    }

    /// `x(a·t + b)`, `a ≠ 0`.
    pub fn compose_linear(&self, a: &BigRational, b: &BigRational) -> Self {
        Self::normalized(
            self.num.compose_linear(a, b),
            self.den.compose_linear(a, b),
        )
    }

    /// Order at `t = c` and the value of `x / (t - c)^order` there.
    fn at_point(&self, c: &BigRational) -> Option<(i64, BigRational)> {
        let num = self.num.shift(c);
        let den = self.den.shift(c);
        let (i, j) = (num.low_order()?, den.low_order()?);
        let order = i64::try_from(i).ok()? - i64::try_from(j).ok()?;
        Some((order, num.coeffs()[i].clone() / &den.coeffs()[j]))
    }

    /// Order at infinity and the ratio of leading coefficients.
    fn at_infinity(&self) -> Option<(i64, BigRational)> {
        let order = i64::try_from(self.den.degree()?).ok()? - i64::try_from(self.num.degree()?).ok()?;
        Some((order, self.num.leading()?.clone() / self.den.leading()?))
    }

    fn gauss_order(&self, p: u64) -> Option<i64> {
        Some(self.num.content_order(p)? - self.den.content_order(p)?)
    }

    fn reduced(&self, p: u64) -> Option<(ModPoly, ModPoly)> {
        Some((self.num.reduce_primitive(p)?, self.den.reduce_primitive(p)?))
    }
}

impl Field for RationalFunction {
    fn zero_elem() -> Self {
        Self::from_polynomial(Polynomial::zero())
    }

    fn one_elem() -> Self {
        Self::from_polynomial(Polynomial::one())
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        let num = &(&self.num * &rhs.den) + &(&rhs.num * &self.den);
        Self::normalized(num, &self.den * &rhs.den)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        Self::normalized(&self.num * &rhs.num, &self.den * &rhs.den)
    }

    fn neg_ref(&self) -> Self {
        Self {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    fn inv_ref(&self) -> Option<Self> {
        if self.num.is_zero() {
            None
        } else {
            Some(Self::normalized(self.den.clone(), self.num.clone()))
        }
    }

    fn is_zero_elem(&self) -> bool {
        self.num.is_zero()
    }

    fn probes() -> Vec<Self> {
        const FRACTIONS: &[(&[i64], &[i64])] = &[
            (&[0], &[1]),
            (&[1], &[1]),
            (&[-1], &[1]),
            (&[2], &[1]),
            (&[1], &[2]),
            (&[3], &[1]),
            (&[1], &[3]),
            (&[5], &[1]),
            (&[1], &[5]),
            (&[0, 1], &[1]),
            (&[0, -1], &[1]),
            (&[1], &[0, 1]),
            (&[-1, 1], &[1]),
            (&[1, 1], &[1]),
            (&[0, 2], &[1]),
            (&[0, 1], &[2]),
            (&[1, 0, 1], &[1]),
            (&[-2, 0, 1], &[1]),
            (&[1, 3], &[1]),
            (&[2, 1], &[-3, 1]),
            (&[1, 1, 1], &[0, 2]),
            (&[1], &[-1, 1]),
            (&[0, 1], &[1, 1]),
            (&[1, 5], &[1]),
        ];
        FRACTIONS
            .iter()
            .filter_map(|(num, den)| Self::from_ints(num, den).ok())
            .collect()
    }
}

/// A rank-one step of a tower over `ℚ(t)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunctionPlace {
    Point(BigRational),
    Infinity,
    Gauss(u64),
    /// `p`-adic valuation of the residue value at a point or at infinity.
    Adic(u64),
    /// A point of `𝔽_p`, below `gauss(p)`.
    ReducedPoint(u64),
    ReducedInfinity,
}

impl Places for RationalFunction {
    type Step = FunctionPlace;

    fn admits(prefix: &[FunctionPlace], step: &FunctionPlace) -> bool {
        use FunctionPlace::*;
        match (prefix, step) {
            ([], Point(_) | Infinity) => true,
            ([], Gauss(p)) => is_prime(*p),
            ([Point(_) | Infinity], Adic(p)) => is_prime(*p),
            ([Gauss(p)], ReducedPoint(c)) => c < p,
            ([Gauss(_)], ReducedInfinity) => true,
            _ => false,
        }
    }

    fn order(x: &Self, steps: &[FunctionPlace]) -> Option<Vec<i64>> {
        use FunctionPlace::*;
        if x.is_zero_elem() {
            return None;
        }
        match steps {
            [] => Some(Vec::new()),
            [Point(c)] => Some(vec![x.at_point(c)?.0]),
            [Infinity] => Some(vec![x.at_infinity()?.0]),
            [Gauss(p)] => Some(vec![x.gauss_order(*p)?]),
            [Point(c), Adic(p)] => {
                let (k, residue) = x.at_point(c)?;
                Some(vec![k, padic_order(&residue, *p)?])
            }
            [Infinity, Adic(p)] => {
                let (k, residue) = x.at_infinity()?;
                Some(vec![k, padic_order(&residue, *p)?])
            }
            [Gauss(p), ReducedPoint(c)] => {
                let (num, den) = x.reduced(*p)?;
                let k = i64::try_from(num.root_multiplicity(*c)).ok()?
                    - i64::try_from(den.root_multiplicity(*c)).ok()?;
                Some(vec![x.gauss_order(*p)?, k])
            }
            [Gauss(p), ReducedInfinity] => {
                let (num, den) = x.reduced(*p)?;
                let k = i64::try_from(den.degree()?).ok()? - i64::try_from(num.degree()?).ok()?;
                Some(vec![x.gauss_order(*p)?, k])
            }
            _ => None,
        }
    }
}

impl fmt::Display for FunctionPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(c) => write!(f, "point({c})"),
            Self::Infinity => f.write_str("infinity"),
            Self::Gauss(p) => write!(f, "gauss({p})"),
            Self::Adic(p) => write!(f, "adic({p})"),
            Self::ReducedPoint(c) => write!(f, "reduced-point({c})"),
            Self::ReducedInfinity => f.write_str("reduced-infinity"),
        }
    }
}

impl FromStr for FunctionPlace {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValuationError::Parse(format!("unknown function field place: {s}"));
        match s.trim() {
            "infinity" => return Ok(Self::Infinity),
            "reduced-infinity" => return Ok(Self::ReducedInfinity),
            _ => {}
        }
        let (name, arg) = call_parts(s).ok_or_else(bad)?;
        match name {
            "point" => arg.parse().map(Self::Point).map_err(|_| bad()),
            "gauss" => arg.parse().map(Self::Gauss).map_err(|_| bad()),
            "adic" => arg.parse().map(Self::Adic).map_err(|_| bad()),
            "reduced-point" => arg.parse().map(Self::ReducedPoint).map_err(|_| bad()),
            _ => Err(bad()),
        }
    }
}

impl Serialize for FunctionPlace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        if term_count(&self.num) > 1 {
            write!(f, "({})", self.num)?;
        } else {
            write!(f, "{}", self.num)?;
        }
        if term_count(&self.den) > 1 {
            write!(f, "/({})", self.den)
        } else {
            write!(f, "/{}", self.den)
        }
    }
}

impl fmt::Debug for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RationalFunction({self})")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(BigInt),
    Var,
    Op(char),
}

fn tokenize(s: &str) -> Result<Vec<Token>, ValuationError> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }
                let n = digits
                    .parse()
                    .map_err(|_| ValuationError::Parse(format!("bad number {digits}")))?;
                tokens.push(Token::Num(n));
            }
            't' => {
                tokens.push(Token::Var);
                chars.next();
            }
            '+' | '-' | '*' | '/' | '^' | '(' | ')' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            other => {
                return Err(ValuationError::Parse(format!(
                    "unexpected character {other:?} in {s:?}"
                )));
            }
        }
    }
    Ok(tokens)
}

/// Recursive descent over `+ - * / ^`, parentheses, integers and `t`.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek_op(&self) -> Option<char> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(c)) => Some(*c),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<RationalFunction, ValuationError> {
        let mut acc = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == '+' {
                acc.add_ref(&rhs)
            } else {
                acc.sub_ref(&rhs)
            };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<RationalFunction, ValuationError> {
        let mut acc = self.unary()?;
        while let Some(op @ ('*' | '/')) = self.peek_op() {
            self.pos += 1;
            let rhs = self.unary()?;
            acc = if op == '*' {
                acc.mul_ref(&rhs)
            } else {
                acc.div_ref(&rhs).ok_or(ValuationError::DivisionByZero)?
            };
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<RationalFunction, ValuationError> {
        match self.peek_op() {
            Some('-') => {
                self.pos += 1;
                Ok(self.unary()?.neg_ref())
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<RationalFunction, ValuationError> {
        let base = self.atom()?;
        if self.peek_op() != Some('^') {
            return Ok(base);
        }
        self.pos += 1;
        match self.next() {
            Some(Token::Num(k)) => {
                let k = k
                    .to_u32()
                    .ok_or_else(|| ValuationError::Parse(format!("exponent {k} too large")))?;
                Ok(base.pow(k))
            }
            other => Err(ValuationError::Parse(format!(
                "expected exponent, found {other:?}"
            ))),
        }
    }

    fn atom(&mut self) -> Result<RationalFunction, ValuationError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(RationalFunction::constant(BigRational::from_integer(n))),
            Some(Token::Var) => Ok(RationalFunction::variable()),
            Some(Token::Op('(')) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::Op(')')) => Ok(inner),
                    other => Err(ValuationError::Parse(format!(
                        "expected ')', found {other:?}"
                    ))),
                }
            }
            other => Err(ValuationError::Parse(format!(
                "expected a term, found {other:?}"
            ))),
        }
    }
}

impl FromStr for RationalFunction {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            tokens: tokenize(s)?,
            pos: 0,
        };
        let value = parser.expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(ValuationError::Parse(format!("trailing input in {s:?}")));
        }
        Ok(value)
    }
}

/// The automorphism `φ(t) = ±t + shift`, acting by `x ↦ x ∘ φ⁻¹`.
///
/// With this convention `φ` moves the place `point(c)` to `point(φ(c))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AffineMap {
    reflect: bool,
    shift: BigInt,
}

impl AffineMap {
    pub fn new(reflect: bool, shift: impl Into<BigInt>) -> Self {
        Self {
            reflect,
            shift: shift.into(),
        }
    }

    pub fn identity() -> Self {
        Self::new(false, 0)
    }

    pub fn translation(shift: impl Into<BigInt>) -> Self {
        Self::new(false, shift)
    }

    /// `t ↦ -t`.
    pub fn reflection() -> Self {
        Self::new(true, 0)
    }

    fn sign(&self) -> BigInt {
        if self.reflect {
            -BigInt::one()
        } else {
            BigInt::one()
        }
    }

    /// `φ(c)`.
    pub fn apply_point(&self, c: &BigRational) -> BigRational {
        let signed = if self.reflect { -c } else { c.clone() };
        signed + BigRational::from_integer(self.shift.clone())
    }
}

impl FieldAction<RationalFunction> for AffineMap {
    fn act(&self, x: &RationalFunction) -> RationalFunction {
        let inv = self.inverse();
        x.compose_linear(
            &BigRational::from_integer(inv.sign()),
            &BigRational::from_integer(inv.shift),
        )
    }

    fn inverse(&self) -> Self {
        Self {
            reflect: self.reflect,
            shift: -(self.sign() * &self.shift),
        }
    }

    fn compose(&self, other: &Self) -> Self {
        Self {
            reflect: self.reflect != other.reflect,
            shift: self.sign() * &other.shift + &self.shift,
        }
    }

    fn transport(&self, prefix: &[FunctionPlace], step: &FunctionPlace) -> FunctionPlace {
        match (prefix, step) {
            (_, FunctionPlace::Point(c)) => FunctionPlace::Point(self.apply_point(c)),
            ([FunctionPlace::Gauss(p)], FunctionPlace::ReducedPoint(c)) => {
                let modulus = BigInt::from(*p);
                let moved = (self.sign() * BigInt::from(*c) + &self.shift).mod_floor(&modulus);
                FunctionPlace::ReducedPoint(moved.to_u64().unwrap_or(*c))
            }
            _ => step.clone(),
        }
    }
}

/// The constant embedding `ℚ → ℚ(t)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantEmbedding;

impl FieldEmbedding<BigRational, RationalFunction> for ConstantEmbedding {
    fn map(&self, x: &BigRational) -> RationalFunction {
        RationalFunction::constant(x.clone())
    }

    /// Constants are units at every point and at infinity, so only an
    /// arithmetic step survives.
    fn contract(&self, steps: &[FunctionPlace]) -> Vec<RationalPlace> {
        match steps {
            [FunctionPlace::Gauss(p), ..] | [_, FunctionPlace::Adic(p)] => {
                vec![RationalPlace::Adic(*p)]
            }
            _ => Vec::new(),
        }
    }
}

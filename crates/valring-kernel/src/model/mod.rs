//! Concrete fields with place catalogues.
//!
//! - [`rational`]: `ℚ`, places `adic(p)`
//! - [`function`]: `ℚ(t)`, rank-one and rank-two towers
//! - [`finite`]: `𝔽_p`, no proper valuation subrings
//!
//! The helpers below are the integer arithmetic the catalogues share.

pub mod finite;
pub mod function;
pub mod poly;
pub mod rational;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Trial-division primality; step parameters are small.
pub const fn is_prime(p: u64) -> bool {
    if p < 2 {
        return false;
    }
    let mut d = 2u64;
    while d.saturating_mul(d) <= p {
        if p % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// `v_p(n)`, `None` for zero.
pub(crate) fn int_order(n: &BigInt, p: u64) -> Option<i64> {
    if n.is_zero() {
        return None;
    }
    let p = BigInt::from(p);
    let mut n = n.abs();
    let mut k = 0;
    loop {
        let (q, r) = n.div_rem(&p);
        if !r.is_zero() {
            return Some(k);
        }
        n = q;
        k += 1;
    }
}

/// `v_p(x)`, `None` for zero.
pub(crate) fn padic_order(x: &BigRational, p: u64) -> Option<i64> {
    Some(int_order(x.numer(), p)? - int_order(x.denom(), p)?)
}

/// `x mod p` for `v_p(x) ≥ 0`; `None` when `p` divides the denominator.
pub(crate) fn reduce_mod(x: &BigRational, p: u64) -> Option<u64> {
    let modulus = BigInt::from(p);
    let num = x.numer().mod_floor(&modulus).to_u64()?;
    let den = x.denom().mod_floor(&modulus).to_u64()?;
    Some(mul_mod(num, inv_mod(den, p)?, p))
}

pub(crate) fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(p)) as u64
}

pub(crate) fn pow_mod(mut base: u64, mut exp: u64, p: u64) -> u64 {
    let mut acc = 1 % p;
    base %= p;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, p);
        }
        base = mul_mod(base, base, p);
        exp >>= 1;
    }
    acc
}

/// Inverse modulo a prime, `None` for zero.
pub(crate) fn inv_mod(a: u64, p: u64) -> Option<u64> {
    let a = a % p;
    if a == 0 {
        None
    } else {
        Some(pow_mod(a, p - 2, p))
    }
}

/// Split `name(arg)` into its parts.
pub(crate) fn call_parts(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner.trim()))
}

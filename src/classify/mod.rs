//! Number classification module
//!
//! Pure, stateless predicates over a single `i64`:
//! - primality by deterministic Miller-Rabin
//! - perfect-number check through the Euclid-Euler form
//! - Armstrong (narcissistic) check for any digit count
//! - decimal digit sum
//!
//! Digit-based functions work on the absolute value, so `-153` has the
//! digits `1 5 3` but is never an Armstrong number (a power sum is never
//! negative).

use serde::Serialize;

/// Tag reported in the `properties` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Armstrong,
    Even,
    Odd,
}

/// Classification result returned by the classify endpoint
///
/// Field order is the JSON field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub number: i64,
    pub is_prime: bool,
    pub is_perfect: bool,
    pub properties: Vec<Property>,
    pub digit_sum: u32,
    pub fun_fact: String,
}

/// Numeric part of a classification, computed before the fun fact is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberTraits {
    pub number: i64,
    pub is_prime: bool,
    pub is_perfect: bool,
    pub properties: Vec<Property>,
    pub digit_sum: u32,
}

impl NumberTraits {
    pub fn of(n: i64) -> Self {
        Self {
            number: n,
            is_prime: is_prime(n),
            is_perfect: is_perfect(n),
            properties: properties(n),
            digit_sum: digit_sum(n),
        }
    }

    pub fn with_fun_fact(self, fun_fact: String) -> Classification {
        Classification {
            number: self.number,
            is_prime: self.is_prime,
            is_perfect: self.is_perfect,
            properties: self.properties,
            digit_sum: self.digit_sum,
            fun_fact,
        }
    }
}

/// Witness set that makes Miller-Rabin deterministic for every `u64`
const MILLER_RABIN_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Primality by deterministic Miller-Rabin; `n < 2` is never prime
pub fn is_prime(n: i64) -> bool {
    let Ok(n) = u64::try_from(n) else {
        return false;
    };
    if n < 2 {
        return false;
    }
    for p in MILLER_RABIN_BASES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    MILLER_RABIN_BASES.iter().all(|&a| {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    })
}

/// Sum of proper divisors equals `n` (6, 28, 496, ...)
///
/// Every even perfect number is `2^(p-1) * (2^p - 1)` with `2^p - 1` prime
/// (Euclid-Euler). No odd perfect number exists anywhere near the `i64` range.
pub fn is_perfect(n: i64) -> bool {
    let Ok(n) = u64::try_from(n) else {
        return false;
    };
    if n < 2 || n % 2 == 1 {
        return false;
    }
    let k = n.trailing_zeros();
    let odd_part = n >> k;
    // k <= 62 for a positive i64, so the shift cannot overflow
    let mersenne = (1u64 << (k + 1)) - 1;
    odd_part == mersenne && i64::try_from(mersenne).is_ok_and(is_prime)
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    // The remainder is below m, so it fits back into u64
    #[allow(clippy::cast_possible_truncation)]
    let r = (u128::from(a) * u128::from(b) % u128::from(m)) as u64;
    r
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Each digit raised to the digit count, summed, equals `n`
pub fn is_armstrong(n: i64) -> bool {
    if n < 0 {
        return false;
    }
    let digits = decimal_digits(n);
    let Ok(width) = u32::try_from(digits.len()) else {
        return false;
    };
    let sum: u128 = digits.iter().map(|&d| u128::from(d).pow(width)).sum();
    sum == u128::from(n.unsigned_abs())
}

/// Sum of the decimal digits of `|n|`
pub fn digit_sum(n: i64) -> u32 {
    decimal_digits(n).iter().map(|&d| u32::from(d)).sum()
}

/// Parity tag for `n`
pub const fn parity(n: i64) -> Property {
    if n % 2 == 0 {
        Property::Even
    } else {
        Property::Odd
    }
}

/// `armstrong` (when it holds) followed by exactly one of `even` / `odd`
pub fn properties(n: i64) -> Vec<Property> {
    let mut props = Vec::with_capacity(2);
    if is_armstrong(n) {
        props.push(Property::Armstrong);
    }
    props.push(parity(n));
    props
}

/// Decimal digits of `|n|`, most significant first. `0` yields `[0]`.
fn decimal_digits(n: i64) -> Vec<u8> {
    let mut rest = n.unsigned_abs();
    let mut digits = Vec::with_capacity(20);
    loop {
        // rest % 10 < 10 always fits
        #[allow(clippy::cast_possible_truncation)]
        digits.push((rest % 10) as u8);
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

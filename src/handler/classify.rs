//! Classify endpoint
//!
//! Validates the `number` query parameter, classifies it, fetches the fun
//! fact and renders the JSON result.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::time::Instant;

use crate::classify::NumberTraits;
use crate::config::AppState;
use crate::facts;
use crate::http;
use crate::logger;

pub const CLASSIFY_PATH: &str = "/api/v1/classify-number";

/// Echo used when the parameter is absent or empty
const UNDEFINED: &str = "undefined";

/// 400 body for a missing or non-numeric `number`
#[derive(Debug, Serialize)]
pub struct InvalidNumber {
    pub number: String,
    pub error: bool,
}

pub async fn classify_number(query: Option<&str>, state: &AppState) -> Response<Full<Bytes>> {
    let http_config = &state.config.http;

    let number = match number_param(query) {
        Ok(n) => n,
        Err(raw) => {
            logger::log_warning(&format!("Rejected number parameter: {raw:?}"));
            let body = InvalidNumber {
                number: raw,
                error: true,
            };
            return http::json_response(StatusCode::BAD_REQUEST, &body, http_config);
        }
    };

    let started = Instant::now();
    let traits = NumberTraits::of(number);
    logger::log_debug(&format!(
        "Classified {number} in {}us",
        started.elapsed().as_micros()
    ));

    let fun_fact = facts::fun_fact_or_fallback(state.facts.as_ref(), number).await;
    http::json_response(StatusCode::OK, &traits.with_fun_fact(fun_fact), http_config)
}

/// Extract and parse `number` from a raw query string
///
/// On failure returns the value to echo back: the raw parameter, or
/// `"undefined"` when it is missing or empty.
pub fn number_param(query: Option<&str>) -> Result<i64, String> {
    let raw = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "number")
            .map(|(_, value)| value.into_owned())
    });

    match raw {
        None => Err(UNDEFINED.to_string()),
        Some(value) if value.is_empty() => Err(UNDEFINED.to_string()),
        Some(value) => parse_number(&value).ok_or(value),
    }
}

/// Parse a numeric literal, truncating any fractional part toward zero
///
/// Accepts decimal `[+-]digits[.digits][e[+-]digits]` (either side of the
/// point may be empty, not both) and unsigned `0x`/`0o`/`0b` integers, with
/// surrounding whitespace. `Infinity`, `NaN` and values whose truncated
/// integer falls outside `i64` are `None`.
pub fn parse_number(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Some(n) = parse_radix_literal(s) {
        return n;
    }

    let (negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, parse_exponent(e)?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !is_digits(int_part) || !is_digits(frac_part) {
        return None;
    }

    // Move the decimal point by the exponent, then keep what lies left of it
    let digits = format!("{int_part}{frac_part}");
    let significant = digits.trim_start_matches('0');
    let leading_zeros = digits.len() - significant.len();
    let point = i64::try_from(int_part.len())
        .ok()?
        .saturating_add(exponent)
        .saturating_sub(i64::try_from(leading_zeros).ok()?);
    if significant.is_empty() || point <= 0 {
        return Some(0);
    }
    // 20 or more integer digits is at least 10^19, beyond i64
    let point = usize::try_from(point).ok().filter(|&p| p <= 19)?;

    let mut int_digits = String::with_capacity(point + 1);
    if negative {
        int_digits.push('-');
    }
    if point <= significant.len() {
        int_digits.push_str(&significant[..point]);
    } else {
        int_digits.push_str(significant);
        int_digits.push_str(&"0".repeat(point - significant.len()));
    }
    // Parsed with the sign attached so i64::MIN is reachable
    int_digits.parse().ok()
}

/// `0x`/`0o`/`0b` literal: `Some(result)` when the prefix matches
fn parse_radix_literal(s: &str) -> Option<Option<i64>> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    // from_str_radix would accept a sign here
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Some(None);
    }
    Some(i64::from_str_radix(digits, radix).ok())
}

/// Exponent digits with optional sign; huge magnitudes saturate
fn parse_exponent(raw: &str) -> Option<i64> {
    let (negative, digits) = if let Some(rest) = raw.strip_prefix('-') {
        (true, rest)
    } else {
        (false, raw.strip_prefix('+').unwrap_or(raw))
    };
    if digits.is_empty() || !is_digits(digits) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn is_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

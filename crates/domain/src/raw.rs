//! Total accessors over parsed but unvalidated upstream JSON
//!
//! None of these functions fail: a value of the wrong shape resolves to the
//! documented default instead.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// `1.500`, `3.000.000`, `1.234,5`: dots that can only be thousands separators
static PT_BR_GROUPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d{1,3}(?:\.\d{3})+(?:,\d+)?$").expect("static regex is valid")
});

/// First candidate key present in `obj`, in candidate order.
///
/// A key holding an explicit `null` counts as present. Non-object inputs have
/// no keys.
pub fn first_present<'a>(obj: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let map = obj.as_object()?;
    candidates.iter().find_map(|key| map.get(*key))
}

/// Numeric value of `value`, or None when it does not parse to a finite number.
///
/// Strings are trimmed, may carry an `R$` prefix, and may use pt-BR grouping
/// (`1.234.567,89`). Amounts with an `R$` prefix, a decimal comma, or dots in
/// thousands positions only (`15.000`) are read as pt-BR.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Like [`coerce_number`], restricted to non-negative integers that fit in `u32`
pub fn coerce_u32(value: Option<&Value>) -> Option<u32> {
    coerce_number(value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}

/// Non-negative integer count; anything else (including negatives) is 0
pub fn coerce_count(value: Option<&Value>) -> u64 {
    coerce_number(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64)
        .unwrap_or(0)
}

/// `"false"`, `"0"`, `"no"`, `""`, `0`, `null` and absence are false; all else is true.
///
/// Text is compared after trimming and without regard to case.
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty()
                || s.eq_ignore_ascii_case("false")
                || s == "0"
                || s.eq_ignore_ascii_case("no"))
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Elements of an array value; anything that is not an array is empty
pub fn coerce_array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Trimmed, non-empty text. Numbers are rendered as text.
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_numeric_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (currency, body) = match trimmed.strip_prefix("R$") {
        Some(rest) => (true, rest.trim()),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return None;
    }

    // pt-BR: '.' groups thousands, ',' separates decimals
    if currency || body.contains(',') || PT_BR_GROUPED.is_match(body) {
        let normalized = body.replace('.', "").replace(',', ".");
        return normalized.parse::<f64>().ok();
    }

    body.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_present_honors_candidate_order() {
        let obj = json!({"numeros": [1], "dezenas": [2]});
        let found = first_present(&obj, &["dezenas", "numeros"]);
        assert_eq!(found, Some(&json!([2])));
    }

    #[test]
    fn test_first_present_counts_explicit_null() {
        let obj = json!({"dezenas": null, "numeros": [1]});
        assert_eq!(
            first_present(&obj, &["dezenas", "numeros"]),
            Some(&Value::Null)
        );
        assert_eq!(first_present(&json!([1, 2]), &["dezenas"]), None);
    }

    #[test]
    fn test_coerce_bool_table() {
        let falsy = [json!("false"), json!("0"), json!("no"), json!(0), Value::Null];
        for value in &falsy {
            assert!(!coerce_bool(Some(value)), "{value} should be false");
        }
        assert!(!coerce_bool(None));

        let shouted = [json!("FALSE"), json!(" No "), json!("  ")];
        for value in &shouted {
            assert!(!coerce_bool(Some(value)), "{value} should be false");
        }

        let truthy = [json!("true"), json!(1), json!("yes"), json!({})];
        for value in &truthy {
            assert!(coerce_bool(Some(value)), "{value} should be true");
        }
    }

    #[test]
    fn test_coerce_number_never_leaks_strings() {
        assert_eq!(coerce_number(Some(&json!(42))), Some(42.0));
        assert_eq!(coerce_number(Some(&json!(" 17 "))), Some(17.0));
        assert_eq!(coerce_number(Some(&json!("R$ 1.234.567,89"))), Some(1234567.89));
        assert_eq!(coerce_number(Some(&json!("3.000.000"))), Some(3000000.0));
        assert_eq!(coerce_number(Some(&json!("R$ 1.500"))), Some(1500.0));
        assert_eq!(coerce_number(Some(&json!("15.000"))), Some(15000.0));
        assert_eq!(coerce_number(Some(&json!("1.500,00"))), Some(1500.0));
        assert_eq!(coerce_number(Some(&json!("12,5"))), Some(12.5));
        assert_eq!(coerce_number(Some(&json!("2.5"))), Some(2.5));
        assert_eq!(coerce_number(Some(&json!("1234.56"))), Some(1234.56));
        assert_eq!(coerce_number(Some(&json!("abc"))), None);
        assert_eq!(coerce_number(Some(&json!(""))), None);
        assert_eq!(coerce_number(Some(&json!(true))), None);
        assert_eq!(coerce_number(Some(&Value::Null)), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn test_coerce_u32_rejects_fractions_and_negatives() {
        assert_eq!(coerce_u32(Some(&json!("2700"))), Some(2700));
        assert_eq!(coerce_u32(Some(&json!(1.5))), None);
        assert_eq!(coerce_u32(Some(&json!(-3))), None);
        assert_eq!(coerce_count(Some(&json!(-3))), 0);
    }

    #[test]
    fn test_coerce_array_and_string() {
        assert!(coerce_array(Some(&json!("01 02"))).is_empty());
        assert_eq!(coerce_array(Some(&json!([1, 2]))).len(), 2);
        assert_eq!(coerce_string(Some(&json!("  SP "))), Some("SP".to_string()));
        assert_eq!(coerce_string(Some(&json!(7))), Some("7".to_string()));
        assert_eq!(coerce_string(Some(&json!("   "))), None);
    }
}

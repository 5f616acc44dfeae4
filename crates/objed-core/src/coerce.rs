// Leaf coercion from form text to JSON scalars.
use serde_json::Value;

/// Convert a raw form string into a scalar.
///
/// Precedence: `"true"`, `"false"`, `"null"`, then numbers, then the string
/// itself. Numbers use [`parse_number`]'s grammar and always become floats.
pub fn coerce(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match parse_number(raw) {
            Some(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            None => Value::String(raw.to_string()),
        },
    }
}

/// Parse a decimal number literal.
///
/// Accepted: `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
/// Rejected: whitespace, hex, `NaN`, `Infinity`/`inf`, the empty string, and
/// literals that overflow to infinity.
pub fn parse_number(s: &str) -> Option<f64> {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < b.len() && matches!(b[i], b'e' | b'E') {
        i += 1;
        if i < b.len() && matches!(b[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != b.len() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_numbers() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number("-1.5e3"), Some(-1500.0));
        assert_eq!(parse_number("+2"), Some(2.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("007"), Some(7.0));
        assert_eq!(parse_number("1E-2"), Some(0.01));
    }

    #[test]
    fn rejected_numbers() {
        for s in [
            "", " 5", "5 ", "0x10", "NaN", "nan", "Infinity", "-Infinity", "inf", "1e", "e5",
            ".", "+", "1.2.3", "1e400", "1_000", "--1",
        ] {
            assert_eq!(parse_number(s), None, "{s:?}");
        }
    }

    #[test]
    fn keyword_precedence() {
        assert_eq!(coerce("true"), Value::Bool(true));
        assert_eq!(coerce("false"), Value::Bool(false));
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("True"), Value::String("True".into()));
        assert_eq!(coerce("NaN"), Value::String("NaN".into()));
        assert_eq!(coerce(""), Value::String(String::new()));
        assert_eq!(coerce("5").as_f64(), Some(5.0));
        assert!(coerce("5").is_f64());
    }
}

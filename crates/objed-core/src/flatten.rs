// Nested document -> flat form data (the inverse of `rebuild`).
use serde_json::Value;

use crate::path::DELIMITER;
use crate::rebuild::FlatMapping;

/// Flatten a document into `(PathKey, RawValue)` pairs in document order.
///
/// Array elements are keyed by their decimal index. Scalars are rendered the
/// way a form field would hold them: `null`, `true`/`false`, the number's
/// display form, or the string verbatim. Empty containers have no leaves and
/// produce no pairs. A scalar root produces a single pair with an empty key.
pub fn flatten(doc: &Value) -> FlatMapping {
    let mut out = Vec::new();
    let mut prefix = String::new();
    walk(doc, &mut prefix, 0, &mut out);
    out
}

fn walk(v: &Value, prefix: &mut String, depth: usize, out: &mut FlatMapping) {
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                with_segment(prefix, depth, k, |p| walk(child, p, depth + 1, out));
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                with_segment(prefix, depth, &i.to_string(), |p| {
                    walk(child, p, depth + 1, out)
                });
            }
        }
        scalar => out.push((prefix.clone(), render_scalar(scalar))),
    }
}

// Segments may be empty, so the delimiter is driven by depth, not prefix length.
fn with_segment(prefix: &mut String, depth: usize, seg: &str, f: impl FnOnce(&mut String)) {
    let len = prefix.len();
    if depth > 0 {
        prefix.push(DELIMITER);
    }
    prefix.push_str(seg);
    f(prefix);
    prefix.truncate(len);
}

/// Render a scalar the way it appears in a form field.
pub fn render_scalar(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // integral floats print without a trailing ".0"
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}

/// Deep equality where numbers compare by value (`5` equals `5.0`).
pub fn equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equivalent(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| equivalent(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_like_form_fields() {
        assert_eq!(render_scalar(&json!(null)), "null");
        assert_eq!(render_scalar(&json!(true)), "true");
        assert_eq!(render_scalar(&json!(5)), "5");
        assert_eq!(render_scalar(&json!(5.0)), "5");
        assert_eq!(render_scalar(&json!(-2.5)), "-2.5");
        assert_eq!(render_scalar(&json!("x y")), "x y");
    }

    #[test]
    fn numbers_equivalent_across_representations() {
        assert!(equivalent(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2.0]})));
        assert!(!equivalent(&json!({"a": 1}), &json!({"a": "1"})));
        assert!(!equivalent(&json!([1, 2]), &json!([1])));
    }
}

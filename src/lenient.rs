// src/lenient.rs
//! Coercion helpers for untrusted JSON (news API payloads, LLM output, UI posts).
//!
//! Every helper degrades to `None` / empty instead of failing, so boundary
//! parsers can build fully populated records in one pass.

use serde_json::Value;

/// First key in `keys` holding a usable scalar, rendered as a trimmed string.
/// Empty strings count as missing (so `a || b` style fallbacks work).
pub fn string_field(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| v.get(*k))
        .find_map(scalar_to_string)
}

/// Same as [`string_field`] but falls back to an empty string.
pub fn string_or_empty(v: &Value, keys: &[&str]) -> String {
    string_field(v, keys).unwrap_or_default()
}

/// Scalar → string. Objects, arrays, null and blank strings yield `None`.
pub fn scalar_to_string(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Number or numeric string (`"85"`, `" 85.5 % "`). Non-finite values are rejected.
pub fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// First key in `keys` holding a number (see [`number`]).
pub fn number_field(v: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| v.get(*k)).find_map(number)
}

/// List of strings from the first key holding an array (or a lone string).
/// Non-scalar elements are skipped.
pub fn string_list(v: &Value, keys: &[&str]) -> Vec<String> {
    for k in keys {
        match v.get(*k) {
            Some(Value::Array(items)) => {
                return items.iter().filter_map(scalar_to_string).collect();
            }
            Some(other) => {
                if let Some(s) = scalar_to_string(other) {
                    return vec![s];
                }
            }
            None => {}
        }
    }
    Vec::new()
}

/// Objects from the first key holding an array. Non-object elements are skipped.
pub fn object_list<'a>(v: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    keys.iter()
        .filter_map(|k| v.get(*k))
        .find_map(|x| x.as_array())
        .map(|items| items.iter().filter(|x| x.is_object()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_field_falls_through_blank_and_wrong_types() {
        let v = json!({ "a": "", "b": ["x"], "c": 42, "d": "later" });
        assert_eq!(string_field(&v, &["a", "b", "c"]), Some("42".into()));
        assert_eq!(string_field(&v, &["a", "b"]), None);
        assert_eq!(string_or_empty(&v, &["missing"]), "");
    }

    #[test]
    fn number_accepts_numeric_strings_and_percent() {
        assert_eq!(number(&json!(85)), Some(85.0));
        assert_eq!(number(&json!(" 72.5 % ")), Some(72.5));
        assert_eq!(number(&json!("high")), None);
        assert_eq!(number(&json!(null)), None);
    }

    #[test]
    fn string_list_handles_arrays_and_lone_strings() {
        let v = json!({ "xs": ["boiler", 3, null, {"k": 1}, "  "], "one": "genset" });
        assert_eq!(string_list(&v, &["xs"]), vec!["boiler", "3"]);
        assert_eq!(string_list(&v, &["nope", "one"]), vec!["genset"]);
        assert!(string_list(&v, &["nope"]).is_empty());
    }

    #[test]
    fn object_list_skips_scalars() {
        let v = json!({ "p": [{"product": "HSD"}, "junk", 7] });
        assert_eq!(object_list(&v, &["p"]).len(), 1);
    }
}

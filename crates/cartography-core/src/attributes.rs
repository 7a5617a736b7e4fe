//! Lenient accessors for loosely-typed resource attributes.
//!
//! Providers disagree on how they encode values: ports may arrive as numbers
//! or strings, flags as booleans or `"yes"`. Each accessor accepts the common
//! encodings and returns `None` when the key is absent or cannot be coerced.

use serde_json::{Map, Value};

use crate::resource::Attributes;

/// Reads an attribute as a string.
///
/// Integral numbers are rendered without a fractional part and booleans as
/// `true`/`false`.
pub fn string(attrs: &Attributes, key: &str) -> Option<String> {
    value_to_string(attrs.get(key)?)
}

/// Converts a scalar JSON value into its string form.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| format!("{f:.0}"))
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads an attribute as a float, parsing numeric strings.
pub fn float(attrs: &Attributes, key: &str) -> Option<f64> {
    match attrs.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an attribute as an integer, truncating floats and parsing strings.
pub fn int(attrs: &Attributes, key: &str) -> Option<i64> {
    match attrs.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an attribute as a boolean.
///
/// Accepts booleans, `true`/`yes`/`1` and `false`/`no`/`0` in any case, and
/// numbers (non-zero is true).
pub fn bool(attrs: &Attributes, key: &str) -> Option<bool> {
    match attrs.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads an attribute as a list of strings.
///
/// Arrays keep their string and numeric entries; a single string becomes a
/// one-element list. Arrays with no usable entry yield `None`.
pub fn string_list(attrs: &Attributes, key: &str) -> Option<Vec<String>> {
    match attrs.get(key)? {
        Value::Array(items) => {
            let list: Vec<String> = items
                .iter()
                .filter(|item| matches!(item, Value::String(_) | Value::Number(_)))
                .filter_map(value_to_string)
                .collect();
            (!list.is_empty()).then_some(list)
        }
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Reads an attribute as a nested object.
pub fn map<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a Map<String, Value>> {
    attrs.get(key)?.as_object()
}

/// Reads a nested block: the first object of a list-valued attribute, or the
/// attribute itself when it is an object.
pub fn first_block<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a Map<String, Value>> {
    match attrs.get(key)? {
        Value::Array(items) => items.first()?.as_object(),
        Value::Object(obj) => Some(obj),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("test attributes must be an object"),
        }
    }

    #[test]
    fn test_string_coercion() {
        let a = attrs(json!({
            "name": "web",
            "port": 443,
            "weight": 2.0,
            "enabled": true,
            "tags": ["a"]
        }));

        assert_eq!(string(&a, "name").as_deref(), Some("web"));
        assert_eq!(string(&a, "port").as_deref(), Some("443"));
        assert_eq!(string(&a, "weight").as_deref(), Some("2"));
        assert_eq!(string(&a, "enabled").as_deref(), Some("true"));
        assert_eq!(string(&a, "tags"), None);
        assert_eq!(string(&a, "missing"), None);
    }

    #[test]
    fn test_numeric_coercion() {
        let a = attrs(json!({"n": 8080, "f": 1.5, "s": " 42 ", "bad": "x"}));

        assert_eq!(float(&a, "n"), Some(8080.0));
        assert_eq!(float(&a, "f"), Some(1.5));
        assert_eq!(float(&a, "s"), Some(42.0));
        assert_eq!(float(&a, "bad"), None);

        assert_eq!(int(&a, "n"), Some(8080));
        assert_eq!(int(&a, "f"), Some(1));
        assert_eq!(int(&a, "s"), Some(42));
        assert_eq!(int(&a, "bad"), None);
    }

    #[test]
    fn test_bool_coercion() {
        let a = attrs(json!({
            "a": true, "b": "YES", "c": "0", "d": 2, "e": "maybe", "f": "False"
        }));

        assert_eq!(bool(&a, "a"), Some(true));
        assert_eq!(bool(&a, "b"), Some(true));
        assert_eq!(bool(&a, "c"), Some(false));
        assert_eq!(bool(&a, "d"), Some(true));
        assert_eq!(bool(&a, "e"), None);
        assert_eq!(bool(&a, "f"), Some(false));
    }

    #[test]
    fn test_string_list_coercion() {
        let a = attrs(json!({
            "ids": ["1", 2, null, {"x": 1}],
            "single": "sg-1",
            "empty": [],
            "objects": [{"x": 1}]
        }));

        assert_eq!(
            string_list(&a, "ids"),
            Some(vec!["1".to_string(), "2".to_string()])
        );
        assert_eq!(string_list(&a, "single"), Some(vec!["sg-1".to_string()]));
        assert_eq!(string_list(&a, "empty"), None);
        assert_eq!(string_list(&a, "objects"), None);
    }

    #[test]
    fn test_nested_blocks() {
        let a = attrs(json!({
            "inbound_rule": [{"port_range": "22"}, {"port_range": "80"}],
            "settings": {"mode": "strict"},
            "none": []
        }));

        let rule = first_block(&a, "inbound_rule").unwrap();
        assert_eq!(rule["port_range"], json!("22"));
        assert_eq!(first_block(&a, "settings").unwrap()["mode"], json!("strict"));
        assert!(first_block(&a, "none").is_none());
        assert!(map(&a, "settings").is_some());
        assert!(map(&a, "inbound_rule").is_none());
    }
}

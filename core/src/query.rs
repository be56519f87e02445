//! Query-string encoding with bracket notation for nested values.
//!
//! Lists become `key[]=a&key[]=b`, maps become `key[sub]=v`, to any depth.
//! Key names and values are form-urlencoded; the structural brackets are
//! left literal. `null` entries are omitted.

use serde_json::Value;

use crate::types::Parameters;

/// Build a query string from `params`, without the leading `?`.
///
/// An empty mapping gives an empty string.
pub fn build(params: &Parameters) -> String {
    flatten(params, encode)
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append `params` to `path`, adding `?` only when there is something to add.
pub fn with_query(path: &str, params: &Parameters) -> String {
    let query = build(params);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Flatten nested parameters into `(key, value)` pairs in insertion order.
///
/// Each key name is passed through `key_fn` before the bracket path is
/// assembled; values are returned raw. Multipart form fields reuse this so
/// both encodings agree on structure.
pub(crate) fn flatten(params: &Parameters, key_fn: fn(&str) -> String) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push(&mut pairs, key_fn, key_fn(key), value);
    }
    pairs
}

fn push(
    pairs: &mut Vec<(String, String)>,
    key_fn: fn(&str) -> String,
    prefix: String,
    value: &Value,
) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((prefix, b.to_string())),
        Value::Number(n) => pairs.push((prefix, n.to_string())),
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Array(items) => {
            for item in items {
                push(pairs, key_fn, format!("{prefix}[]"), item);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                push(pairs, key_fn, format!("{prefix}[{}]", key_fn(key)), item);
            }
        }
    }
}

fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_mapping_is_empty_string() {
        assert_eq!(build(&Parameters::new()), "");
        assert_eq!(with_query("/servers", &Parameters::new()), "/servers");
    }

    #[test]
    fn flat_values_keep_insertion_order() {
        let p = params(json!({"zone": "eu-1", "page": 2, "active": true}));
        assert_eq!(build(&p), "zone=eu-1&page=2&active=true");
    }

    #[test]
    fn lists_use_empty_brackets() {
        let p = params(json!({"tags": ["a", "b"]}));
        assert_eq!(build(&p), "tags[]=a&tags[]=b");
    }

    #[test]
    fn nested_maps_use_bracket_paths() {
        let p = params(json!({"filter": {"status": "running", "labels": {"env": "prod"}}}));
        assert_eq!(
            build(&p),
            "filter[status]=running&filter[labels][env]=prod"
        );
    }

    #[test]
    fn keys_and_values_are_encoded() {
        let p = params(json!({"full name": "a&b=c", "q": "x/y?"}));
        assert_eq!(build(&p), "full+name=a%26b%3Dc&q=x%2Fy%3F");
    }

    #[test]
    fn nulls_are_skipped() {
        let p = params(json!({"a": null, "b": 1}));
        assert_eq!(build(&p), "b=1");
    }

    #[test]
    fn flat_maps_round_trip() {
        let p = params(json!({"name": "my server", "size": "10 GB", "ünï": "çødé", "n": 7}));
        let query = build(&p);
        let parsed: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let expected: Vec<(String, String)> = p
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn with_query_appends() {
        let p = params(json!({"page": 1}));
        assert_eq!(with_query("/images", &p), "/images?page=1");
    }
}

//! Response variable extraction for `save_variables`

use reqwest::header::HeaderMap;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::Scope;

const HEADER_PREFIX: &str = "header.";

/// Store each `name -> source` directive that resolves against the response.
///
/// A source of `header.<Name>` reads a response header; anything else is a
/// JSON path into the body. Directives that resolve to nothing are skipped.
pub fn extract_variables(
    save_variables: &BTreeMap<String, String>,
    headers: &HeaderMap,
    body: &str,
    scope: &mut Scope,
) {
    // Parsed lazily, header-only steps never pay for it
    let mut parsed: Option<Option<Value>> = None;

    for (name, source) in save_variables {
        if name.is_empty() || source.is_empty() {
            continue;
        }

        if let Some(header) = source.strip_prefix(HEADER_PREFIX) {
            let value = headers
                .get(header)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if !value.is_empty() {
                scope.insert(name.clone(), value.to_string());
            }
            continue;
        }

        let document = parsed.get_or_insert_with(|| serde_json::from_str(body).ok());
        let Some(document) = document.as_ref() else {
            debug!(variable = %name, "response body is not JSON, skipping");
            continue;
        };

        if let Some(value) = json_path(document, source) {
            scope.insert(name.clone(), raw_text(&value));
        }
    }
}

/// Evaluate a dotted path against a JSON document.
///
/// Segments are separated by `.` (escape a literal dot as `\.`), array
/// elements are addressed by index and `#` yields an array's length. A `#`
/// followed by more segments maps the rest of the path over every element.
pub fn json_path(document: &Value, path: &str) -> Option<Value> {
    let segments = split_path(path);
    walk(document, &segments)
}

fn walk(current: &Value, segments: &[String]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(current.clone());
    };

    match current {
        Value::Array(items) if head == "#" => {
            if rest.is_empty() {
                Some(Value::from(items.len()))
            } else {
                Some(Value::Array(
                    items.iter().filter_map(|item| walk(item, rest)).collect(),
                ))
            }
        }
        Value::Array(items) => {
            let index: usize = head.parse().ok()?;
            walk(items.get(index)?, rest)
        }
        Value::Object(map) => walk(map.get(head.as_str())?, rest),
        _ => None,
    }
}

fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Strings are stored without quotes, everything else as compact JSON
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn directives(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_json_path_lookups() {
        let doc = json!({
            "data": {"token": "abc", "user": {"id": 42}},
            "items": [{"id": "a"}, {"id": "b"}],
            "dotted.key": true
        });

        assert_eq!(json_path(&doc, "data.token"), Some(json!("abc")));
        assert_eq!(json_path(&doc, "data.user.id"), Some(json!(42)));
        assert_eq!(json_path(&doc, "items.1.id"), Some(json!("b")));
        assert_eq!(json_path(&doc, "items.#"), Some(json!(2)));
        assert_eq!(json_path(&doc, "items.#.id"), Some(json!(["a", "b"])));
        assert_eq!(json_path(&doc, r"dotted\.key"), Some(json!(true)));
        assert_eq!(json_path(&doc, "data.missing"), None);
        assert_eq!(json_path(&doc, "items.9"), None);
        assert_eq!(json_path(&doc, "data.token.deeper"), None);
    }

    #[test]
    fn test_extracts_body_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session", HeaderValue::from_static("s-1"));
        headers.insert("x-empty", HeaderValue::from_static(""));

        let body = r#"{"data":{"token":"abc","count":3,"user":{"id":7}}}"#;
        let mut scope = Scope::new();
        extract_variables(
            &directives(&[
                ("token", "data.token"),
                ("count", "data.count"),
                ("user", "data.user"),
                ("session", "header.X-Session"),
                ("empty", "header.X-Empty"),
                ("absent", "data.nope"),
                ("", "data.token"),
                ("blank", ""),
            ]),
            &headers,
            body,
            &mut scope,
        );

        assert_eq!(scope["token"], "abc");
        assert_eq!(scope["count"], "3");
        assert_eq!(scope["user"], r#"{"id":7}"#);
        assert_eq!(scope["session"], "s-1");
        assert!(!scope.contains_key("empty"));
        assert!(!scope.contains_key("absent"));
        assert!(!scope.contains_key("blank"));
        assert_eq!(scope.len(), 4);
    }

    #[test]
    fn test_non_json_body_only_yields_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("location", HeaderValue::from_static("/next"));

        let mut scope = Scope::new();
        extract_variables(
            &directives(&[("next", "header.Location"), ("id", "id")]),
            &headers,
            "<html>",
            &mut scope,
        );

        assert_eq!(scope.get("next").map(String::as_str), Some("/next"));
        assert!(!scope.contains_key("id"));
    }
}

//! Canonical request paths
//!
//! Stored mock paths and inbound lookups go through the same normalization,
//! so the order of query pairs never decides whether a mock matches.

use url::form_urlencoded;

/// Append a canonical form of the query string to `path`
///
/// Pairs are re-encoded and ordered by key, keeping the relative order of
/// repeated keys, so `?b=2&a=1` and `?a=1&b=2` produce the same lookup path.
pub fn compose_path(path: &str, raw_query: Option<&str>) -> String {
    let Some(query) = raw_query.filter(|q| !q.is_empty()) else {
        return path.to_string();
    };

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    if pairs.is_empty() {
        return path.to_string();
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    format!("{}?{}", path, encoded)
}

/// Canonical form of a path that may carry its own `?query`
pub fn canonical_path(path_with_query: &str) -> String {
    match path_with_query.split_once('?') {
        Some((path, query)) => compose_path(path, Some(query)),
        None => path_with_query.to_string(),
    }
}

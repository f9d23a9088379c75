//! Response header sanitization for stored mock headers
//!
//! Only a fixed whitelist of header names (plus anything starting with
//! `x-custom-`) may be copied from a mock record onto a response. Values are
//! reduced to printable ASCII, stripped of CR/LF, trimmed and HTML-escaped.
//! The escaping is kept for compatibility with existing clients even though
//! it is not needed for transport safety.

use std::collections::BTreeMap;

/// Header names (lowercase) a mock record may set on a response
pub const ALLOWED_RESPONSE_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "cache-control",
    "expires",
    "last-modified",
    "etag",
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
    "access-control-expose-headers",
    "access-control-max-age",
    "access-control-allow-credentials",
    "x-request-id",
    "x-trace-id",
    "x-correlation-id",
    "x-api-version",
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-ratelimit-reset",
];

/// Prefix that admits application-defined headers
pub const CUSTOM_HEADER_PREFIX: &str = "x-custom-";

/// Entities produced by the escaping step; they are never escaped twice
const ESCAPED_ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&#34;", "&#39;"];

/// Outcome of sanitizing a header map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedHeaders {
    /// Surviving headers, keyed by their original name
    pub headers: BTreeMap<String, String>,
    /// Human-readable notes about dropped or rewritten headers
    pub advisories: Vec<String>,
}

/// Whether a header name may be copied onto a response
pub fn is_allowed_header_name(name: &str) -> bool {
    let normalized = name.trim().to_ascii_lowercase();
    ALLOWED_RESPONSE_HEADERS.contains(&normalized.as_str())
        || normalized.starts_with(CUSTOM_HEADER_PREFIX)
}

/// Reduce a header value to a single safe line
pub fn sanitize_header_value(value: &str) -> String {
    let printable: String = value
        .chars()
        .filter(|&c| (' '..='~').contains(&c) || c == '\t')
        .filter(|&c| c != '\r' && c != '\n')
        .collect();

    html_escape(printable.trim())
}

/// Filter and clean a header map
pub fn sanitize_headers(headers: &BTreeMap<String, String>) -> SanitizedHeaders {
    let mut result = SanitizedHeaders::default();

    for (name, value) in headers {
        if !is_allowed_header_name(name) {
            result.advisories.push(format!("Header not allowed: {}", name));
            continue;
        }

        let sanitized = sanitize_header_value(value);
        if &sanitized != value {
            result.advisories.push(format!("Header value sanitized: {}", name));
        }
        result.headers.insert(name.clone(), sanitized);
    }

    if !result.advisories.is_empty() {
        tracing::warn!(advisories = ?result.advisories, "Response headers sanitized");
    }

    result
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        match c {
            '&' if ESCAPED_ENTITIES.iter().any(|e| input[i..].starts_with(e)) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

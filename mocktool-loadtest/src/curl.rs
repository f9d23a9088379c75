//! Inline `curl` step definitions
//!
//! Only the flags that describe a request are understood: the URL, `-X` /
//! `--request`, `-H` / `--header` and the `-d` / `--data*` family. Anything
//! else on the command line is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{LoadResult, LoadTestError};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect($re));
    };
}

pattern!(LINE_CONTINUATION, r"\\\r?\n");
pattern!(NEWLINE, r"\r?\n");
pattern!(WHITESPACE, r"\s+");
pattern!(QUOTED_URL, r#"curl\s+(?:--location\s+)?['"]([^'"]+)['"]"#);
pattern!(BARE_URL, r"curl\s+(?:--location\s+)?(\S+)");
pattern!(METHOD, r#"(?:-X|--request)\s+['"]?([A-Z]+)['"]?"#);
pattern!(HEADER, r#"(?:-H|--header)\s+['"]([^'"]+)['"]"#);
pattern!(DATA_SINGLE, r"(?:--data-raw|--data-binary|--data|-d)\s+'([^']+)'");
pattern!(DATA_DOUBLE, r#"(?:--data-raw|--data-binary|--data|-d)\s+"([^"]+)""#);
pattern!(DATA_BRACES, r"(?:--data-raw|--data-binary|--data|-d)\s+(\{[^}]+\})");

/// Request described by a curl command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlRequest {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Whether a step path is a curl command rather than a URL
pub fn is_curl_command(path: &str) -> bool {
    let trimmed = path.trim();
    trimmed.starts_with("curl ") || trimmed.starts_with("curl\t")
}

pub fn parse_curl(command: &str) -> LoadResult<CurlRequest> {
    if command.is_empty() {
        return Err(LoadTestError::EmptyCurl);
    }

    let normalized = LINE_CONTINUATION.replace_all(command, " ");
    let normalized = NEWLINE.replace_all(&normalized, " ");
    let normalized = WHITESPACE.replace_all(&normalized, " ");
    let normalized = normalized.trim();

    let url = extract_url(normalized).ok_or(LoadTestError::CurlWithoutUrl)?;

    let method = if let Some(c) = METHOD.captures(normalized) {
        c[1].to_uppercase()
    } else if normalized.contains("--data") || normalized.contains("-d ") {
        "POST".to_string()
    } else {
        "GET".to_string()
    };

    let mut headers = BTreeMap::new();
    for c in HEADER.captures_iter(normalized) {
        if let Some((name, value)) = c[1].split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                headers.insert(name.to_string(), value.trim().to_string());
            }
        }
    }

    let body = [&*DATA_SINGLE, &*DATA_DOUBLE, &*DATA_BRACES]
        .iter()
        .find_map(|re| re.captures(normalized).map(|c| c[1].to_string()))
        .unwrap_or_default();

    Ok(CurlRequest {
        url,
        method,
        headers,
        body,
    })
}

/// URL following `curl`, or the first http(s) token when flags come first
fn extract_url(normalized: &str) -> Option<String> {
    if let Some(c) = QUOTED_URL.captures(normalized) {
        return Some(c[1].to_string());
    }

    let bare = BARE_URL.captures(normalized).map(|c| c[1].to_string())?;
    if !bare.starts_with('-') {
        return Some(bare);
    }

    normalized
        .split(' ')
        .map(|token| token.trim_matches(|c| c == '\'' || c == '"'))
        .find(|token| token.starts_with("http://") || token.starts_with("https://"))
        .map(str::to_string)
}

/// Render a request as a curl command line, for logging
pub fn build_curl_command<'a, I>(method: &str, url: &str, headers: I, body: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut parts = vec![
        "curl".to_string(),
        format!("'{}'", url),
        format!("-X {}", method),
    ];
    for (name, value) in headers {
        parts.push(format!("-H '{}: {}'", name, value));
    }
    if !body.is_empty() {
        parts.push(format!("-d '{}'", body));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_curl_commands() {
        assert!(is_curl_command("curl https://x"));
        assert!(is_curl_command("  curl\t'https://x'"));
        assert!(!is_curl_command("curly https://x"));
        assert!(!is_curl_command("https://x/curl"));
        assert!(!is_curl_command("curl"));
    }

    #[test]
    fn test_parses_multiline_post() {
        let command = "curl --location 'https://api.example.com/orders?x=1' \\\n  \
                       --header 'Content-Type: application/json' \\\n  \
                       -H \"Authorization: Bearer abc:def\" \\\n  \
                       --data-raw '{\"sku\": \"A1\", \"qty\": 2}'";
        let parsed = parse_curl(command).unwrap();

        assert_eq!(parsed.url, "https://api.example.com/orders?x=1");
        assert_eq!(parsed.method, "POST");
        assert_eq!(parsed.headers["Content-Type"], "application/json");
        assert_eq!(parsed.headers["Authorization"], "Bearer abc:def");
        assert_eq!(parsed.body, r#"{"sku": "A1", "qty": 2}"#);
    }

    #[test]
    fn test_explicit_method_and_bare_url() {
        let parsed = parse_curl("curl https://h/p --request PUT -d {\"a\":1}").unwrap();
        assert_eq!(parsed.url, "https://h/p");
        assert_eq!(parsed.method, "PUT");
        assert_eq!(parsed.body, r#"{"a":1}"#);

        let parsed = parse_curl("curl 'https://h/p'").unwrap();
        assert_eq!(parsed.method, "GET");
        assert!(parsed.headers.is_empty());
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn test_flags_before_url() {
        let parsed = parse_curl("curl -X DELETE 'https://h/items/1' -H 'X-Trace: t'").unwrap();
        assert_eq!(parsed.url, "https://h/items/1");
        assert_eq!(parsed.method, "DELETE");
        assert_eq!(parsed.headers["X-Trace"], "t");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_curl(""), Err(LoadTestError::EmptyCurl)));
        assert!(matches!(
            parse_curl("curl -X GET -H 'A: b'"),
            Err(LoadTestError::CurlWithoutUrl)
        ));
    }

    #[test]
    fn test_build_curl_command() {
        assert_eq!(
            build_curl_command("POST", "http://h/p", [("Content-Type", "application/json")], "{}"),
            "curl 'http://h/p' -X POST -H 'Content-Type: application/json' -d '{}'"
        );
    }
}

//! Inbound forwarded requests and the responses produced for them

pub use mocktool_core::compose_path;

/// Header carrying the caller's account id
pub const ACCOUNT_ID_HEADER: &str = "X-Account-Id";

/// Header naming the feature whose scenario applies
pub const FEATURE_NAME_HEADER: &str = "X-Feature-Name";

/// Which forwarding endpoint received the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// Requires both the account and the feature header
    Authenticated,
    /// Requires only the feature header; always resolves the global scenario
    Public,
}

/// A forwarded call with the routing prefix already stripped
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub mode: ForwardMode,
    pub path: String,
    pub raw_query: Option<String>,
    pub method: String,
    pub body: Vec<u8>,
    pub account_id: Option<String>,
    pub feature_name: Option<String>,
}

impl ForwardRequest {
    pub fn new(mode: ForwardMode, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            mode,
            path: path.into(),
            raw_query: None,
            method: method.into(),
            body: Vec::new(),
            account_id: None,
            feature_name: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_feature(mut self, feature_name: impl Into<String>) -> Self {
        self.feature_name = Some(feature_name.into());
        self
    }
}

/// A resolved mock response, ready to be written by the HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    /// Headers in the order they must be applied; later entries replace earlier ones
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Whether the body came from the cache
    pub cached: bool,
}

impl MockResponse {
    /// JSON response with only the default content type
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.into(),
            cached: false,
        }
    }

    /// Value of the last header named `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

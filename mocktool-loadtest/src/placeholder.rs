//! `{{name}}` substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{LoadResult, LoadTestError};
use crate::Scope;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern"));

/// Replace every `{{name}}` with its value from `scope`
///
/// Fails without substituting anything when any referenced name is absent.
/// Substituted values are inserted verbatim and never re-scanned.
pub fn replace_placeholders(input: &str, scope: &Scope) -> LoadResult<String> {
    let missing: Vec<String> = PLACEHOLDER
        .captures_iter(input)
        .map(|c| c[1].to_string())
        .filter(|name| !scope.contains_key(name))
        .collect();

    if !missing.is_empty() {
        return Err(LoadTestError::MissingVariables(missing));
    }

    Ok(PLACEHOLDER
        .replace_all(input, |c: &Captures| scope[&c[1]].clone())
        .into_owned())
}

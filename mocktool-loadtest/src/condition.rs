//! Step guard expressions
//!
//! The grammar is deliberately small: comparison leaves (`==`, `!=`, `>=`,
//! `<=`, `>`, `<`) combined with `&&`, `||` and parentheses. `&&` binds
//! tighter than `||`. Ordering operators compare numerically when both sides
//! parse as numbers and lexically otherwise.

use tracing::warn;

use crate::error::{LoadResult, LoadTestError};
use crate::placeholder::replace_placeholders;
use crate::Scope;

/// Operators in match order; two-character forms must precede their prefixes
const OPERATORS: &[&str] = &["==", "!=", ">=", "<=", ">", "<"];

/// Decide whether a step guarded by `condition` should run
///
/// A blank condition always passes. Placeholders are substituted per leaf, so
/// a leaf referencing a variable missing from the scope is `false` while the
/// other branches still decide. Unbalanced parentheses are an error.
///
/// Grouping is found before quotes are considered, so a parenthesis inside a
/// quoted operand (`{{s}} == "a(b"`) is read as grouping and the expression
/// is rejected as malformed.
pub fn evaluate_condition(condition: &str, scope: &Scope) -> LoadResult<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }

    evaluate_expression(condition.trim(), scope)
}

fn evaluate_expression(expr: &str, scope: &Scope) -> LoadResult<bool> {
    let mut expr = expr.trim().to_string();

    // Collapse the innermost group until none remain
    while let Some(open) = expr.rfind('(') {
        let close = expr[open..]
            .find(')')
            .map(|i| i + open)
            .ok_or(LoadTestError::MalformedExpression)?;

        let inner = evaluate_expression(&expr[open + 1..close], scope)?;
        expr = format!("{}{}{}", &expr[..open], inner, &expr[close + 1..]);
    }

    if expr.contains("||") {
        for part in expr.split("||") {
            if evaluate_expression(part, scope)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    if expr.contains("&&") {
        for part in expr.split("&&") {
            if !evaluate_expression(part, scope)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    Ok(evaluate_leaf(&expr, scope))
}

fn evaluate_leaf(leaf: &str, scope: &Scope) -> bool {
    let leaf = match replace_placeholders(leaf.trim(), scope) {
        Ok(leaf) => leaf,
        Err(e) => {
            warn!(leaf = %leaf.trim(), error = %e, "Condition references missing variables");
            return false;
        }
    };
    let leaf = leaf.as_str();

    for op in OPERATORS {
        if let Some((left, right)) = leaf.split_once(op) {
            return compare(trim_quotes(left.trim()), trim_quotes(right.trim()), op);
        }
    }

    let value = trim_quotes(leaf);
    !value.is_empty() && value != "false" && value != "0"
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

fn compare(left: &str, right: &str, op: &str) -> bool {
    match op {
        "==" => left == right,
        "!=" => left != right,
        _ => {
            let ordering = match (left.parse::<f64>(), right.parse::<f64>()) {
                (Ok(l), Ok(r)) => l.partial_cmp(&r),
                _ => Some(left.cmp(right)),
            };
            let Some(ordering) = ordering else {
                return false;
            };
            match op {
                ">" => ordering.is_gt(),
                "<" => ordering.is_lt(),
                ">=" => ordering.is_ge(),
                "<=" => ordering.is_le(),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(pairs: &[(&str, &str)]) -> Scope {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const PAYMENT: &str = r#"({{need_payment}} == true && {{amount}} > 100) || {{force}} == "yes""#;

    #[test]
    fn test_grouped_expression_short_circuits() {
        let vars = scope(&[("need_payment", "true"), ("amount", "200")]);
        assert!(evaluate_condition(PAYMENT, &vars).unwrap());

        let vars = scope(&[("need_payment", "false"), ("amount", "50"), ("force", "yes")]);
        assert!(evaluate_condition(PAYMENT, &vars).unwrap());
    }

    #[test]
    fn test_missing_variable_is_false() {
        let vars = scope(&[("need_payment", "false"), ("amount", "50")]);
        assert!(!evaluate_condition(PAYMENT, &vars).unwrap());
        assert!(!evaluate_condition("{{force}} == yes", &Scope::new()).unwrap());
        assert!(!evaluate_condition("{{force}}", &Scope::new()).unwrap());
    }

    #[test]
    fn test_substituted_values_do_not_change_structure() {
        let vars = scope(&[("v", "a || b")]);
        assert!(!evaluate_condition("{{v}} == a", &vars).unwrap());
        assert!(evaluate_condition("{{v}}", &vars).unwrap());
    }

    #[test]
    fn test_blank_condition_passes() {
        assert!(evaluate_condition("", &Scope::new()).unwrap());
        assert!(evaluate_condition("   ", &Scope::new()).unwrap());
    }

    #[test]
    fn test_numeric_and_lexical_ordering() {
        let vars = scope(&[("n", "9"), ("s", "apple")]);
        assert!(evaluate_condition("{{n}} < 10", &vars).unwrap());
        assert!(evaluate_condition("{{n}} >= 9.0", &vars).unwrap());
        assert!(!evaluate_condition("{{n}} <= 8.5", &vars).unwrap());
        assert!(evaluate_condition("{{s}} < banana", &vars).unwrap());
        // Equality is textual
        assert!(!evaluate_condition("{{n}} == 9.0", &vars).unwrap());
        assert!(evaluate_condition("{{s}} != 'pear'", &vars).unwrap());
    }

    #[test]
    fn test_bare_values() {
        let vars = scope(&[("t", "true"), ("f", "false"), ("z", "0"), ("e", "")]);
        assert!(evaluate_condition("{{t}}", &vars).unwrap());
        assert!(!evaluate_condition("{{f}}", &vars).unwrap());
        assert!(!evaluate_condition("{{z}}", &vars).unwrap());
        assert!(!evaluate_condition("'{{e}}'", &vars).unwrap());
        assert!(evaluate_condition("yes", &vars).unwrap());
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let vars = Scope::new();
        assert!(evaluate_condition("1 == 1 || 1 == 2 && 2 == 3", &vars).unwrap());
        assert!(!evaluate_condition("(1 == 1 || 1 == 2) && 2 == 3", &vars).unwrap());
        assert!(evaluate_condition("((a == a))", &vars).unwrap());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let err = evaluate_condition("(1 == 1", &Scope::new()).unwrap_err();
        assert!(matches!(err, LoadTestError::MalformedExpression));
        // A stray closing parenthesis is left in the leaf
        assert!(!evaluate_condition("1 == 1)", &Scope::new()).unwrap());
    }

    #[test]
    fn test_parenthesis_in_quoted_operand_is_grouping() {
        let scope = scope(&[("s", "a(b")]);
        let err = evaluate_condition(r#"{{s}} == "a(b""#, &scope).unwrap_err();
        assert!(matches!(err, LoadTestError::MalformedExpression));
    }
}

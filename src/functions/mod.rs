//! Centralized mathematical function registry
//!
//! Single source of truth for the built-in functions: their arity, numeric
//! evaluation, derivative formula and exact special values.

use crate::Expr;
use crate::core::expr::could_extract_minus_sign;

pub(crate) mod definitions;
pub(crate) mod registry;
mod special;

pub(crate) use registry::FunctionDefinition;
use registry::Registry;

/// Alternative spellings accepted by the parser and `Expr::func`
const ALIASES: &[(&str, &str)] = &[
    ("ln", "log"),
    ("Abs", "abs"),
    ("arcsin", "asin"),
    ("arccos", "acos"),
    ("arctan", "atan"),
];

/// Map an alias to the registered name; unknown names pass through
pub(crate) fn canonical_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| *canonical)
}

pub(crate) fn lookup(name: &str) -> Option<&'static FunctionDefinition> {
    Registry::get(canonical_name(name))
}

/// True for every name the parser treats as a built-in function
pub fn is_builtin(name: &str) -> bool {
    name == "sqrt" || lookup(name).is_some()
}

/// Built-in function names, including `sqrt` and aliases
pub fn builtin_names() -> Vec<&'static str> {
    let mut names = Registry::names();
    names.push("sqrt");
    names.extend(ALIASES.iter().map(|(alias, _)| *alias));
    names.sort_unstable();
    names
}

// ===== Helpers for derivative and special-value rules =====

pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, vec![arg])
}

pub(crate) fn mul(a: Expr, b: Expr) -> Expr {
    Expr::product(vec![a, b])
}

pub(crate) fn neg(e: Expr) -> Expr {
    Expr::neg(e)
}

fn unary(args: &[Expr]) -> Option<&Expr> {
    match args {
        [arg] => Some(arg),
        _ => None,
    }
}

/// f(-u) = -f(u)
fn odd_symmetry(name: &str, arg: &Expr) -> Option<Expr> {
    could_extract_minus_sign(arg).then(|| neg(func(name, neg(arg.clone()))))
}

/// f(-u) = f(u)
fn even_symmetry(name: &str, arg: &Expr) -> Option<Expr> {
    could_extract_minus_sign(arg).then(|| func(name, neg(arg.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(canonical_name("ln"), "log");
        assert_eq!(canonical_name("foo"), "foo");
        assert!(is_builtin("sqrt"));
        assert!(is_builtin("arctan"));
        assert!(!is_builtin("f"));
    }

    #[test]
    fn test_builtin_names_sorted() {
        let names = builtin_names();
        assert!(names.contains(&"sin"));
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}

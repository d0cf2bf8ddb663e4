//! Parser module - converts strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::{CalcError, Expr, Symbol};

/// Parse a formula string into an expression AST
///
/// Accepts `+ - * /`, `**` or `^` for powers, parentheses, the constants
/// `pi`, `E` and `oo`, and function calls. Names that are not built-in
/// functions become symbols; unknown function names stay as undefined
/// functions.
///
/// # Example
/// ```
/// use symb_calculus::parse;
///
/// let expr = parse("x**2 + sin(x)").unwrap();
/// assert_eq!(expr.to_string(), "x^2 + sin(x)");
/// ```
///
/// # Errors
/// Returns `CalcError` if:
/// - The input is empty
/// - The input contains invalid syntax or characters
/// - Parentheses are unbalanced
/// - A number is immediately followed by a name (`2x`)
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    // Pipeline: validate -> balance -> lex -> parse
    if input.trim().is_empty() {
        return Err(CalcError::EmptyFormula);
    }
    lexer::check_parentheses(input)?;
    let tokens = lexer::lex(input)?;
    pratt::parse_expression(&tokens)
}

/// Parse a single variable name
pub fn parse_symbol(input: &str) -> Result<Symbol, CalcError> {
    Symbol::parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("   "), Err(CalcError::EmptyFormula));
    }

    #[test]
    fn test_unbalanced() {
        assert!(matches!(
            parse("sin(x"),
            Err(CalcError::UnbalancedParentheses { .. })
        ));
    }

    #[test]
    fn test_round_trip_display() {
        let e = parse("sin(x)**2 + x**2").unwrap();
        assert_eq!(e.to_string(), "x^2 + sin(x)^2");
        assert_eq!(parse(&e.to_string()).unwrap(), e);
    }
}

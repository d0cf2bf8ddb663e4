use crate::core::Expr;
use crate::error::{CalcError, Span};
use crate::functions;
use crate::parser::tokens::{Token, TokenKind, UNARY_PRECEDENCE};
use crate::symbol::Symbol;

/// Deepest parenthesis/operator nesting accepted before bailing out
const MAX_NESTING: usize = 200;

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr(0)?;

    // Leftover tokens mean two operands without an operator, e.g. `(x)(y)`
    if let Some(token) = parser.current() {
        return Err(CalcError::UnexpectedToken {
            expected: "an operator or end of input".to_string(),
            got: token.kind.describe(),
            span: Some(token.span),
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, expected: &str) -> CalcError {
        match self.current() {
            Some(token) => CalcError::UnexpectedToken {
                expected: expected.to_string(),
                got: token.kind.describe(),
                span: Some(token.span),
            },
            None => CalcError::UnexpectedEndOfInput,
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, CalcError> {
        if self.depth >= MAX_NESTING {
            let span = self.current().map(|t| t.span);
            return Err(CalcError::InvalidSyntax {
                msg: format!("expression nested deeper than {MAX_NESTING} levels"),
                span,
            });
        }
        self.depth += 1;
        let result = self.parse_operators(min_precedence);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, min_precedence: u8) -> Result<Expr, CalcError> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(token) = self.current() {
            let Some(precedence) = token.kind.precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let next_min = if token.kind.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expr(next_min)?;

            left = match token.kind {
                TokenKind::Plus => Expr::sum(vec![left, right]),
                TokenKind::Minus => Expr::sub(left, right),
                TokenKind::Star => Expr::product(vec![left, right]),
                TokenKind::Slash => Expr::div(left, right),
                TokenKind::Power => Expr::pow(left, right),
                _ => return Err(self.unexpected("an operator")),
            };
        }

        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, CalcError> {
        let mut args = Vec::new();

        if matches!(self.current().map(|t| &t.kind), Some(TokenKind::RightParen)) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current().map(|t| &t.kind) {
                Some(TokenKind::Comma) => self.advance(),
                Some(TokenKind::RightParen) => break,
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, CalcError> {
        let token = self.current().ok_or(CalcError::UnexpectedEndOfInput)?;

        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::number(n.clone()))
            }

            TokenKind::Identifier(name) => {
                self.advance();

                if matches!(self.current().map(|t| &t.kind), Some(TokenKind::LeftParen)) {
                    self.advance();
                    let args = self.parse_arguments()?;
                    if matches!(self.current().map(|t| &t.kind), Some(TokenKind::RightParen)) {
                        self.advance();
                    } else {
                        return Err(self.unexpected("')'"));
                    }
                    return function_call(name, args, token.span);
                }

                identifier(name, token.span)
            }

            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(Expr::neg(operand))
            }

            TokenKind::Plus => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                if matches!(self.current().map(|t| &t.kind), Some(TokenKind::RightParen)) {
                    self.advance();
                    Ok(expr)
                } else {
                    Err(self.unexpected("')'"))
                }
            }

            _ => Err(self.unexpected("an expression")),
        }
    }
}

fn identifier(name: &str, span: Span) -> Result<Expr, CalcError> {
    match name {
        "pi" => Ok(Expr::pi()),
        "E" => Ok(Expr::e()),
        "oo" => Ok(Expr::infinity()),
        "zoo" => Ok(Expr::zoo()),
        "nan" => Ok(Expr::nan()),
        _ if functions::is_builtin(name) => Err(CalcError::invalid_syntax_at(
            format!("function '{name}' needs parenthesized arguments"),
            span,
        )),
        _ => Ok(Symbol::new_unchecked(name).to_expr()),
    }
}

fn function_call(name: &str, args: Vec<Expr>, span: Span) -> Result<Expr, CalcError> {
    if args.is_empty() {
        return Err(CalcError::invalid_syntax_at(
            format!("function '{name}' called without arguments"),
            span,
        ));
    }
    let builtin_arity_ok = match functions::lookup(name) {
        Some(def) => def.accepts(args.len()),
        None => name != "sqrt" || args.len() == 1,
    };
    if !builtin_arity_ok {
        return Err(CalcError::invalid_syntax_at(
            format!(
                "function '{name}' does not take {} argument{}",
                args.len(),
                if args.len() == 1 { "" } else { "s" }
            ),
            span,
        ));
    }
    // Unknown names are kept as undefined functions
    Ok(Expr::func(name, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::lex;

    fn parse(input: &str) -> Result<Expr, CalcError> {
        parse_expression(&lex(input)?)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("1 + 2*3").unwrap(), Expr::integer(7));
        assert_eq!(parse("2**3**2").unwrap(), Expr::integer(512));
        assert_eq!(parse("-2**2").unwrap(), Expr::integer(-4));
        assert_eq!(parse("2^-1").unwrap(), Expr::rational(1, 2));
    }

    #[test]
    fn test_function_calls() {
        let e = parse("sin(x)").unwrap();
        assert!(e.is_function("sin"));
        let f = parse("f(x, y)").unwrap();
        assert!(f.is_function("f"));
        assert!(parse("sin(x, y)").is_err());
        assert!(parse("sin").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(100)).is_ok());
        assert!(matches!(
            parse(&nested(5000)),
            Err(CalcError::InvalidSyntax { .. })
        ));
        assert!(parse(&"-".repeat(5000)).is_err());
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(parse("x +"), Err(CalcError::UnexpectedEndOfInput));
        assert!(matches!(
            parse("(x)(y)"),
            Err(CalcError::UnexpectedToken { .. })
        ));
    }
}

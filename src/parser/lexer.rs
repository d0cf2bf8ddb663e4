use num_bigint::BigInt;
use num_rational::BigRational;

use crate::core::Number;
use crate::error::{CalcError, Span};
use crate::parser::tokens::{Token, TokenKind};

/// Reject unbalanced parentheses, pointing at the offending one
pub(crate) fn check_parentheses(input: &str) -> Result<(), CalcError> {
    let mut open: Vec<usize> = Vec::new();
    for (pos, c) in input.char_indices() {
        match c {
            '(' => open.push(pos),
            ')' => {
                if open.pop().is_none() {
                    return Err(CalcError::UnbalancedParentheses {
                        span: Span::at(pos),
                    });
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(&pos) => Err(CalcError::UnbalancedParentheses {
            span: Span::at(pos),
        }),
        None => Ok(()),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize a formula. Numbers directly followed by a name (`2x`) are rejected
/// since multiplication must be written out.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::with_capacity(chars.len() / 2 + 1);
    let mut i = 0;

    let byte_at = |idx: usize| chars.get(idx).map_or(input.len(), |(b, _)| *b);

    while let Some(&(start, c)) = chars.get(i) {
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = |kind: TokenKind| Token {
            kind,
            span: Span::new(start, start + c.len_utf8()),
        };

        match c {
            '0'..='9' | '.' => {
                let (token, next) = lex_number(input, &chars, i)?;
                if let Some(&(_, follow)) = chars.get(next)
                    && is_ident_start(follow)
                {
                    let mut end = next;
                    while chars.get(end).is_some_and(|(_, ch)| is_ident_char(*ch)) {
                        end += 1;
                    }
                    let number_text = &input[start..byte_at(next)];
                    let name_text = &input[byte_at(next)..byte_at(end)];
                    return Err(CalcError::ImplicitMultiplication {
                        sequence: format!("{number_text}{name_text}"),
                        suggestion: format!("{number_text}*{name_text}"),
                        span: Span::new(start, byte_at(end)),
                    });
                }
                tokens.push(token);
                i = next;
            }
            c if is_ident_start(c) => {
                let mut end = i;
                while chars.get(end).is_some_and(|(_, ch)| is_ident_char(*ch)) {
                    end += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Identifier(input[start..byte_at(end)].to_string()),
                    span: Span::new(start, byte_at(end)),
                });
                i = end;
            }
            '*' if chars.get(i + 1).is_some_and(|(_, n)| *n == '*') => {
                tokens.push(Token {
                    kind: TokenKind::Power,
                    span: Span::new(start, start + 2),
                });
                i += 2;
            }
            '*' => {
                tokens.push(single(TokenKind::Star));
                i += 1;
            }
            '^' => {
                tokens.push(single(TokenKind::Power));
                i += 1;
            }
            '+' => {
                tokens.push(single(TokenKind::Plus));
                i += 1;
            }
            '-' => {
                tokens.push(single(TokenKind::Minus));
                i += 1;
            }
            '/' => {
                tokens.push(single(TokenKind::Slash));
                i += 1;
            }
            '(' => {
                tokens.push(single(TokenKind::LeftParen));
                i += 1;
            }
            ')' => {
                tokens.push(single(TokenKind::RightParen));
                i += 1;
            }
            ',' => {
                tokens.push(single(TokenKind::Comma));
                i += 1;
            }
            other => {
                return Err(CalcError::invalid_token_at(
                    other.to_string(),
                    Span::new(start, start + other.len_utf8()),
                ));
            }
        }
    }
    Ok(tokens)
}

/// Integer literals become exact rationals, anything with a point or exponent a float
fn lex_number(
    input: &str,
    chars: &[(usize, char)],
    begin: usize,
) -> Result<(Token, usize), CalcError> {
    let digit_at = |idx: usize| chars.get(idx).is_some_and(|(_, c)| c.is_ascii_digit());
    let mut i = begin;
    let mut is_float = false;

    while digit_at(i) {
        i += 1;
    }
    if chars.get(i).is_some_and(|(_, c)| *c == '.') {
        is_float = true;
        i += 1;
        while digit_at(i) {
            i += 1;
        }
    }
    // Exponent only when digits follow, so `2e` stays an implicit product error
    if chars.get(i).is_some_and(|(_, c)| *c == 'e' || *c == 'E') {
        let sign = chars.get(i + 1).is_some_and(|(_, c)| *c == '+' || *c == '-');
        let digits_from = if sign { i + 2 } else { i + 1 };
        if digit_at(digits_from) {
            is_float = true;
            i = digits_from;
            while digit_at(i) {
                i += 1;
            }
        }
    }

    let start = chars[begin].0;
    let end = chars.get(i).map_or(input.len(), |(b, _)| *b);
    let text = &input[start..end];
    let span = Span::new(start, end);
    let invalid = || CalcError::InvalidNumber {
        value: text.to_string(),
        span: Some(span),
    };

    let number = if is_float {
        let value: f64 = text.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Number::Float(value)
    } else {
        let value: BigInt = text.parse().map_err(|_| invalid())?;
        Number::Rational(BigRational::from_integer(value))
    };
    Ok((
        Token {
            kind: TokenKind::Number(number),
            span,
        },
        i,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("x**2 ^ 3"),
            vec![
                TokenKind::Identifier("x".to_string()),
                TokenKind::Power,
                TokenKind::Number(Number::int(2)),
                TokenKind::Power,
                TokenKind::Number(Number::int(3)),
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(kinds("2.5"), vec![TokenKind::Number(Number::Float(2.5))]);
        assert_eq!(kinds("1e3"), vec![TokenKind::Number(Number::Float(1000.0))]);
        assert!(matches!(
            lex("."),
            Err(CalcError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_implicit_multiplication_rejected() {
        let err = lex("2x + 1").unwrap_err();
        assert_eq!(
            err,
            CalcError::ImplicitMultiplication {
                sequence: "2x".to_string(),
                suggestion: "2*x".to_string(),
                span: Span::new(0, 2),
            }
        );
    }

    #[test]
    fn test_invalid_character() {
        let err = lex("x $ 1").unwrap_err();
        assert_eq!(err, CalcError::invalid_token_at("$", Span::at(2)));
    }

    #[test]
    fn test_parentheses_balance() {
        assert!(check_parentheses("(x + (y))").is_ok());
        assert_eq!(
            check_parentheses("(x + 1"),
            Err(CalcError::UnbalancedParentheses { span: Span::at(0) })
        );
        assert_eq!(
            check_parentheses("x)"),
            Err(CalcError::UnbalancedParentheses { span: Span::at(1) })
        );
    }
}

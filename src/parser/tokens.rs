use crate::core::Number;
use crate::error::Span;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(Number),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `**` or `^`
    Power,
    LeftParen,
    RightParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl TokenKind {
    /// Binding power of binary operators
    pub(crate) fn precedence(&self) -> Option<u8> {
        match self {
            TokenKind::Plus | TokenKind::Minus => Some(10),
            TokenKind::Star | TokenKind::Slash => Some(20),
            TokenKind::Power => Some(30),
            _ => None,
        }
    }

    pub(crate) fn is_right_associative(&self) -> bool {
        matches!(self, TokenKind::Power)
    }

    /// Source-like text for error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Power => "'**'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

/// Precedence of unary minus: binds tighter than `*`, looser than `**`
pub(crate) const UNARY_PRECEDENCE: u8 = 25;

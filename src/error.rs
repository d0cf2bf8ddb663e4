use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of bytes in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map(|s| s.display()).unwrap_or_default()
}

/// Errors raised while parsing, computing or configuring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    // Input validation errors
    #[error("empty formula")]
    EmptyFormula,

    #[error("invalid syntax: {msg}{}", span_suffix(.span))]
    InvalidSyntax { msg: String, span: Option<Span> },

    // Parsing errors
    #[error("invalid number '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },

    #[error("invalid token '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },

    #[error("expected {expected}, got {got}{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("unbalanced parentheses{}", .span.display())]
    UnbalancedParentheses { span: Span },

    #[error("ambiguous sequence '{sequence}'{}: multiplication must be explicit, write '{suggestion}'", .span.display())]
    ImplicitMultiplication {
        sequence: String,
        suggestion: String,
        span: Span,
    },

    #[error("invalid variable name '{name}': {reason}")]
    InvalidSymbolName { name: String, reason: String },

    // Operation arguments
    #[error("invalid {operation} order {order}: order must be at least 1")]
    InvalidOrder { operation: &'static str, order: u32 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("definite integration needs both bounds, only the {given} bound was supplied")]
    MissingBound { given: &'static str },

    #[error("{point} depends on the variable {var}")]
    PointDependsOnVariable { point: String, var: String },

    // Mathematical failures
    #[error("unbound symbols after substitution: {}", .names.join(", "))]
    UnboundSymbols { names: Vec<String> },

    #[error("{expr} is not a finite real number")]
    NotNumeric { expr: String },

    #[error("no closed form found for the integral of {expr} with respect to {var}")]
    NoClosedForm { expr: String, var: String },

    #[error(
        "the limit does not exist since the left hand limit = {left} and the right hand limit = {right}"
    )]
    LimitDoesNotExist { left: String, right: String },

    #[error("could not determine the limit: {reason}")]
    LimitUndetermined { reason: String },

    #[error("could not expand {expr} in a series: {reason}")]
    SeriesUnavailable { expr: String, reason: String },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    // Safety limits
    #[error("maximum expression depth exceeded")]
    MaxDepthExceeded,

    #[error("maximum expression node count exceeded")]
    MaxNodesExceeded,

    // Configuration
    #[error("configuration error in {path}: {msg}")]
    Config { path: String, msg: String },

    // Output
    #[error("cannot serialize {what}: {msg}")]
    Serialization { what: &'static str, msg: String },
}

impl CalcError {
    /// Create InvalidSyntax without span
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        CalcError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    pub(crate) fn undetermined(reason: impl Into<String>) -> Self {
        CalcError::LimitUndetermined {
            reason: reason.into(),
        }
    }

    /// True for errors produced while turning text into an expression
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CalcError::EmptyFormula
                | CalcError::InvalidSyntax { .. }
                | CalcError::InvalidNumber { .. }
                | CalcError::InvalidToken { .. }
                | CalcError::UnexpectedToken { .. }
                | CalcError::UnexpectedEndOfInput
                | CalcError::UnbalancedParentheses { .. }
                | CalcError::ImplicitMultiplication { .. }
                | CalcError::InvalidSymbolName { .. }
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::at(0).display(), " at position 1");
        assert_eq!(Span::new(2, 5).display(), " at positions 3-5");
        assert_eq!(Span::default().display(), "");
    }

    #[test]
    fn test_error_messages() {
        let err = CalcError::UnbalancedParentheses { span: Span::at(3) };
        assert_eq!(err.to_string(), "unbalanced parentheses at position 4");

        let err = CalcError::UnboundSymbols {
            names: vec!["y".to_string(), "z".to_string()],
        };
        assert_eq!(err.to_string(), "unbound symbols after substitution: y, z");

        let err = CalcError::MissingBound { given: "lower" };
        assert!(err.to_string().contains("only the lower bound"));

        let err = CalcError::Serialization {
            what: "page",
            msg: "key must be a string".to_string(),
        };
        assert_eq!(err.to_string(), "cannot serialize page: key must be a string");
    }

    #[test]
    fn test_parse_error_classification() {
        assert!(CalcError::EmptyFormula.is_parse_error());
        assert!(!CalcError::MaxDepthExceeded.is_parse_error());
    }
}

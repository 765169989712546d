use super::locations::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("invalid token: {remainder} at {span}")]
    InvalidToken { remainder: String, span: Span },
    #[error("invalid token: {lexeme} at {span} (separate the operator from the number with a space)")]
    AmbiguousAdjacentToken { lexeme: String, span: Span },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression, you should input an expression")]
    EmptyExpression,
    #[error("unexpected token '{found}' at {span}")]
    UnexpectedToken { found: String, span: Span },
    #[error("left parenthesis should be followed by an operator or a name, found '{found}' at {span}")]
    InvalidHead { found: String, span: Span },
    #[error("'{first}' shouldn't be followed by operator '{second}' at {span}")]
    DoubledOperator {
        first: String,
        second: String,
        span: Span,
    },
    #[error("'{operator}' needs at least one operand at {span}")]
    MissingOperand { operator: String, span: Span },
    #[error("missing right parenthesis for expression starting at {span}")]
    UnterminatedExpression { span: Span },
    #[error("expression nested deeper than {limit} levels at {span}")]
    NestingTooDeep { limit: usize, span: Span },
    #[error("there shouldn't be anything after the closing parenthesis, found '{found}' at {span}")]
    TrailingTokens { found: String, span: Span },
}

use super::locations::Span;
use super::tokenizer::Token;

#[derive(Clone)]
pub struct Name {
    name: String,
    pub(crate) span: Span,
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

impl From<Token> for Name {
    fn from(value: Token) -> Self {
        Self {
            name: value.lexeme,
            span: value.span,
        }
    }
}

/// A parsed expression. `Operation` covers both built-in forms and procedure
/// calls; which one it is gets decided when it is evaluated.
#[derive(Debug, Clone)]
pub enum Expression {
    Number(f64, Span),
    Boolean(bool, Span),
    Name(Name),
    Operation(Name, Vec<Expression>, Span),
}

impl Expression {
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Canonical prefix rendering, every item followed by a single space.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value, _) => write!(f, "{value:.2} "),
            Self::Boolean(value, _) => write!(f, "{value} "),
            Self::Name(name) => write!(f, "{} ", name.as_str()),
            Self::Operation(head, operands, _) => {
                write!(f, "{} ", head.as_str())?;
                for operand in operands {
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
        }
    }
}

/// The built-in forms. Any other head of an `Operation` names a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Not,
    Equal,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    If,
    Define,
}

impl Operator {
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Times,
            "/" => Self::Divide,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "=" => Self::Equal,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanEqual,
            "if" => Self::If,
            "define" => Self::Define,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Equal => "=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::If => "if",
            Self::Define => "define",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

use super::ast::{Expression, Name};
use super::tokenizer::Token;

/// Byte offset into the source line.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub(crate) column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {}", self.column)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum Span {
    #[default]
    Indetermined,
    Determined(_Span),
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct _Span {
    pub(crate) start: Location,
    pub(crate) end: Location,
}

impl Span {
    pub(crate) fn new(start_col: usize, end_col: usize) -> Self {
        Self::Determined(_Span {
            start: Location { column: start_col },
            end: Location { column: end_col },
        })
    }

    pub(crate) fn till<R: Locatable + ?Sized>(&self, other: &R) -> Self {
        match (self, other.span()) {
            (Self::Indetermined, Self::Indetermined) => Self::Indetermined,
            (Self::Indetermined, Self::Determined(t)) => Self::Determined(t),
            (Self::Determined(s), Self::Indetermined) => Self::Determined(*s),
            (Self::Determined(s), Self::Determined(t)) => Self::Determined(_Span {
                start: s.start,
                end: t.end,
            }),
        }
    }

    pub fn start(&self) -> Option<Location> {
        match self {
            Self::Indetermined => None,
            Self::Determined(s) => Some(s.start),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indetermined => write!(f, "unknown location"),
            Self::Determined(s) if s.end.column > s.start.column + 1 => {
                write!(f, "{} till {}", s.start, s.end)
            }
            Self::Determined(s) => write!(f, "{}", s.start),
        }
    }
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Name {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Number(_, s) => *s,
            Self::Boolean(_, s) => *s,
            Self::Name(name) => name.span(),
            Self::Operation(_, _, s) => *s,
        }
    }
}

impl<R> Locatable for [R]
where
    R: Locatable,
{
    fn span(&self) -> Span {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.span().till(last),
            _ => Span::Indetermined,
        }
    }
}

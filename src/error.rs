use crate::interpreter::EvalError;
use crate::parser::{LexError, ParseError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("error in tokenizer phase: {0}")]
    Lex(#[from] LexError),
    #[error("error in parser phase: {0}")]
    Parse(#[from] ParseError),
    #[error("error in evaluation phase: {0}")]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Eval(err) if err.is_fatal())
    }
}

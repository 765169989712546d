mod parser;
pub use parser::tokenizer;
pub use parser::{
    next_token, parse, tokenize, Expression, LexError, Locatable, Location, Name, Operator,
    ParseError, Span, Token, TokenType, MAX_NESTING,
};

mod interpreter;
pub use interpreter::{
    evaluate, ArgumentErrors, Binding, Config, Environment, EvalError, EvalResult, Frame,
    Procedure, ResultKind, Value,
};

mod error;
pub use error::Error;

/// Run one line of source through the whole pipeline against `env`.
pub fn run_line(line: &str, env: &mut Environment) -> Result<Value, Error> {
    let tokens = tokenize(line)?;
    let expression = parse(&tokens)?;
    Ok(evaluate(&expression, env)?)
}

// Grammar of a single input line:
//
// line: expr ENDMARKER
// expr: atom | form
// atom: NUMBER | TRUE | FALSE | NAME
// form: '(' (OPERATOR | NAME) expr* ')'
//
// OPERATOR stands for any of the arithmetic, logic and comparison symbols as
// well as the keywords 'if' and 'define'. Tokens are pulled one at a time and
// every rule fails on the first token it cannot accept. Forms may nest at most
// MAX_NESTING levels deep.

use super::ast::*;
use super::error::ParseError;
use super::tokenizer::{Token, TokenType as TT};

pub const MAX_NESTING: usize = 200;

pub fn parse(tokens: &[Token]) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(tokens);
    let expr = parser.line()?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    // line: expr ENDMARKER
    fn line(&mut self) -> Result<Expression, ParseError> {
        if self.peek().is_none() {
            return Err(ParseError::EmptyExpression);
        }
        let expr = self.expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(ParseError::TrailingTokens {
                found: token.lexeme.clone(),
                span: token.span.till(self.tokens),
            }),
        }
    }

    // expr: atom | form
    fn expr(&mut self) -> Result<Expression, ParseError> {
        match self.peek() {
            Some(token) if token.typ == TT::LPAR => {
                if self.nesting >= MAX_NESTING {
                    return Err(ParseError::NestingTooDeep {
                        limit: MAX_NESTING,
                        span: token.span,
                    });
                }
                self.nesting += 1;
                let form = self.form();
                self.nesting -= 1;
                form
            }
            _ => self.atom(),
        }
    }

    // atom: NUMBER | TRUE | FALSE | NAME
    fn atom(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::EmptyExpression);
        };
        match token.typ {
            TT::NUMBER => Ok(Expression::Number(token.number, token.span)),
            TT::TRUE => Ok(Expression::Boolean(true, token.span)),
            TT::FALSE => Ok(Expression::Boolean(false, token.span)),
            TT::NAME => Ok(Expression::Name(Name::from(token.clone()))),
            _ => Err(ParseError::UnexpectedToken {
                found: token.lexeme.clone(),
                span: token.span,
            }),
        }
    }

    // form: '(' (OPERATOR | NAME) expr* ')'
    fn form(&mut self) -> Result<Expression, ParseError> {
        let open = match self.advance() {
            Some(token) if token.typ == TT::LPAR => token,
            Some(token) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.lexeme.clone(),
                    span: token.span,
                })
            }
            None => return Err(ParseError::EmptyExpression),
        };
        let tokens = self.tokens;
        let unterminated = || ParseError::UnterminatedExpression {
            span: open.span.till(tokens),
        };

        let head = match self.advance() {
            Some(token) if token.typ.is_operator() || token.typ == TT::NAME => token,
            Some(token) => {
                return Err(ParseError::InvalidHead {
                    found: token.lexeme.clone(),
                    span: token.span,
                })
            }
            None => return Err(unterminated()),
        };

        match self.peek() {
            Some(next) if next.typ.is_operator() => {
                return Err(ParseError::DoubledOperator {
                    first: head.lexeme.clone(),
                    second: next.lexeme.clone(),
                    span: head.span.till(next),
                })
            }
            Some(next) if next.typ == TT::RPAR && matches!(head.typ, TT::MINUS | TT::SLASH) => {
                return Err(ParseError::MissingOperand {
                    operator: head.lexeme.clone(),
                    span: open.span.till(next),
                })
            }
            _ => {}
        }

        let mut operands = vec![];
        loop {
            match self.peek() {
                None => return Err(unterminated()),
                Some(token) if token.typ == TT::RPAR => {
                    self.advance();
                    let span = open.span.till(token);
                    return Ok(Expression::Operation(Name::from(head.clone()), operands, span));
                }
                Some(_) => operands.push(self.expr()?),
            }
        }
    }
}

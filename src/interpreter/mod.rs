mod environment;
mod value;

pub use environment::{ArgumentErrors, Config, Environment, Frame};
pub use value::{Binding, Procedure, ResultKind, Value};

use crate::parser::{Expression, Locatable, Name, Operator, Span};
use log::{debug, trace};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{name}: undefined at {span}")]
    UndefinedIdentifier { name: String, span: Span },
    #[error("operand for {operator} should be {expected} at {span}")]
    TypeMismatch {
        operator: Operator,
        expected: &'static str,
        span: Span,
    },
    #[error("{name}: arity mismatch, expected {expected} operand(s) but got {found} at {span}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("divide by zero error at {span}")]
    DivideByZero { span: Span },
    #[error("application: {name} is not a procedure at {span}")]
    NotAProcedure { name: String, span: Span },
    #[error("malformed define: {reason} at {span}")]
    MalformedDefine { reason: &'static str, span: Span },
    #[error("if statement should have three expressions, got {found} at {span}")]
    MalformedIf { found: usize, span: Span },
    #[error("call stack exhausted at depth {depth}")]
    StackExhausted { depth: usize },
    #[error("evaluation nested too deeply at depth {depth}")]
    NestingTooDeep { depth: usize },
}

impl EvalError {
    /// Fatal errors end the session instead of just the current line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StackExhausted { .. } | Self::NestingTooDeep { .. })
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

pub fn evaluate(expression: &Expression, env: &mut Environment) -> EvalResult<Value> {
    if env.nesting() >= env.config().max_eval_depth {
        return Err(EvalError::NestingTooDeep {
            depth: env.nesting(),
        });
    }
    env.nested(|env| evaluate_expression(expression, env))
}

fn evaluate_expression(expression: &Expression, env: &mut Environment) -> EvalResult<Value> {
    trace!("evaluating {expression}at depth {}", env.depth());
    match expression {
        Expression::Number(n, _) => Ok(Value::Number(*n)),
        Expression::Boolean(b, _) => Ok(Value::Boolean(*b)),
        Expression::Name(name) => match env.lookup(name.as_str()) {
            Some(binding) => Ok(binding.resolve(name.as_str())),
            None => Err(EvalError::UndefinedIdentifier {
                name: name.as_str().to_string(),
                span: name.span(),
            }),
        },
        Expression::Operation(head, operands, span) => match Operator::from_name(head.as_str()) {
            Some(op) => evaluate_operator(op, operands, *span, env),
            None => apply(head, operands, *span, env),
        },
    }
}

fn evaluate_operator(
    op: Operator,
    operands: &[Expression],
    span: Span,
    env: &mut Environment,
) -> EvalResult<Value> {
    match op {
        Operator::Plus => {
            let mut sum = 0.0;
            for operand in operands {
                sum += number(op, operand, env)?;
            }
            Ok(Value::Number(sum))
        }
        Operator::Times => {
            let mut product = 1.0;
            for operand in operands {
                product *= number(op, operand, env)?;
            }
            Ok(Value::Number(product))
        }
        Operator::Minus => subtract(operands, env).map(Value::Number),
        Operator::Divide => divide(operands, env).map(Value::Number),
        Operator::And => {
            for operand in operands {
                if !truth(op, operand, env)? {
                    return Ok(Value::Boolean(false));
                }
            }
            Ok(Value::Boolean(true))
        }
        Operator::Or => {
            for operand in operands {
                if truth(op, operand, env)? {
                    return Ok(Value::Boolean(true));
                }
            }
            Ok(Value::Boolean(false))
        }
        Operator::Not => match operands {
            [operand] => Ok(Value::Boolean(!truth(op, operand, env)?)),
            _ => Err(arity_mismatch(op.symbol(), 1, operands.len(), span)),
        },
        Operator::Equal => compare(op, operands, span, env, |a, b| a == b),
        Operator::GreaterThan => compare(op, operands, span, env, |a, b| a > b),
        Operator::GreaterThanEqual => compare(op, operands, span, env, |a, b| a >= b),
        Operator::LessThan => compare(op, operands, span, env, |a, b| a < b),
        Operator::LessThanEqual => compare(op, operands, span, env, |a, b| a <= b),
        Operator::If => conditional(operands, span, env),
        Operator::Define => define(operands, span, env),
    }
}

fn number(op: Operator, operand: &Expression, env: &mut Environment) -> EvalResult<f64> {
    evaluate(operand, env)?
        .as_number()
        .ok_or_else(|| EvalError::TypeMismatch {
            operator: op,
            expected: "number",
            span: operand.span(),
        })
}

fn truth(op: Operator, operand: &Expression, env: &mut Environment) -> EvalResult<bool> {
    evaluate(operand, env)?
        .truthiness()
        .ok_or_else(|| EvalError::TypeMismatch {
            operator: op,
            expected: "boolean or number",
            span: operand.span(),
        })
}

fn arity_mismatch(name: &str, expected: usize, found: usize, span: Span) -> EvalError {
    EvalError::ArityMismatch {
        name: name.to_string(),
        expected,
        found,
        span,
    }
}

// (- x) negates, (- x y ...) subtracts from the first operand.
fn subtract(operands: &[Expression], env: &mut Environment) -> EvalResult<f64> {
    let Some((first, rest)) = operands.split_first() else {
        return Ok(0.0);
    };
    let mut difference = number(Operator::Minus, first, env)?;
    if rest.is_empty() {
        return Ok(-difference);
    }
    for operand in rest {
        difference -= number(Operator::Minus, operand, env)?;
    }
    Ok(difference)
}

// (/ x) inverts, (/ x y ...) divides the first operand.
fn divide(operands: &[Expression], env: &mut Environment) -> EvalResult<f64> {
    let Some((first, rest)) = operands.split_first() else {
        return Ok(0.0);
    };
    let mut quotient = number(Operator::Divide, first, env)?;
    if rest.is_empty() {
        if quotient == 0.0 {
            return Err(EvalError::DivideByZero { span: first.span() });
        }
        return Ok(1.0 / quotient);
    }
    for operand in rest {
        let divisor = number(Operator::Divide, operand, env)?;
        if divisor == 0.0 {
            return Err(EvalError::DivideByZero {
                span: operand.span(),
            });
        }
        quotient /= divisor;
    }
    Ok(quotient)
}

fn compare(
    op: Operator,
    operands: &[Expression],
    span: Span,
    env: &mut Environment,
    holds: impl Fn(f64, f64) -> bool,
) -> EvalResult<Value> {
    let [lhs, rhs] = operands else {
        return Err(arity_mismatch(op.symbol(), 2, operands.len(), span));
    };
    let lhs = number(op, lhs, env)?;
    let rhs = number(op, rhs, env)?;
    Ok(Value::Boolean(holds(lhs, rhs)))
}

fn conditional(operands: &[Expression], span: Span, env: &mut Environment) -> EvalResult<Value> {
    let [test, then_branch, else_branch] = operands else {
        return Err(EvalError::MalformedIf {
            found: operands.len(),
            span,
        });
    };
    let taken = evaluate(test, env)?.truthiness().unwrap_or(false);
    if taken {
        evaluate(then_branch, env)
    } else {
        evaluate(else_branch, env)
    }
}

fn define(operands: &[Expression], span: Span, env: &mut Environment) -> EvalResult<Value> {
    let [target, body] = operands else {
        return Err(EvalError::MalformedDefine {
            reason: "define needs a name and an expression",
            span,
        });
    };
    match target {
        Expression::Name(name) => {
            let value = evaluate(body, env)?;
            debug!("define {} as {value}", name.as_str());
            env.define(name.as_str(), Binding::from(value));
        }
        Expression::Operation(name, params, _) => {
            if Operator::from_name(name.as_str()).is_some() {
                return Err(EvalError::MalformedDefine {
                    reason: "a built-in operator can't be redefined",
                    span: name.span(),
                });
            }
            let parameters = params
                .iter()
                .map(|param| {
                    param
                        .as_name()
                        .map(|p| p.as_str().to_string())
                        .ok_or(EvalError::MalformedDefine {
                            reason: "parameters must be names",
                            span: param.span(),
                        })
                })
                .collect::<EvalResult<Vec<_>>>()?;
            debug!("define procedure {}({})", name.as_str(), parameters.join(" "));
            let procedure = Procedure::new(name.as_str(), parameters, body.clone());
            env.define(name.as_str(), Binding::Procedure(Rc::new(procedure)));
        }
        _ => {
            return Err(EvalError::MalformedDefine {
                reason: "define should be followed by a name",
                span: target.span(),
            })
        }
    }
    Ok(Value::Define)
}

fn apply(
    head: &Name,
    operands: &[Expression],
    span: Span,
    env: &mut Environment,
) -> EvalResult<Value> {
    let mut arguments = Vec::with_capacity(operands.len());
    for operand in operands {
        let argument = match evaluate(operand, env) {
            Ok(value) => Binding::from(value),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => match env.config().argument_errors {
                ArgumentErrors::Propagate => return Err(err),
                ArgumentErrors::Swallow => {
                    debug!("argument of {} bound as void after: {err}", head.as_str());
                    Binding::Void
                }
            },
        };
        arguments.push(argument);
    }

    let procedure = match env.global(head.as_str()) {
        Some(Binding::Procedure(procedure)) => Rc::clone(procedure),
        Some(_) => {
            return Err(EvalError::NotAProcedure {
                name: head.as_str().to_string(),
                span: head.span(),
            })
        }
        None => {
            return Err(EvalError::UndefinedIdentifier {
                name: head.as_str().to_string(),
                span: head.span(),
            })
        }
    };
    if procedure.arity() != arguments.len() {
        return Err(arity_mismatch(
            procedure.name(),
            procedure.arity(),
            arguments.len(),
            span,
        ));
    }
    if env.depth() >= env.config().max_call_depth {
        return Err(EvalError::StackExhausted { depth: env.depth() });
    }

    let frame: Frame = procedure
        .parameters()
        .iter()
        .cloned()
        .zip(arguments)
        .collect();
    debug!("call {} at depth {}", procedure.name(), env.depth() + 1);
    env.with_frame(frame, |env| evaluate(procedure.body(), env))
}

use crate::parser::Expression;
use derivative::Derivative;
use std::rc::Rc;

/// What evaluating an expression produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    /// A `define` form ran; its effect is the change to the globals.
    Define,
    /// A reference to something that is not a plain value, e.g. a procedure
    /// named without being called.
    Notification(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Number,
    Boolean,
    Define,
    Notification,
    Error,
}

impl ResultKind {
    pub fn of<E>(result: &Result<Value, E>) -> Self {
        match result {
            Ok(value) => value.kind(),
            Err(_) => Self::Error,
        }
    }
}

impl Value {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Number(_) => ResultKind::Number,
            Self::Boolean(_) => ResultKind::Boolean,
            Self::Define => ResultKind::Define,
            Self::Notification(_) => ResultKind::Notification,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numbers count as true, whatever their value. Anything that is neither a
    /// number nor a boolean has no truth value.
    pub(super) fn truthiness(&self) -> Option<bool> {
        match self {
            Self::Number(_) => Some(true),
            Self::Boolean(b) => Some(*b),
            Self::Define | Self::Notification(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(true) => write!(f, "#t"),
            Self::Boolean(false) => write!(f, "#f"),
            Self::Define => write!(f, "define"),
            Self::Notification(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Procedure {
    name: String,
    parameters: Vec<String>,
    #[derivative(Debug = "ignore")]
    body: Expression,
}

impl Procedure {
    pub fn new(name: impl Into<String>, parameters: Vec<String>, body: Expression) -> Self {
        Self {
            name: name.into(),
            parameters,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }
}

/// What a name can be bound to, globally or in a call frame.
#[derive(Debug, Clone)]
pub enum Binding {
    Number(f64),
    Boolean(bool),
    Procedure(Rc<Procedure>),
    /// Neither a number nor a boolean: the result of a nested `define`, a
    /// procedure reference or an argument whose evaluation failed.
    Void,
}

impl Binding {
    /// The value a reference to `name` evaluates to. Procedures are never
    /// invoked here.
    pub fn resolve(&self, name: &str) -> Value {
        match self {
            Self::Number(n) => Value::Number(*n),
            Self::Boolean(b) => Value::Boolean(*b),
            Self::Procedure(_) => Value::Notification(format!("#<procedure:{name}>")),
            Self::Void => Value::Notification(format!("#<void:{name}>")),
        }
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Self::Number(n),
            Value::Boolean(b) => Self::Boolean(b),
            Value::Define | Value::Notification(_) => Self::Void,
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(true) => write!(f, "#t"),
            Self::Boolean(false) => write!(f, "#f"),
            Self::Procedure(procedure) => write!(f, "#<procedure:{}>", procedure.name()),
            Self::Void => write!(f, "#<void>"),
        }
    }
}

use super::value::Binding;
use std::collections::{BTreeMap, HashMap};

pub type Frame = HashMap<String, Binding>;

/// What happens when an argument of a procedure call fails to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentErrors {
    /// The error is dropped and the parameter is bound as void.
    #[default]
    Swallow,
    /// The call fails with the argument's error.
    Propagate,
}

/// Both limits bound the host stack used by one evaluation. The defaults fit
/// the 2 MiB stack of a spawned thread in an unoptimized build.
#[derive(Debug, Clone)]
pub struct Config {
    pub argument_errors: ArgumentErrors,
    /// Procedure calls nested deeper than this fail with a fatal error.
    pub max_call_depth: usize,
    /// Expressions, calls included, nested deeper than this fail with a fatal
    /// error.
    pub max_eval_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            argument_errors: ArgumentErrors::default(),
            max_call_depth: 64,
            max_eval_depth: 256,
        }
    }
}

impl Config {
    pub fn argument_errors(mut self, argument_errors: ArgumentErrors) -> Self {
        self.argument_errors = argument_errors;
        self
    }

    pub fn max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn max_eval_depth(mut self, max_eval_depth: usize) -> Self {
        self.max_eval_depth = max_eval_depth;
        self
    }
}

/// Bindings of one interpreter session: the globals written by `define` and
/// one frame of parameters per active procedure call.
#[derive(Debug, Default)]
pub struct Environment {
    globals: BTreeMap<String, Binding>,
    call_stack: Vec<Frame>,
    nesting: usize,
    config: Config,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `name` against the innermost call frame, then the globals.
    /// Frames of callers further down the stack are never consulted.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.call_stack
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub fn global(&self, name: &str) -> Option<&Binding> {
        self.globals.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, binding: Binding) {
        self.globals.insert(name.into(), binding);
    }

    pub fn globals(&self) -> &BTreeMap<String, Binding> {
        &self.globals
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// How many evaluations are currently in progress.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    pub(crate) fn nested<T>(&mut self, op: impl FnOnce(&mut Self) -> T) -> T {
        self.nesting += 1;
        let result = op(self);
        self.nesting -= 1;
        result
    }

    /// Run `op` with `frame` pushed on the call stack. The frame is popped
    /// again whatever `op` returns.
    pub(crate) fn with_frame<T>(&mut self, frame: Frame, op: impl FnOnce(&mut Self) -> T) -> T {
        self.call_stack.push(frame);
        let result = op(self);
        self.call_stack.pop();
        result
    }

    /// The globals as `{name: value, ...}`, sorted by name.
    pub fn describe_globals(&self) -> String {
        let bindings = self
            .globals
            .iter()
            .map(|(name, binding)| format!("{name}: {binding}"))
            .collect::<Vec<_>>();
        format!("{{{}}}", bindings.join(", "))
    }
}

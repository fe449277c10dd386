use crate::language::errors::{SyntaxError, SyntaxErrorKind};
use std::fmt;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("There is no variable named \"{name}\"")]
    UnknownVariable { name: String },
    #[error("Variable \"{name}\" was read before it was given a value")]
    UnresolvedValue { name: String },
    #[error("No module {module} was found.")]
    UnknownModule { module: String },
    #[error("No function called {module}.{name} was found.")]
    UnknownFunction { module: String, name: String },
    #[error("{module}.{name}: expected {expected} parameters, got {received}")]
    ArityMismatch {
        module: String,
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("{module}.{name}: expected at least {minimum} parameters, got {received}")]
    TooFewArguments {
        module: String,
        name: String,
        minimum: usize,
        received: usize,
    },
    #[error("Constant \"{name}\" cannot be redefined")]
    ConstantRedefinition { name: String },
    #[error("Variable \"{name}\" is not a loop variable")]
    NotALoop { name: String },
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("Insufficient logical arguments in `{expression}`")]
    InsufficientLogicalArguments { expression: String },
    #[error("Unknown logical operator `{symbol}`")]
    UnknownOperator { symbol: String },
    #[error("End of file (EOF) while looking for `?end ${label}`")]
    MissingConditionalEnd { label: String },
    #[error("No such module \"{module}\" was found")]
    ModuleNotFound { module: String },
    #[error("Function calls nested deeper than {limit} levels")]
    CallDepthExceeded { limit: usize },
    #[error("{module}.{name} failed: {message}")]
    Native {
        module: String,
        name: String,
        message: String,
    },
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Syntax(err) => match err.kind {
                SyntaxErrorKind::Grammar => ErrorKind::Syntax,
                SyntaxErrorKind::EndOfLine => ErrorKind::EndOfLine,
            },
            RuntimeError::InsufficientLogicalArguments { .. }
            | RuntimeError::UnknownOperator { .. } => ErrorKind::Syntax,
            RuntimeError::UnknownVariable { .. }
            | RuntimeError::UnresolvedValue { .. }
            | RuntimeError::UnknownModule { .. }
            | RuntimeError::UnknownFunction { .. } => ErrorKind::Name,
            RuntimeError::ArityMismatch { .. }
            | RuntimeError::TooFewArguments { .. }
            | RuntimeError::NotALoop { .. }
            | RuntimeError::TypeMismatch { .. } => ErrorKind::Type,
            RuntimeError::ConstantRedefinition { .. } => ErrorKind::Assignment,
            RuntimeError::MissingConditionalEnd { .. } => ErrorKind::EndOfFile,
            RuntimeError::ModuleNotFound { .. } => ErrorKind::ModuleNotFound,
            RuntimeError::CallDepthExceeded { .. } => ErrorKind::Recursion,
            RuntimeError::Native { .. } => ErrorKind::Runtime,
        }
    }

    pub fn help(&self) -> Option<String> {
        match self {
            RuntimeError::Syntax(err) => err.help.clone(),
            RuntimeError::NotALoop { name } => {
                Some(format!("open the loop with `@n ${name} lower upper` first"))
            }
            RuntimeError::UnknownModule { module } => {
                Some(format!("add `+include {module}` at the top of the program"))
            }
            RuntimeError::InsufficientLogicalArguments { .. } => {
                Some("every operator takes two operands, e.g. `(a) ~ (0)` for negation".into())
            }
            _ => None,
        }
    }
}

/// The error taxonomy surfaced to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Type,
    Assignment,
    ModuleNotFound,
    EndOfFile,
    EndOfLine,
    Recursion,
    Runtime,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Name => "NameError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Assignment => "AssignmentError",
            ErrorKind::ModuleNotFound => "ModuleNotFound",
            ErrorKind::EndOfFile => "EOF",
            ErrorKind::EndOfLine => "EOL",
            ErrorKind::Recursion => "RecursionError",
            ErrorKind::Runtime => "RuntimeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the interpreter was doing when the error surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Preprocessing,
    Executing,
}

impl Phase {
    pub fn action(&self) -> &'static str {
        match self {
            Phase::Preprocessing => "preprocessing this program",
            Phase::Executing => "running this program",
        }
    }
}

/// A fatal error pinned to the source line that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("An exception occurred while {}\n  Line {line}\n{kind}: {message}", .phase.action())]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    pub help: Option<String>,
    pub line: usize,
    pub source_line: String,
    pub phase: Phase,
}

impl ScriptError {
    pub fn new(error: RuntimeError, line: usize, source_line: &str, phase: Phase) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            help: error.help(),
            line,
            source_line: source_line.to_string(),
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_keep_their_flavour() {
        let grammar: RuntimeError = SyntaxError::new("bad").into();
        let eol: RuntimeError = SyntaxError::end_of_line("cut short").into();
        assert_eq!(grammar.kind(), ErrorKind::Syntax);
        assert_eq!(eol.kind(), ErrorKind::EndOfLine);
        assert_eq!(eol.to_string(), "cut short");
    }

    #[test]
    fn arity_message_reports_expected_and_actual() {
        let err = RuntimeError::ArityMismatch {
            module: "std".into(),
            name: "input".into(),
            expected: 1,
            received: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.to_string(), "std.input: expected 1 parameters, got 3");
    }

    #[test]
    fn script_error_display() {
        let err = ScriptError::new(
            RuntimeError::ConstantRedefinition { name: "x".into() },
            4,
            "$x integer[] = (2)",
            Phase::Executing,
        );
        assert_eq!(
            err.to_string(),
            "An exception occurred while running this program\n  Line 4\nAssignmentError: Constant \"x\" cannot be redefined"
        );
    }
}

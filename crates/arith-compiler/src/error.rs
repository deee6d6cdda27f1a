use crate::{
    compiler::{ast::ParseError, error::CompileError},
    machine::MachineError,
    register::CodegenError,
};

/// The result type for compiling and running expressions.
pub type ArithResult<T> = Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Any error raised while compiling or running an expression.
pub enum Error {
    Compile(CompileError),
    Machine(MachineError),
}

impl Error {
    pub fn with_context(self, source: &str) -> ErrorWithContext<'_> {
        ErrorWithContext { err: self, source }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{e}"),
            Error::Machine(e) => write!(f, "{e}"),
        }
    }
}

impl From<CompileError> for Error {
    fn from(value: CompileError) -> Error {
        Error::Compile(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Error {
        Error::from(CompileError::from(value))
    }
}

impl From<CodegenError> for Error {
    fn from(value: CodegenError) -> Error {
        Error::from(CompileError::from(value))
    }
}

impl From<MachineError> for Error {
    fn from(value: MachineError) -> Error {
        Error::Machine(value)
    }
}

pub struct ErrorWithContext<'a> {
    err: Error,
    source: &'a str,
}

impl std::fmt::Debug for ErrorWithContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for ErrorWithContext<'_> {}

impl std::fmt::Display for ErrorWithContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.err {
            Error::Compile(err) => write!(f, "{}", err.clone().with_context(self.source)),
            Error::Machine(err) => write!(f, "{err} while running {:?}", self.source.trim()),
        }
    }
}

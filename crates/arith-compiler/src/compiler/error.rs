use crate::register::CodegenError;

use super::ast::ParseError;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents an error that can occur during compilation.
pub enum CompileError {
    Parse(ParseError),
    Codegen(CodegenError),
}

impl From<ParseError> for CompileError {
    fn from(value: ParseError) -> Self {
        CompileError::Parse(value)
    }
}

impl From<CodegenError> for CompileError {
    fn from(value: CodegenError) -> Self {
        CompileError::Codegen(value)
    }
}

impl std::error::Error for CompileError {}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Codegen(e) => write!(f, "{e}"),
        }
    }
}

impl CompileError {
    pub fn with_context(self, source: &str) -> CompileErrorWithContext<'_> {
        CompileErrorWithContext { err: self, source }
    }
}

#[derive(Debug, PartialEq)]
pub struct CompileErrorWithContext<'a> {
    err: CompileError,
    source: &'a str,
}

impl std::error::Error for CompileErrorWithContext<'_> {}

impl std::fmt::Display for CompileErrorWithContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.err {
            CompileError::Parse(e) => write!(f, "{}", e.clone().with_context(self.source)),
            CompileError::Codegen(e) => write!(f, "{e} in {:?}", self.source.trim()),
        }
    }
}

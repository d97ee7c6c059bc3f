use crate::language::Language;
use crate::result::Outcome;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Compile,
    SyntaxCheck,
    Run,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Compile => "compile",
            Phase::SyntaxCheck => "syntax-check",
            Phase::Run => "run",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way an execution can end without success.
///
/// The `Display` text of each variant is exactly what lands in
/// `ExecutionResult::error`.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Tool Unavailable:\n`{tool}` was not found on PATH; install it to run {language} code")]
    ToolUnavailable { tool: String, language: Language },

    #[error("Compilation Error:\n{stderr}")]
    CompileError { stderr: String },

    #[error("Runtime Error:\n{detail}")]
    RuntimeError { stdout: String, detail: String },

    #[error("{}", timeout_message(.phase))]
    Timeout { phase: Phase },

    #[error("Error: {0}")]
    MalformedInput(String),

    #[error("Execution error: {0:#}")]
    Internal(anyhow::Error),
}

fn timeout_message(phase: &Phase) -> &'static str {
    match phase {
        Phase::Compile => "Compilation timeout - compiler took too long to finish",
        Phase::SyntaxCheck => "Syntax check timeout - parser took too long to finish",
        Phase::Run => "Execution timeout - program took too long to run",
    }
}

impl ExecError {
    pub fn outcome(&self) -> Outcome {
        match self {
            ExecError::ToolUnavailable { .. } => Outcome::ToolUnavailable,
            ExecError::CompileError { .. } => Outcome::CompileFailed,
            ExecError::RuntimeError { .. } => Outcome::RunFailed,
            ExecError::Timeout { .. } => Outcome::Timeout,
            ExecError::MalformedInput(_) => Outcome::MalformedInput,
            ExecError::Internal(_) => Outcome::InternalError,
        }
    }

    /// Stdout produced before the failure, if any survives it.
    pub fn partial_output(&self) -> &str {
        match self {
            ExecError::RuntimeError { stdout, .. } => stdout,
            _ => "",
        }
    }
}

impl From<anyhow::Error> for ExecError {
    fn from(err: anyhow::Error) -> Self {
        ExecError::Internal(err)
    }
}

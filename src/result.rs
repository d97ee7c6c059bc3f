use crate::error::ExecError;
use crate::language::Language;

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_text: String,
    pub language: Language,
    #[serde(default)]
    pub compile_only: bool,
}

impl ExecutionRequest {
    pub fn new(language: Language, source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            language,
            compile_only: false,
        }
    }

    pub fn compile_only(mut self, compile_only: bool) -> Self {
        self.compile_only = compile_only;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CompileFailed,
    CompileOnlySucceeded,
    RunSucceeded,
    RunFailed,
    Timeout,
    ToolUnavailable,
    MalformedInput,
    InternalError,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::CompileOnlySucceeded | Outcome::RunSucceeded)
    }
}

/// A successful pipeline run, before it is folded into an [`ExecutionResult`].
#[derive(Debug)]
pub struct Completion {
    pub outcome: Outcome,
    pub output: String,
}

impl Completion {
    pub fn compiled() -> Self {
        Self {
            outcome: Outcome::CompileOnlySucceeded,
            output: String::new(),
        }
    }

    pub fn ran(output: String) -> Self {
        Self {
            outcome: Outcome::RunSucceeded,
            output,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub output: String,
    pub error: String,
    #[serde(rename = "execution_time")]
    pub execution_time_seconds: f64, // seconds, millisecond precision
    pub success: bool,
    #[serde(skip)]
    pub outcome: Outcome,
}

impl ExecutionResult {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            error: String::new(),
            execution_time_seconds: 0.0,
            success: false,
            outcome: Outcome::InternalError,
        }
    }

    pub fn record(&mut self, completion: Result<Completion, ExecError>) {
        match completion {
            Ok(c) => {
                self.output = c.output;
                self.error.clear();
                self.success = c.outcome.is_success();
                self.outcome = c.outcome;
            }
            Err(err) => {
                self.output = err.partial_output().to_owned();
                self.error = err.to_string();
                self.success = false;
                self.outcome = err.outcome();
            }
        }
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.execution_time_seconds = (elapsed.as_secs_f64() * 1000.0).round() / 1000.0;
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self::new()
    }
}

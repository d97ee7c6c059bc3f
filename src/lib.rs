#![deny(clippy::all)]

//! Compiles and runs untrusted C, C++, Java and Python submissions and
//! reports a structured result.
//!
//! Isolation is limited to a private staging directory, a wall-clock
//! deadline per phase enforced on the whole process group, and a cap on the
//! size of files the program writes. There is no namespace, seccomp or
//! cgroup sandbox; do not expose this to hostile multi-tenant input as is.

mod cmd;
mod proc;
mod signal;

pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod language;
pub mod probe;
pub mod result;
pub mod runner;
pub mod simulator;
pub mod workspace;

pub use crate::config::{ExecutorConfig, ToolNames};
pub use crate::error::{ExecError, Phase};
pub use crate::executor::Executor;
pub use crate::input::{InputSynthesizer, NoInput, TemplateInput};
pub use crate::language::Language;
pub use crate::probe::{FixedProbe, PathProbe, ToolchainProbe};
pub use crate::result::{ExecutionRequest, ExecutionResult, Outcome};

use once_cell::sync::OnceCell;

/// Runs `source_text` with a process-wide executor using default settings.
pub fn execute(language: Language, source_text: &str, compile_only: bool) -> ExecutionResult {
    static DEFAULT: OnceCell<Executor> = OnceCell::new();

    let req = ExecutionRequest::new(language, source_text).compile_only(compile_only);
    match DEFAULT.get_or_try_init(|| Executor::new(ExecutorConfig::default())) {
        Ok(executor) => executor.execute(&req),
        Err(err) => {
            let mut result = ExecutionResult::new();
            result.record(Err(ExecError::Internal(err)));
            result
        }
    }
}

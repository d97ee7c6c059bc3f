//! Degraded mode for C when no compiler is installed.
//!
//! This is a teaching stand-in, not an interpreter. The validator catches a
//! handful of beginner mistakes by pattern matching, and the predictor
//! either recognises one of the platform's own exercises or substitutes
//! placeholder values into `printf` format strings.

mod predict;
mod validate;

pub use self::predict::{predict, Scenario};
pub use self::validate::validate;

use crate::error::ExecError;
use crate::result::{Completion, ExecutionRequest};
use crate::runner::{RunContext, Runner};

use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedC;

impl Runner for SimulatedC {
    fn run(&self, _ctx: &RunContext<'_>, req: &ExecutionRequest) -> Result<Completion, ExecError> {
        let findings = validate(&req.source_text);
        if !findings.is_empty() {
            debug!(?findings, "simulated compilation failed");
            return Err(ExecError::CompileError {
                stderr: findings.join("\n"),
            });
        }

        if req.compile_only {
            return Ok(Completion::compiled());
        }

        Ok(Completion::ran(predict(&req.source_text)))
    }
}

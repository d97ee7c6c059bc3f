//! Language runners.
//!
//! The pipeline is language-agnostic. Adapters only say which file to stage
//! and which commands compile, check and run it.

pub mod c;
pub mod cpp;
pub mod java;
pub mod python;

use crate::cmd::PhaseCommand;
use crate::config::ExecutorConfig;
use crate::error::{ExecError, Phase};
use crate::input::InputSynthesizer;
use crate::language::Language;
use crate::probe::Toolchain;
use crate::proc::{self, PhaseOutput};
use crate::result::{Completion, ExecutionRequest};
use crate::workspace::Workspace;

use std::fmt;

use tokio::runtime::Handle;
use tracing::debug;

/// Everything one request shares with its runner.
pub struct RunContext<'a> {
    pub config: &'a ExecutorConfig,
    pub runtime: &'a Handle,
    pub input: &'a dyn InputSynthesizer,
    pub toolchain: &'a Toolchain,
}

/// A way of turning a request into a completion: real toolchains or the
/// C simulator.
pub trait Runner: Send + Sync + fmt::Debug {
    fn run(&self, ctx: &RunContext<'_>, req: &ExecutionRequest) -> Result<Completion, ExecError>;
}

pub trait LanguageAdapter: Send + Sync + fmt::Debug {
    fn language(&self) -> Language;

    /// Name of the staged source file.
    fn source_file(&self, source: &str) -> Result<String, ExecError>;

    fn compile_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError>;

    /// Parse-only validation for `compile_only` requests of languages
    /// without a compile step.
    fn syntax_check_command(
        &self,
        _ws: &Workspace,
        _toolchain: &Toolchain,
        _config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError> {
        Ok(None)
    }

    fn run_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<PhaseCommand, ExecError>;
}

pub fn adapter_for(language: Language) -> &'static dyn LanguageAdapter {
    match language {
        Language::C => &c::CAdapter,
        Language::Cpp => &cpp::CppAdapter,
        Language::Java => &java::JavaAdapter,
        Language::Python => &python::PythonAdapter,
    }
}

/// Stages, compiles and runs through external processes.
#[derive(Debug)]
pub struct NativeRunner {
    adapter: &'static dyn LanguageAdapter,
}

impl NativeRunner {
    pub fn new(adapter: &'static dyn LanguageAdapter) -> Self {
        Self { adapter }
    }

    fn phase(
        &self,
        ctx: &RunContext<'_>,
        ws: &Workspace,
        cmd: &PhaseCommand,
    ) -> Result<PhaseOutput, ExecError> {
        let output = proc::run(ctx.runtime, cmd, ws, ctx.config.max_output_bytes)?;
        debug!(
            language = %self.adapter.language(),
            phase = %cmd.phase,
            code = ?output.code,
            timed_out = output.timed_out,
            "phase finished"
        );
        if output.timed_out {
            return Err(ExecError::Timeout { phase: cmd.phase });
        }
        Ok(output)
    }

    fn check(
        &self,
        ctx: &RunContext<'_>,
        ws: &Workspace,
        cmd: &PhaseCommand,
    ) -> Result<(), ExecError> {
        let output = self.phase(ctx, ws, cmd)?;
        if !output.success() {
            return Err(ExecError::CompileError {
                stderr: output.diagnostics(),
            });
        }
        Ok(())
    }
}

impl Runner for NativeRunner {
    fn run(&self, ctx: &RunContext<'_>, req: &ExecutionRequest) -> Result<Completion, ExecError> {
        let adapter = self.adapter;
        let file_name = adapter.source_file(&req.source_text)?;
        let ws = Workspace::stage(&ctx.config.workspace_root, &file_name, &req.source_text)?;

        if let Some(cmd) = adapter.compile_command(&ws, ctx.toolchain, ctx.config)? {
            debug_assert_eq!(cmd.phase, Phase::Compile);
            self.check(ctx, &ws, &cmd)?;
        }

        if req.compile_only {
            if let Some(cmd) = adapter.syntax_check_command(&ws, ctx.toolchain, ctx.config)? {
                self.check(ctx, &ws, &cmd)?;
            }
            return Ok(Completion::compiled());
        }

        let input = ctx.input.synthesize(adapter.language(), &req.source_text);
        let stdin = ws.put("stdin.txt", &input)?;

        let mut cmd = adapter.run_command(&ws, ctx.toolchain, ctx.config)?;
        cmd.stdin(stdin).rlimit_fsize(ctx.config.max_output_bytes);

        let output = self.phase(ctx, &ws, &cmd)?;
        if !output.success() {
            return Err(ExecError::RuntimeError {
                detail: output.diagnostics(),
                stdout: output.stdout,
            });
        }
        Ok(Completion::ran(output.stdout))
    }
}

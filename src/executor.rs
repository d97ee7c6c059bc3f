use crate::config::ExecutorConfig;
use crate::error::ExecError;
use crate::input::{InputSynthesizer, TemplateInput};
use crate::language::Language;
use crate::probe::{PathProbe, Toolchain, ToolchainProbe};
use crate::result::{Completion, ExecutionRequest, ExecutionResult};
use crate::runner::{self, NativeRunner, RunContext, Runner};
use crate::simulator::SimulatedC;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::runtime::{self, Runtime};
use tracing::{debug, error, info};

/// Runs submissions. Cheap to share between threads behind an `Arc`.
#[derive(Debug)]
pub struct Executor {
    config: ExecutorConfig,
    probe: Arc<dyn ToolchainProbe>,
    input: Arc<dyn InputSynthesizer>,
    timer: TimerRuntime,
}

/// Drives deadline timers. Shut down in the background on drop so an
/// executor may be dropped from async code.
#[derive(Debug)]
struct TimerRuntime(Option<Runtime>);

impl Drop for TimerRuntime {
    fn drop(&mut self) {
        if let Some(rt) = self.0.take() {
            rt.shutdown_background();
        }
    }
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        let rt = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("polyexec-timer")
            .enable_time()
            .build()
            .context("failed to build timer runtime")?;

        Ok(Self {
            config,
            probe: Arc::new(PathProbe),
            input: Arc::new(TemplateInput),
            timer: TimerRuntime(Some(rt)),
        })
    }

    pub fn with_probe(mut self, probe: Arc<dyn ToolchainProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_input(mut self, input: Arc<dyn InputSynthesizer>) -> Self {
        self.input = input;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Executes one request. Always returns a result, whatever the input.
    pub fn execute(&self, req: &ExecutionRequest) -> ExecutionResult {
        let t0 = Instant::now();
        let mut result = ExecutionResult::new();

        let completion = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(req)))
            .unwrap_or_else(|_| Err(anyhow::anyhow!("executor panicked").into()));

        if let Err(ExecError::Internal(ref err)) = completion {
            error!(language = %req.language, "execution failed:\n{:?}", err);
        }

        result.record(completion);
        result.set_elapsed(t0.elapsed());

        info!(
            language = %req.language,
            compile_only = req.compile_only,
            outcome = ?result.outcome,
            time = result.execution_time_seconds,
            "execution finished"
        );
        result
    }

    fn dispatch(&self, req: &ExecutionRequest) -> Result<Completion, ExecError> {
        self.validate(req)?;

        let toolchain = Toolchain::detect(self.probe.as_ref(), &self.config.tools, req.language);
        let backend = self.select(&toolchain)?;
        debug!(language = %req.language, ?backend, "backend selected");

        let rt = self
            .timer
            .0
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("timer runtime is shut down"))?;

        let ctx = RunContext {
            config: &self.config,
            runtime: rt.handle(),
            input: self.input.as_ref(),
            toolchain: &toolchain,
        };
        backend.run(&ctx, req)
    }

    fn validate(&self, req: &ExecutionRequest) -> Result<(), ExecError> {
        if req.source_text.trim().is_empty() {
            return Err(ExecError::MalformedInput("Empty code provided".to_owned()));
        }
        if req.source_text.len() > self.config.max_source_bytes {
            return Err(ExecError::MalformedInput(format!(
                "source is {} bytes, the limit is {} bytes",
                req.source_text.len(),
                self.config.max_source_bytes
            )));
        }
        Ok(())
    }

    /// Picks the native runner when the toolchain is complete, the simulator
    /// for C when allowed, and reports the missing tool otherwise.
    fn select(&self, toolchain: &Toolchain) -> Result<Box<dyn Runner>, ExecError> {
        let language = toolchain.language();
        if toolchain.is_complete() {
            return Ok(Box::new(NativeRunner::new(runner::adapter_for(language))));
        }
        if language == Language::C && self.config.simulate_missing_c_compiler {
            return Ok(Box::new(SimulatedC));
        }
        Err(ExecError::ToolUnavailable {
            tool: toolchain.first_missing().unwrap_or_default().to_owned(),
            language,
        })
    }
}

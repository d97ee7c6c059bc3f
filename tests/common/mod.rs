#![allow(dead_code)]

use polyexec::{
    ExecutionRequest, ExecutionResult, Executor, ExecutorConfig, InputSynthesizer, Language,
    PathProbe, ToolchainProbe,
};

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Once};

use tracing::{debug, info};

fn setup_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .with(ErrorLayer::default())
        .init();
}

pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        setup_tracing();
    });
}

/// A fresh, empty workspace root for one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("polyexec_test").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn is_empty_dir(dir: &PathBuf) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

pub struct Harness {
    pub executor: Executor,
    pub root: PathBuf,
}

impl Harness {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, |_| {})
    }

    pub fn with_config(name: &str, f: impl FnOnce(&mut ExecutorConfig)) -> Self {
        init();
        let root = scratch_dir(name);
        let mut config = ExecutorConfig {
            workspace_root: root.clone(),
            ..Default::default()
        };
        f(&mut config);
        let executor = Executor::new(config).unwrap();
        info!(?name, ?root, "harness ready");
        Self { executor, root }
    }

    pub fn probe(mut self, probe: Arc<dyn ToolchainProbe>) -> Self {
        self.executor = self.executor.with_probe(probe);
        self
    }

    pub fn with_input(mut self, input: Arc<dyn InputSynthesizer>) -> Self {
        self.executor = self.executor.with_input(input);
        self
    }

    pub fn run(&self, language: Language, source: &str) -> ExecutionResult {
        self.exec(language, source, false)
    }

    pub fn compile(&self, language: Language, source: &str) -> ExecutionResult {
        self.exec(language, source, true)
    }

    fn exec(&self, language: Language, source: &str, compile_only: bool) -> ExecutionResult {
        let req = ExecutionRequest::new(language, source).compile_only(compile_only);
        let result = self.executor.execute(&req);
        debug!("execution result = {:?}", result);
        assert_invariants(&result);
        result
    }

    pub fn workspace_is_clean(&self) -> bool {
        is_empty_dir(&self.root)
    }
}

/// Every tool `language` needs, if all of them are installed.
pub fn toolchain_present(language: Language) -> bool {
    let probe = PathProbe;
    let present = match language {
        Language::C => probe.available("gcc"),
        Language::Cpp => probe.available("g++"),
        Language::Java => probe.available("javac") && probe.available("java"),
        Language::Python => probe.available("python3") || probe.available("python"),
    };
    if !present {
        eprintln!("skipping: no {} toolchain on PATH", language);
    }
    present
}

pub fn assert_invariants(result: &ExecutionResult) {
    assert!(result.execution_time_seconds >= 0.0);
    assert_eq!(result.success, result.outcome.is_success(), "{:?}", result);
    if !result.success {
        assert!(!result.error.is_empty(), "{:?}", result);
    }
}

#[macro_export]
macro_rules! assert_le {
    ($lhs:expr, $rhs:expr) => {{
        let lhs = $lhs;
        let rhs = $rhs;
        assert!(lhs <= rhs, "lhs = {:?}, rhs = {:?}", lhs, rhs)
    }};
}

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
#[serde(default)]
pub struct ExecutorConfig {
    #[arg(
        long,
        value_name = "milliseconds",
        env = "POLYEXEC_COMPILE_TIMEOUT",
        default_value_t = 10_000
    )]
    pub compile_timeout_ms: u64,

    #[arg(long, value_name = "milliseconds", env = "POLYEXEC_RUN_TIMEOUT", default_value_t = 5_000)]
    pub run_timeout_ms: u64,

    #[arg(
        long,
        value_name = "milliseconds",
        env = "POLYEXEC_SYNTAX_CHECK_TIMEOUT",
        default_value_t = 5_000
    )]
    pub syntax_check_timeout_ms: u64,

    #[arg(
        long,
        value_name = "path",
        env = "POLYEXEC_WORKSPACE_ROOT",
        default_value_os_t = std::env::temp_dir()
    )]
    pub workspace_root: PathBuf,

    #[arg(
        long,
        value_name = "bytes",
        env = "POLYEXEC_MAX_SOURCE_BYTES",
        default_value_t = 64 * 1024
    )]
    pub max_source_bytes: usize,

    #[arg(
        long,
        value_name = "bytes",
        env = "POLYEXEC_MAX_OUTPUT_BYTES",
        default_value_t = 1024 * 1024
    )]
    pub max_output_bytes: u64,

    /// Disable the heuristic C simulator used when gcc is missing.
    #[arg(long = "no-simulator", action = clap::ArgAction::SetFalse)]
    pub simulate_missing_c_compiler: bool,

    #[command(flatten)]
    pub tools: ToolNames,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            compile_timeout_ms: 10_000,
            run_timeout_ms: 5_000,
            syntax_check_timeout_ms: 5_000,
            workspace_root: std::env::temp_dir(),
            max_source_bytes: 64 * 1024,
            max_output_bytes: 1024 * 1024,
            simulate_missing_c_compiler: true,
            tools: ToolNames::default(),
        }
    }
}

impl ExecutorConfig {
    pub fn compile_timeout(&self) -> Duration {
        Duration::from_millis(self.compile_timeout_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }

    pub fn syntax_check_timeout(&self) -> Duration {
        Duration::from_millis(self.syntax_check_timeout_ms)
    }
}

/// Binary names looked up on `PATH` for each toolchain.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
#[serde(default)]
pub struct ToolNames {
    #[arg(long, value_name = "name", default_value = "gcc")]
    pub gcc: String,

    #[arg(long = "gxx", value_name = "name", default_value = "g++")]
    pub gxx: String,

    #[arg(long, value_name = "name", default_value = "javac")]
    pub javac: String,

    #[arg(long, value_name = "name", default_value = "java")]
    pub java: String,

    /// Candidates tried in order.
    #[arg(
        long,
        value_name = "name",
        value_delimiter = ',',
        default_values_t = [String::from("python3"), String::from("python")]
    )]
    pub python: Vec<String>,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            gcc: "gcc".into(),
            gxx: "g++".into(),
            javac: "javac".into(),
            java: "java".into(),
            python: vec!["python3".into(), "python".into()],
        }
    }
}

use crate::error::Phase;

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// One toolchain invocation: what to run, where, and for how long.
#[derive(Debug, Clone)]
pub struct PhaseCommand {
    pub phase: Phase,
    pub bin: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub stdin: Option<PathBuf>,
    pub timeout: Duration,
    pub rlimit_fsize: Option<u64>, // bytes
}

impl PhaseCommand {
    pub fn new(phase: Phase, bin: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            phase,
            bin: bin.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
            timeout,
            rlimit_fsize: None,
        }
    }

    pub fn arg(&mut self, a: impl Into<OsString>) -> &mut Self {
        self.args.push(a.into());
        self
    }

    pub fn current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn rlimit_fsize(&mut self, bytes: u64) -> &mut Self {
        self.rlimit_fsize = Some(bytes);
        self
    }
}

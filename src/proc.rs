use crate::cmd::PhaseCommand;
use crate::signal;
use crate::workspace::Workspace;

use std::fs::File;
use std::io::Read as _;
use std::os::unix::process::{CommandExt as _, ExitStatusExt as _};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use rlimit::Resource;
use scopeguard::guard;
use tokio::runtime::Handle;
use tracing::trace;

#[derive(Debug)]
pub struct PhaseOutput {
    pub code: Option<i32>,
    pub signal: Option<Signal>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub real_time: Duration,
}

impl PhaseOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }

    /// Stderr, or a line describing how the process ended when stderr is empty.
    pub fn diagnostics(&self) -> String {
        if !self.stderr.trim().is_empty() {
            return self.stderr.clone();
        }
        match (self.code, self.signal) {
            (_, Some(sig)) => format!("process terminated by signal {}", sig),
            (Some(code), None) => format!("process exited with code {}", code),
            (None, None) => "process ended abnormally".to_owned(),
        }
    }
}

/// Runs one phase to completion or until its deadline.
///
/// The child leads its own process group so a deadline kill, and the sweep
/// after every phase, also reaches anything it forked. Stdout and stderr are
/// captured through files in the workspace.
#[tracing::instrument(level = "trace", err, skip(runtime, cmd, ws), fields(phase = %cmd.phase))]
pub fn run(
    runtime: &Handle,
    cmd: &PhaseCommand,
    ws: &Workspace,
    max_output: u64,
) -> Result<PhaseOutput> {
    trace!(?cmd);

    let stdout_path = ws.artifact_path(&format!("{}.stdout", cmd.phase));
    let stderr_path = ws.artifact_path(&format!("{}.stderr", cmd.phase));

    let mut command = Command::new(&cmd.bin);
    command
        .args(&cmd.args)
        .stdin(open_stdin(cmd.stdin.as_deref())?)
        .stdout(create_capture(&stdout_path)?)
        .stderr(create_capture(&stderr_path)?)
        .process_group(0);

    if let Some(ref cwd) = cmd.cwd {
        command.current_dir(cwd);
    }

    if let Some(fsize) = cmd.rlimit_fsize {
        // SAFETY: setrlimit is async-signal-safe and touches no shared state.
        unsafe {
            command.pre_exec(move || Resource::FSIZE.set(fsize, fsize));
        }
    }

    let t0 = Instant::now();

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to spawn: bin = {}", cmd.bin.display()))?;

    let pgid = Pid::from_raw(child.id() as i32);
    trace!(?pgid);

    let group = guard(pgid, signal::killall);

    let fired = Arc::new(AtomicBool::new(false));
    let killer = {
        let handle = signal::async_kill(runtime, pgid, cmd.timeout, Arc::clone(&fired));
        guard(handle, |h| h.abort())
    };

    let status = child.wait().context("failed to wait for child")?;
    let real_time = t0.elapsed();

    drop(killer);
    drop(group);

    let signal = status.signal().and_then(|s| Signal::try_from(s).ok());
    let timed_out = fired.load(Ordering::SeqCst) && signal == Some(Signal::SIGKILL);

    trace!(code = ?status.code(), ?signal, timed_out, ?real_time);

    Ok(PhaseOutput {
        code: status.code(),
        signal,
        timed_out,
        stdout: read_capture(&stdout_path, max_output)?,
        stderr: read_capture(&stderr_path, max_output)?,
        real_time,
    })
}

fn open_stdin(path: Option<&Path>) -> Result<Stdio> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("failed to open stdin: path = {}", p.display()))?;
            Ok(file.into())
        }
        None => Ok(Stdio::null()),
    }
}

fn create_capture(path: &Path) -> Result<Stdio> {
    let file = File::create(path)
        .with_context(|| format!("failed to create capture file: path = {}", path.display()))?;
    Ok(file.into())
}

fn read_capture(path: &Path, max_output: u64) -> Result<String> {
    let mut buf = Vec::new();
    File::open(path)
        .and_then(|f| f.take(max_output).read_to_end(&mut buf))
        .with_context(|| format!("failed to read capture file: path = {}", path.display()))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

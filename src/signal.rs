use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::trace;

/// Kills the process group `pgid` once `timeout` elapses and raises `fired`.
pub fn async_kill(
    runtime: &Handle,
    pgid: Pid,
    timeout: Duration,
    fired: Arc<AtomicBool>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        time::sleep(timeout).await;
        fired.store(true, Ordering::SeqCst);
        let _ = kill_group(pgid, Signal::SIGKILL);
    })
}

pub fn kill_group(pgid: Pid, signal: Signal) -> nix::Result<()> {
    let result = signal::killpg(pgid, signal);
    trace!(
        "killpg pgid = {}, signal = {}, result = {:?}",
        pgid,
        signal,
        result
    );
    result
}

/// Stops then kills whatever is left in the group. An empty group is fine.
pub fn killall(pgid: Pid) {
    let _ = kill_group(pgid, Signal::SIGSTOP);
    match kill_group(pgid, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(err) => tracing::warn!(%pgid, %err, "failed to reap process group"),
    }
}

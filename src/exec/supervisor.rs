// src/exec/supervisor.rs

//! Runs rendered commands one at a time, each under a hard timeout.

use std::collections::VecDeque;
use std::fmt;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, UnconvError};
use crate::exec::observer::{ProcessObserver, ProcessState};
use crate::exec::terminate::{GroupKill, Terminator};

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = if cfg!(windows) { "cmd" } else { "sh" };

const STDERR_TAIL_LINES: usize = 20;
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(200);

/// The one external-process slot of the whole program.
///
/// Held from spawn until the child has exited or been killed. Every
/// `Supervisor` shares it.
static PROCESS_SLOT: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Executes shell commands under a timeout, never more than one at a time
/// process-wide.
#[derive(Clone)]
pub struct Supervisor {
    shell: String,
    observer: Option<Arc<dyn ProcessObserver>>,
    terminator: Arc<dyn Terminator>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("shell", &self.shell)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            observer: None,
            terminator: Arc::new(GroupKill),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProcessObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace how timed-out children are killed (default: [`GroupKill`]).
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Run `command` through the shell, killing it after `timeout_secs`.
    ///
    /// Waits for the process slot first; the wait does not count against the
    /// timeout. Returns exactly one of: `Ok(())`, `Launch`, `Execution`,
    /// `Timeout` or `Kill`.
    ///
    /// If the returned future is dropped early the child is killed and the
    /// slot released.
    pub async fn execute(&self, command: &str, timeout_secs: u64) -> Result<()> {
        let _slot = PROCESS_SLOT.lock().await;

        self.transition(command, ProcessState::Starting);
        info!(cmd = %command, timeout_secs, "starting command");

        let mut child = match self.shell_command(command).spawn() {
            Ok(child) => child,
            Err(source) => {
                self.transition(command, ProcessState::LaunchFailed);
                return Err(UnconvError::Launch {
                    command: command.to_string(),
                    source,
                });
            }
        };

        let stderr_tail = child.stderr.take().map(spawn_stderr_drain);
        self.transition(command, ProcessState::Running);

        tokio::select! {
            status_res = child.wait() => {
                let tail = collect_stderr_tail(stderr_tail).await;
                self.transition(command, ProcessState::Completed);

                match status_res {
                    Ok(status) if status.success() => {
                        debug!(cmd = %command, "command succeeded");
                        Ok(())
                    }
                    Ok(status) => {
                        info!(
                            cmd = %command,
                            exit_code = status.code().unwrap_or(-1),
                            "command failed"
                        );
                        Err(UnconvError::Execution {
                            command: command.to_string(),
                            detail: describe_failure(status, &tail),
                        })
                    }
                    Err(e) => Err(UnconvError::Execution {
                        command: command.to_string(),
                        detail: format!("waiting for process: {e}"),
                    }),
                }
            }

            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                self.transition(command, ProcessState::TimedOut);
                if let Some(handle) = stderr_tail {
                    handle.abort();
                }

                self.transition(command, ProcessState::Killing);
                match self.stop(&mut child).await {
                    Ok(()) => {
                        self.transition(command, ProcessState::Killed);
                        warn!(cmd = %command, timeout_secs, "command timed out and was killed");
                        Err(UnconvError::Timeout {
                            command: command.to_string(),
                            timeout: timeout_secs,
                        })
                    }
                    Err(source) => {
                        self.transition(command, ProcessState::KillFailed);
                        error!(
                            cmd = %command,
                            timeout_secs,
                            error = %source,
                            "failed to kill timed out command; process may still be running"
                        );
                        Err(UnconvError::Kill {
                            command: command.to_string(),
                            timeout: timeout_secs,
                            source,
                        })
                    }
                }
            }
        }
    }

    /// Kill a timed-out child through the terminator, then reap it.
    async fn stop(&self, child: &mut Child) -> std::io::Result<()> {
        self.terminator.terminate(child)?;
        child.wait().await.map(|_| ())
    }

    fn shell_command(&self, command: &str) -> Command {
        let flag = if cfg!(windows) { "/C" } else { "-c" };

        let mut cmd = Command::new(&self.shell);
        cmd.arg(flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down the whole tree.
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }

    fn transition(&self, command: &str, state: ProcessState) {
        debug!(cmd = %command, %state, "process state");
        if let Some(observer) = &self.observer {
            observer.on_transition(command, state);
        }
    }
}

/// Consume stderr so the pipe never fills, keeping the last few lines.
fn spawn_stderr_drain(stderr: ChildStderr) -> JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

        while let Ok(Some(line)) = lines.next_line().await {
            debug!("stderr: {}", line);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        tail.into()
    })
}

/// A grandchild may keep stderr open after the shell exits, so only wait a
/// short grace period for the drain to finish.
async fn collect_stderr_tail(handle: Option<JoinHandle<Vec<String>>>) -> Vec<String> {
    let Some(mut handle) = handle else {
        return Vec::new();
    };

    match tokio::time::timeout(STDERR_DRAIN_GRACE, &mut handle).await {
        Ok(Ok(tail)) => tail,
        Ok(Err(_)) => Vec::new(),
        Err(_) => {
            handle.abort();
            Vec::new()
        }
    }
}

fn describe_failure(status: ExitStatus, stderr_tail: &[String]) -> String {
    if stderr_tail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", stderr_tail.join("; "))
    }
}

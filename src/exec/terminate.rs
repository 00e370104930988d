// src/exec/terminate.rs

//! How a timed-out child is stopped.
//!
//! The supervisor only decides *when* to stop a child; a [`Terminator`]
//! decides *how*. The supervisor reaps the child afterwards.

use std::io;

use tokio::process::Child;

/// Sends the kill to a timed-out child. Must not block.
pub trait Terminator: Send + Sync {
    /// Ask the OS to stop `child` and everything it started. An error means
    /// the process may still be running.
    fn terminate(&self, child: &mut Child) -> io::Result<()>;
}

/// Kills the child's whole process group on unix (the supervisor starts
/// every child as a group leader), so tools launched by the shell die with
/// it. Elsewhere only the child itself is killed.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupKill;

impl Terminator for GroupKill {
    #[cfg(unix)]
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        // `None` once the child has been reaped; nothing left to signal.
        let Some(pid) = child.id() else {
            return Ok(());
        };
        let pid = i32::try_from(pid).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range"))
        })?;
        killpg(Pid::from_raw(pid), Signal::SIGKILL).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        child.start_kill()
    }
}

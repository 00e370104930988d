// src/exec/observer.rs

use std::fmt;

/// Lifecycle of one supervised command.
///
/// ```text
/// Starting -> Running -> Completed
///                     -> TimedOut -> Killing -> Killed | KillFailed
/// Starting -> LaunchFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Starting,
    Running,
    Completed,
    LaunchFailed,
    TimedOut,
    Killing,
    Killed,
    KillFailed,
}

impl ProcessState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProcessState::Completed
                | ProcessState::LaunchFailed
                | ProcessState::Killed
                | ProcessState::KillFailed
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Starting => "starting",
            ProcessState::Running => "running",
            ProcessState::Completed => "completed",
            ProcessState::LaunchFailed => "launch-failed",
            ProcessState::TimedOut => "timed-out",
            ProcessState::Killing => "killing",
            ProcessState::Killed => "killed",
            ProcessState::KillFailed => "kill-failed",
        };
        f.write_str(name)
    }
}

/// Receives every state transition of supervised commands.
///
/// Transitions are reported while the execution lock is held, so an observer
/// sees the transitions of one command before those of the next.
pub trait ProcessObserver: Send + Sync {
    fn on_transition(&self, command: &str, state: ProcessState);
}

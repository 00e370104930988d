use std::sync::Mutex;

use unconv::exec::{ProcessObserver, ProcessState};

/// An observer that:
/// - records every transition it sees
/// - tracks how many children are alive at once (from `Running` until
///   they complete or are killed), and the highest such count reached.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default)]
struct Recorded {
    transitions: Vec<(String, ProcessState)>,
    running: usize,
    max_running: usize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<(String, ProcessState)> {
        self.inner.lock().unwrap().transitions.clone()
    }

    /// States seen for one command, in order.
    pub fn states_for(&self, command: &str) -> Vec<ProcessState> {
        self.inner
            .lock()
            .unwrap()
            .transitions
            .iter()
            .filter(|(cmd, _)| cmd == command)
            .map(|(_, state)| *state)
            .collect()
    }

    pub fn max_running(&self) -> usize {
        self.inner.lock().unwrap().max_running
    }
}

impl ProcessObserver for RecordingObserver {
    fn on_transition(&self, command: &str, state: ProcessState) {
        let mut guard = self.inner.lock().unwrap();
        match state {
            ProcessState::Running => {
                guard.running += 1;
                guard.max_running = guard.max_running.max(guard.running);
            }
            // The child is gone once it completed or was killed.
            ProcessState::Completed | ProcessState::Killed | ProcessState::KillFailed => {
                guard.running = guard.running.saturating_sub(1);
            }
            _ => {}
        }
        guard.transitions.push((command.to_string(), state));
    }
}

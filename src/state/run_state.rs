/// Run state definitions for the crawl engine
///
/// This module defines the lifecycle of a single crawl run.
use std::fmt;

/// Represents the current state of the crawl engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// No run has been started yet
    #[default]
    Idle,

    /// A run is in progress
    Running,

    // ===== Terminal States =====
    /// The frontier was exhausted
    Completed,

    /// A stop request was honored before the frontier was exhausted
    Stopped,

    /// The run could not produce its output (e.g. report not writable)
    Failed,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    /// Returns true if a run is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Checks whether a transition to `next` is allowed
    ///
    /// Runs start from `Idle` or any terminal state and finish in a terminal
    /// state. Everything else is a programming error.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        match (self, next) {
            (Self::Running, Self::Running) => false,
            (_, Self::Running) => true,
            (Self::Running, n) => n.is_terminal(),
            _ => false,
        }
    }

    /// Lowercase name, as used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

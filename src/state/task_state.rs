/// Task state definitions for tracking a single crawl task
///
/// A crawl task is one (URL, remaining depth) pair. Every task starts in
/// `Created` and ends in `Completed`; there is no retry or re-entry.
use std::fmt;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Initial State =====
    /// Task has been spawned but has not inspected its URL yet
    Created,

    // ===== Short-circuit States =====
    /// Remaining depth is zero; nothing is fetched
    DepthExhausted,

    /// Another task already claimed this URL
    AlreadyVisited,

    // ===== Working States =====
    /// Waiting on the fetcher
    Fetching,

    /// Fetch failed; the subtree below this URL is abandoned
    FetchFailed,

    /// Spawning one child task per discovered URL
    FanningOut,

    /// Waiting for every spawned child to signal completion
    Joining,

    // ===== Terminal State =====
    /// Task is done and has signaled its parent
    Completed,
}

impl TaskState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the task ended without fetching anything
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::DepthExhausted | Self::AlreadyVisited)
    }

    /// Returns true if the task is suspended on an external event
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Fetching | Self::Joining)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Created, DepthExhausted)
                | (Created, AlreadyVisited)
                | (Created, Fetching)
                | (Fetching, FetchFailed)
                | (Fetching, FanningOut)
                | (FanningOut, Joining)
                | (Joining, Completed)
                | (DepthExhausted, Completed)
                | (AlreadyVisited, Completed)
                | (FetchFailed, Completed)
        )
    }

    /// Short lowercase label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::DepthExhausted => "depth_exhausted",
            Self::AlreadyVisited => "already_visited",
            Self::Fetching => "fetching",
            Self::FetchFailed => "fetch_failed",
            Self::FanningOut => "fanning_out",
            Self::Joining => "joining",
            Self::Completed => "completed",
        }
    }

    /// Returns all possible task states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Created,
            Self::DepthExhausted,
            Self::AlreadyVisited,
            Self::Fetching,
            Self::FetchFailed,
            Self::FanningOut,
            Self::Joining,
            Self::Completed,
        ]
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

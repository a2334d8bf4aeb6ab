//! Strongly-typed worker identifier.

use std::fmt;

/// Index of one worker in the group, `0..workers`.
///
/// Worker 0 is the coordinator: it is the root of every reduction and the
/// only worker that reports diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// The coordinating worker.
    pub const COORDINATOR: WorkerId = WorkerId(0);

    /// Raw index of this worker.
    pub fn index(self) -> usize {
        self.0
    }

    /// Whether this worker is [`WorkerId::COORDINATOR`].
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for WorkerId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

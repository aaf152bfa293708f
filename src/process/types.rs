/*!
 * Process Types
 * State tag for the process lifecycle
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
///
/// Legal transitions: `New -> Ready` on arrival, `Ready -> Running` on
/// dispatch, `Running -> Ready` on preemption or quantum expiry, and
/// `Running -> Terminated` once no work remains. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created but not yet arrived
    New,
    /// Arrived and eligible for dispatch
    Ready,
    /// Currently holding the simulated CPU
    Running,
    /// Reserved for I/O modeling, never entered by the dispatch policies
    Waiting,
    /// Finished, absorbing state
    Terminated,
}

impl ProcessState {
    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Check if the state is absorbing
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

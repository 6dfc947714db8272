//! Point-in-time view of a machine for diagnostics.

use super::id::InstanceId;
use super::mode::Mode;
use serde::{Deserialize, Serialize};

/// Serializable summary of an [`Fsm`](super::Fsm).
///
/// Callables are not part of the snapshot, so it cannot rebuild a machine;
/// it exists to be logged or inspected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: InstanceId,
    pub state_count: usize,
    pub current_state: usize,
    pub mode: Mode,
    /// Permitted transitions, in index order
    pub permitted: Vec<(usize, usize)>,
    /// Transitions whose last evaluation passed, in index order
    pub passed: Vec<(usize, usize)>,
    pub ticks: u64,
}

//! Engine lifecycle modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of the engine, distinct from the machine's current state.
///
/// `InitializationPending -> Running -> Disabled`; `Disabled` is terminal and
/// can also be entered straight from `InitializationPending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Waiting for every action and evaluator to be installed
    #[default]
    InitializationPending,
    /// Accepting ticks
    Running,
    /// Stopped by the integrator or by an indexing fault
    Disabled,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializationPending => "InitializationPending",
            Self::Running => "Running",
            Self::Disabled => "Disabled",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

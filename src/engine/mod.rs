//! The engine: lifecycle, configuration surface and the per-tick run loop.
//!
//! # Key Concepts
//!
//! - **Mode**: `InitializationPending` until every callable is installed,
//!   then `Running`, until disabled
//! - **Tick**: run the current state's action, evaluate permitted
//!   candidates in ascending order, commit the first that passes
//! - **Completeness**: every missing callable is reported at once

mod completeness;
mod id;
mod machine;
mod mode;
mod snapshot;

pub use completeness::{check_completeness, MissingCallable};
pub use id::InstanceId;
pub use machine::{Fsm, TickOutcome};
pub use mode::Mode;
pub use snapshot::Snapshot;

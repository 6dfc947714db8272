//! bitfsm: a compact, tick-driven finite state machine engine
//!
//! A machine has at most [`MAX_STATES`] states, numbered from 0. Which
//! transitions are allowed and what their evaluators last reported are kept
//! in two bitsets indexed by a dense `(from, to)` pair numbering, so the
//! whole permission graph of a seven-state machine fits in a single word.
//!
//! # Core Concepts
//!
//! - **Action**: integrator code run once per tick while in a state
//! - **Evaluator**: integrator predicate guarding one `from -> to` transition
//! - **Permission**: a runtime switch deciding whether a transition is a
//!   candidate at all
//! - **Tick**: run the current action, evaluate permitted candidates in
//!   ascending target order, commit the first that passes
//!
//! A machine stays in [`Mode::InitializationPending`] until every action and
//! evaluator is installed, then runs.
//!
//! # Example
//!
//! ```rust
//! use bitfsm::{fsm_states, FsmBuilder, Mode};
//!
//! fsm_states! {
//!     enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! let mut fsm = FsmBuilder::new(Door::COUNT)
//!     .transition(Door::Closed.index(), Door::Open.index(), || true)
//!     .transition(Door::Open.index(), Door::Closed.index(), || false)
//!     .fill_unconfigured()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fsm.mode(), Mode::Running);
//! fsm.tick().unwrap();
//! assert_eq!(Door::try_from(fsm.current_state()), Ok(Door::Open));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use builder::FsmBuilder;
pub use config::FsmConfig;
pub use core::{Action, Evaluator, PermissionSet, TransitionLog, TransitionRecord, MAX_STATES};
pub use engine::{Fsm, InstanceId, MissingCallable, Mode, Snapshot, TickOutcome};
pub use error::{FsmError, Status, StatusExt};

//! Building blocks of the engine.
//!
//! - Pair indexing that maps `(from, to)` onto a dense bit position
//! - The permission graph and evaluation cache, two bitsets sharing that layout
//! - Tables of integrator-supplied actions and evaluators
//! - A bounded log of committed transitions
//!
//! Nothing in this module allocates except the boxed callables themselves.

mod bitset;
mod callable;
mod graph;
mod history;
mod index;
mod outcome;
mod tables;

pub use bitset::PairBitSet;
pub use callable::{Action, Evaluator};
pub use graph::{PermissionSet, TransitionGraph};
pub use history::{TransitionLog, TransitionRecord, LOG_CAPACITY};
pub use index::{
    address, check_state, check_state_count, index, pair, pairs, transition_count, BitAddress,
    IndexError, MAX_STATES, MAX_TRANSITIONS, WORDS, WORD_BITS,
};
pub use outcome::EvaluationCache;
pub use tables::{ActionTable, EvaluatorTable};

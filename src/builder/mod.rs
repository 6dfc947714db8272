//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder and a macro for naming states,
//! so integrators can describe a machine in one expression instead of a
//! sequence of checked setter calls.

pub mod machine;
pub mod macros;

pub use machine::FsmBuilder;

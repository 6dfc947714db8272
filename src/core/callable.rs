//! Behaviour hooks supplied by the integrator.
//!
//! The engine treats both hooks as opaque: it invokes them but never looks
//! at what they do. Actions run once per tick in the current state;
//! evaluators decide whether a single transition's precondition holds.

use std::fmt;

/// Zero-argument callable run while the machine occupies a state.
///
/// # Example
///
/// ```rust
/// use bitfsm::core::Action;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let runs = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&runs);
/// let mut action = Action::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// action.run();
/// action.run();
/// assert_eq!(runs.load(Ordering::SeqCst), 2);
/// ```
pub struct Action {
    body: Box<dyn FnMut() + Send>,
}

impl Action {
    pub fn new<F>(body: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Action {
            body: Box::new(body),
        }
    }

    pub fn run(&mut self) {
        (self.body)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Zero-argument predicate deciding whether one transition may fire.
///
/// Evaluators may keep internal state (counters, sampled inputs), which
/// is why they are `FnMut`.
///
/// # Example
///
/// ```rust
/// use bitfsm::core::Evaluator;
///
/// let mut remaining = 2;
/// let mut settled = Evaluator::new(move || {
///     remaining -= 1;
///     remaining == 0
/// });
///
/// assert!(!settled.evaluate());
/// assert!(settled.evaluate());
/// ```
pub struct Evaluator {
    predicate: Box<dyn FnMut() -> bool + Send>,
}

impl Evaluator {
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        Evaluator {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluator that always passes.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Evaluator that never passes.
    pub fn never() -> Self {
        Self::new(|| false)
    }

    pub fn evaluate(&mut self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Evaluator(..)")
    }
}

//! Installation completeness check.
//!
//! A machine may only start running once every state has an action and
//! every ordered pair has an evaluator. The check accumulates *all* gaps
//! through `Validation` so an integrator sees the whole list at once.

use crate::core::{ActionTable, EvaluatorTable};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A callable the engine expected but could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MissingCallable {
    #[error("state {state} has no action installed")]
    Action { state: usize },

    #[error("transition {from} -> {to} has no evaluator installed")]
    Evaluator { from: usize, to: usize },
}

/// Check that both tables are fully populated.
pub fn check_completeness(
    actions: &ActionTable,
    evaluators: &EvaluatorTable,
) -> Validation<(), NonEmptyVec<MissingCallable>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<MissingCallable>>> = Vec::new();

    for state in actions.missing() {
        checks.push(Validation::fail(MissingCallable::Action { state }));
    }

    for (from, to) in evaluators.missing() {
        checks.push(Validation::fail(MissingCallable::Evaluator { from, to }));
    }

    if checks.is_empty() {
        checks.push(Validation::success(()));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten the check into a plain list, empty when complete.
pub fn missing_callables(actions: &ActionTable, evaluators: &EvaluatorTable) -> Vec<MissingCallable> {
    match check_completeness(actions, evaluators) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().copied().collect(),
    }
}

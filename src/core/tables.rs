//! Fixed tables of installed actions and evaluators.

use super::callable::{Action, Evaluator};
use super::index::{
    check_state, check_state_count, index, pairs, IndexError, MAX_STATES, MAX_TRANSITIONS,
};
use super::outcome::EvaluationCache;

/// One optional [`Action`] per state.
#[derive(Debug, Default)]
pub struct ActionTable {
    state_count: usize,
    slots: [Option<Action>; MAX_STATES],
}

impl ActionTable {
    pub fn new(state_count: usize) -> Result<Self, IndexError> {
        check_state_count(state_count)?;
        Ok(Self {
            state_count,
            ..Self::default()
        })
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Install or replace the action of `state`.
    pub fn set_action(&mut self, state: usize, action: Action) -> Result<(), IndexError> {
        check_state(state, self.state_count)?;
        self.slots[state] = Some(action);
        Ok(())
    }

    /// Run the action of `state`. A state without an action is a no-op.
    ///
    /// Returns whether a callable was actually invoked.
    pub fn run_action(&mut self, state: usize) -> Result<bool, IndexError> {
        check_state(state, self.state_count)?;
        match self.slots[state].as_mut() {
            Some(action) => {
                action.run();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_installed(&self, state: usize) -> Result<bool, IndexError> {
        check_state(state, self.state_count)?;
        Ok(self.slots[state].is_some())
    }

    /// States with no action installed, ascending.
    pub fn missing(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.state_count).filter(move |&state| self.slots[state].is_none())
    }
}

/// One optional [`Evaluator`] per ordered pair, addressed by transition index.
#[derive(Debug)]
pub struct EvaluatorTable {
    state_count: usize,
    slots: [Option<Evaluator>; MAX_TRANSITIONS],
}

impl EvaluatorTable {
    pub fn new(state_count: usize) -> Result<Self, IndexError> {
        check_state_count(state_count)?;
        Ok(Self {
            state_count,
            ..Self::default()
        })
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn set_evaluator(
        &mut self,
        from: usize,
        to: usize,
        evaluator: Evaluator,
    ) -> Result<(), IndexError> {
        let slot = index(from, to, self.state_count)?;
        self.slots[slot] = Some(evaluator);
        Ok(())
    }

    /// Run the evaluator of `from -> to` and record the outcome in `cache`.
    ///
    /// A pair without an evaluator evaluates to Fail, and that Fail is
    /// recorded too.
    pub fn run_evaluator(
        &mut self,
        from: usize,
        to: usize,
        cache: &mut EvaluationCache,
    ) -> Result<bool, IndexError> {
        let slot = index(from, to, self.state_count)?;
        let passed = self.slots[slot]
            .as_mut()
            .is_some_and(|evaluator| evaluator.evaluate());
        cache.record_outcome(from, to, passed)?;
        Ok(passed)
    }

    pub fn is_installed(&self, from: usize, to: usize) -> Result<bool, IndexError> {
        let slot = index(from, to, self.state_count)?;
        Ok(self.slots[slot].is_some())
    }

    /// Pairs with no evaluator installed, in index order.
    pub fn missing(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        pairs(self.state_count)
            .filter(move |&(from, to)| matches!(self.is_installed(from, to), Ok(false)))
    }
}

impl Default for EvaluatorTable {
    fn default() -> Self {
        Self {
            state_count: 0,
            slots: std::array::from_fn(|_| None),
        }
    }
}

//! Builder for constructing state machines.

use crate::config::FsmConfig;
use crate::core::{Action, Evaluator};
use crate::engine::{Fsm, MissingCallable};
use crate::error::FsmError;

/// Builder for constructing an [`Fsm`] with a fluent API.
///
/// Calls are only recorded; [`build`](Self::build) replays them in the
/// order they were made and reports the first invalid one.
///
/// # Example
///
/// ```rust
/// use bitfsm::builder::FsmBuilder;
/// use bitfsm::Mode;
///
/// let mut fsm = FsmBuilder::new(3)
///     .transition(0, 1, || true)
///     .transition(1, 2, || true)
///     .transition(2, 0, || false)
///     .fill_unconfigured()
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.mode(), Mode::Running);
/// fsm.tick().unwrap();
/// fsm.tick().unwrap();
/// assert_eq!(fsm.current_state(), 2);
/// ```
pub struct FsmBuilder {
    config: FsmConfig,
    steps: Vec<Step>,
    fill_unconfigured: bool,
}

/// A recorded builder call.
enum Step {
    Permit { from: usize, to: usize },
    Action { state: usize, action: Action },
    Evaluator { from: usize, to: usize, evaluator: Evaluator },
}

impl FsmBuilder {
    /// Create a builder for a machine with `state_count` states.
    pub fn new(state_count: usize) -> Self {
        Self::from_config(FsmConfig::new(state_count))
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: FsmConfig) -> Self {
        Self {
            config,
            steps: Vec::new(),
            fill_unconfigured: false,
        }
    }

    /// Permit `from -> to` initially.
    pub fn permit(mut self, from: usize, to: usize) -> Self {
        self.steps.push(Step::Permit { from, to });
        self
    }

    /// Set the action run in `state`.
    pub fn action<F>(mut self, state: usize, action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.steps.push(Step::Action {
            state,
            action: Action::new(action),
        });
        self
    }

    /// Set the evaluator of `from -> to` without permitting it.
    pub fn evaluator<F>(mut self, from: usize, to: usize, evaluator: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.steps.push(Step::Evaluator {
            from,
            to,
            evaluator: Evaluator::new(evaluator),
        });
        self
    }

    /// Permit `from -> to` and guard it with `evaluator`.
    pub fn transition<F>(self, from: usize, to: usize, evaluator: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.permit(from, to).evaluator(from, to, evaluator)
    }

    pub fn clear_outcomes_each_tick(mut self, enabled: bool) -> Self {
        self.config.clear_outcomes_each_tick = enabled;
        self
    }

    /// Install a no-op action for every state left without one and a
    /// never-passing evaluator for every pair left without one, so the
    /// machine starts `Running`.
    pub fn fill_unconfigured(mut self) -> Self {
        self.fill_unconfigured = true;
        self
    }

    /// Build the state machine.
    pub fn build(self) -> Result<Fsm, FsmError> {
        let mut fsm = Fsm::from_config(&self.config)?;

        for step in self.steps {
            match step {
                Step::Permit { from, to } => fsm.set_permission(from, to, true)?,
                Step::Action { state, action } => fsm.install_action(state, action)?,
                Step::Evaluator {
                    from,
                    to,
                    evaluator,
                } => fsm.install_evaluator(from, to, evaluator)?,
            }
        }

        if self.fill_unconfigured {
            for missing in fsm.missing_callables() {
                match missing {
                    MissingCallable::Action { state } => {
                        fsm.install_action(state, Action::new(|| {}))?
                    }
                    MissingCallable::Evaluator { from, to } => {
                        fsm.install_evaluator(from, to, Evaluator::never())?
                    }
                }
            }
        }

        Ok(fsm)
    }
}

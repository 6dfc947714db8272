//! The tick-driven state machine engine.

use super::completeness::{check_completeness, missing_callables, MissingCallable};
use super::id::InstanceId;
use super::mode::Mode;
use super::snapshot::Snapshot;
use crate::config::FsmConfig;
use crate::core::{
    Action, ActionTable, EvaluationCache, Evaluator, EvaluatorTable, IndexError, PermissionSet,
    TransitionGraph, TransitionLog, TransitionRecord, MAX_STATES,
};
use crate::error::FsmError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Result of a successful tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// No permitted candidate passed; the machine stays put
    Stayed { state: usize, evaluated: usize },

    /// The first passing candidate was committed
    Transitioned {
        from: usize,
        to: usize,
        evaluated: usize,
    },
}

impl TickOutcome {
    /// State the machine is in after the tick.
    pub fn state(&self) -> usize {
        match self {
            Self::Stayed { state, .. } => *state,
            Self::Transitioned { to, .. } => *to,
        }
    }

    pub fn transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// Number of evaluators run during the tick.
    pub fn evaluated(&self) -> usize {
        match self {
            Self::Stayed { evaluated, .. } | Self::Transitioned { evaluated, .. } => *evaluated,
        }
    }
}

/// A finite state machine with at most [`MAX_STATES`] states.
///
/// Each instance is independent and owned by a single caller. All mutation
/// goes through `&mut self`; share an instance across threads by wrapping
/// it in a `Mutex`.
///
/// # Example
///
/// ```rust
/// use bitfsm::{Fsm, Mode};
///
/// let mut fsm = Fsm::create(2, None).unwrap();
/// fsm.set_action(0, || {}).unwrap();
/// fsm.set_action(1, || {}).unwrap();
/// fsm.set_evaluator(0, 1, || true).unwrap();
/// fsm.set_evaluator(1, 0, || false).unwrap();
/// assert_eq!(fsm.mode(), Mode::Running);
///
/// fsm.set_permission(0, 1, true).unwrap();
/// fsm.tick().unwrap();
/// assert_eq!(fsm.current_state(), 1);
/// ```
#[derive(Debug)]
pub struct Fsm {
    id: InstanceId,
    state_count: usize,
    current: usize,
    mode: Mode,
    graph: TransitionGraph,
    outcomes: EvaluationCache,
    actions: ActionTable,
    evaluators: EvaluatorTable,
    log: TransitionLog,
    ticks: u64,
    clear_outcomes_each_tick: bool,
}

impl Fsm {
    /// An uninitialized machine. Everything but [`initialize`](Self::initialize)
    /// and [`full_reset`](Self::full_reset) fails with `NotInitialized` until
    /// it is initialized.
    pub fn new() -> Self {
        Self::blank(InstanceId::new())
    }

    fn blank(id: InstanceId) -> Self {
        Self {
            id,
            state_count: 0,
            current: 0,
            mode: Mode::InitializationPending,
            graph: TransitionGraph::default(),
            outcomes: EvaluationCache::default(),
            actions: ActionTable::default(),
            evaluators: EvaluatorTable::default(),
            log: TransitionLog::new(),
            ticks: 0,
            clear_outcomes_each_tick: false,
        }
    }

    /// Create a machine with `state_count` states, starting in state 0.
    ///
    /// Without `permissions` every transition starts out denied. A set built
    /// for a different state count is rejected.
    pub fn create(
        state_count: usize,
        permissions: Option<PermissionSet>,
    ) -> Result<Self, FsmError> {
        let mut fsm = Self::new();
        fsm.initialize(state_count, permissions)?;
        Ok(fsm)
    }

    /// Create a machine from a validated configuration.
    pub fn from_config(config: &FsmConfig) -> Result<Self, FsmError> {
        let permissions = config.permission_set()?;
        let mut fsm = Self::create(config.state_count, Some(permissions))?;
        fsm.clear_outcomes_each_tick = config.clear_outcomes_each_tick;
        Ok(fsm)
    }

    /// (Re)create this machine in place.
    ///
    /// Any previous tables, bitsets and history are discarded. On error the
    /// machine is left untouched.
    pub fn initialize(
        &mut self,
        state_count: usize,
        permissions: Option<PermissionSet>,
    ) -> Result<(), FsmError> {
        if state_count == 0 || state_count > MAX_STATES {
            debug!(fsm = %self.id, state_count, "rejected state count");
            return Err(FsmError::InvalidStateCount { state_count });
        }

        let graph = match permissions {
            Some(set) => TransitionGraph::with_permissions(state_count, set)?,
            None => TransitionGraph::new(state_count)?,
        };
        let outcomes = EvaluationCache::new(state_count)?;
        let actions = ActionTable::new(state_count)?;
        let evaluators = EvaluatorTable::new(state_count)?;

        *self = Self {
            state_count,
            graph,
            outcomes,
            actions,
            evaluators,
            ..Self::blank(self.id)
        };

        debug!(
            fsm = %self.id,
            state_count,
            permitted = self.graph.permitted_pairs().count(),
            "state machine created"
        );
        Ok(())
    }

    /// Return to the uninitialized state. Idempotent.
    pub fn full_reset(&mut self) {
        if self.is_initialized() {
            debug!(fsm = %self.id, "state machine reset");
        }
        *self = Self::blank(self.id);
    }

    /// Alias of [`full_reset`](Self::full_reset).
    pub fn destroy(&mut self) {
        self.full_reset();
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.state_count > 0
    }

    /// Number of states; 0 while uninitialized.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn current_state(&self) -> usize {
        self.current
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of completed ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    pub fn clears_outcomes_each_tick(&self) -> bool {
        self.clear_outcomes_each_tick
    }

    /// Clear the evaluation cache at the start of every tick, so outcomes of
    /// candidates skipped after the first Pass never look current.
    pub fn set_clear_outcomes_each_tick(&mut self, enabled: bool) {
        self.clear_outcomes_each_tick = enabled;
    }

    /// Install or replace the action run while in `state`.
    pub fn set_action<F>(&mut self, state: usize, action: F) -> Result<(), FsmError>
    where
        F: FnMut() + Send + 'static,
    {
        self.install_action(state, Action::new(action))
    }

    pub fn install_action(&mut self, state: usize, action: Action) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        self.actions
            .set_action(state, action)
            .map_err(|err| self.rejected("set_action", err))?;
        self.refresh_mode();
        Ok(())
    }

    /// Install or replace the evaluator guarding `from -> to`.
    pub fn set_evaluator<F>(&mut self, from: usize, to: usize, evaluator: F) -> Result<(), FsmError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.install_evaluator(from, to, Evaluator::new(evaluator))
    }

    pub fn install_evaluator(
        &mut self,
        from: usize,
        to: usize,
        evaluator: Evaluator,
    ) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        self.evaluators
            .set_evaluator(from, to, evaluator)
            .map_err(|err| self.rejected("set_evaluator", err))?;
        self.refresh_mode();
        Ok(())
    }

    /// Grant or deny `from -> to`. Takes effect from the next candidate scan.
    pub fn set_permission(&mut self, from: usize, to: usize, granted: bool) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        self.graph
            .set_permission(from, to, granted)
            .map_err(|err| self.rejected("set_permission", err))
    }

    pub fn get_permission(&self, from: usize, to: usize) -> Result<bool, FsmError> {
        self.ensure_initialized()?;
        Ok(self.graph.get_permission(from, to)?)
    }

    /// Every currently permitted transition.
    pub fn permissions(&self) -> Result<PermissionSet, FsmError> {
        self.ensure_initialized()?;
        Ok(self.graph.permission_set())
    }

    /// Last recorded evaluator outcome of `from -> to`.
    pub fn get_outcome(&self, from: usize, to: usize) -> Result<bool, FsmError> {
        self.ensure_initialized()?;
        Ok(self.outcomes.get_outcome(from, to)?)
    }

    pub fn record_outcome(&mut self, from: usize, to: usize, passed: bool) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        self.outcomes
            .record_outcome(from, to, passed)
            .map_err(|err| self.rejected("record_outcome", err))
    }

    /// Reset every cached outcome to Fail.
    pub fn clear_outcomes(&mut self) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        self.outcomes.clear_all();
        Ok(())
    }

    /// Run the action of `state` outside a tick.
    pub fn run_action(&mut self, state: usize) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        let ran = self
            .actions
            .run_action(state)
            .map_err(|err| self.rejected("run_action", err))?;
        if !ran {
            trace!(fsm = %self.id, state, "no action installed");
        }
        Ok(())
    }

    /// Run the evaluator of `from -> to` outside a tick and record its outcome.
    pub fn run_evaluator(&mut self, from: usize, to: usize) -> Result<bool, FsmError> {
        self.ensure_initialized()?;
        self.evaluators
            .run_evaluator(from, to, &mut self.outcomes)
            .map_err(|err| self.rejected("run_evaluator", err))
    }

    /// Permitted targets of the current state, in the order a tick visits them.
    pub fn candidates(&self) -> Result<impl Iterator<Item = usize> + '_, FsmError> {
        self.ensure_initialized()?;
        Ok(self.graph.permitted_targets(self.current)?)
    }

    /// Every action and evaluator still missing before the machine can run.
    pub fn missing_callables(&self) -> Vec<MissingCallable> {
        missing_callables(&self.actions, &self.evaluators)
    }

    /// Stop the machine for good. Further ticks fail with `NotRunning`.
    pub fn disable(&mut self) -> Result<(), FsmError> {
        self.ensure_initialized()?;
        if !self.mode.is_terminal() {
            debug!(fsm = %self.id, from = %self.mode, "state machine disabled");
            self.mode = Mode::Disabled;
        }
        Ok(())
    }

    /// Execute one tick: run the current state's action, then evaluate the
    /// permitted candidates in ascending order and commit the first that
    /// passes.
    ///
    /// Fails without running anything unless the machine is initialized and
    /// [`Running`](Mode::Running).
    pub fn tick(&mut self) -> Result<TickOutcome, FsmError> {
        self.ensure_initialized()?;
        if !self.mode.is_running() {
            debug!(fsm = %self.id, mode = %self.mode, "tick rejected");
            return Err(FsmError::NotRunning { mode: self.mode });
        }

        match self.step() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(fsm = %self.id, error = %err, "indexing fault during tick, disabling");
                self.mode = Mode::Disabled;
                Err(err.into())
            }
        }
    }

    fn step(&mut self) -> Result<TickOutcome, IndexError> {
        let from = self.current;
        if self.clear_outcomes_each_tick {
            self.outcomes.clear_all();
        }

        self.actions.run_action(from)?;

        let mut evaluated = 0;
        let mut selected = None;
        for to in self.graph.permitted_targets(from)? {
            let passed = self
                .evaluators
                .run_evaluator(from, to, &mut self.outcomes)?;
            evaluated += 1;
            trace!(fsm = %self.id, from, to, passed, "evaluated transition");
            if passed {
                selected = Some(to);
                break;
            }
        }

        let tick = self.ticks;
        self.ticks += 1;

        let Some(to) = selected else {
            trace!(fsm = %self.id, state = from, evaluated, "no candidate passed");
            return Ok(TickOutcome::Stayed {
                state: from,
                evaluated,
            });
        };

        self.current = to;
        self.log.record(TransitionRecord {
            from,
            to,
            tick,
            timestamp: Utc::now(),
        });
        debug!(fsm = %self.id, from, to, tick, evaluated, "transition committed");

        Ok(TickOutcome::Transitioned {
            from,
            to,
            evaluated,
        })
    }

    /// Serializable view of the machine for diagnostics.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            id: self.id,
            state_count: self.state_count,
            current_state: self.current,
            mode: self.mode,
            permitted: self.graph.permitted_pairs().collect(),
            passed: self.outcomes.passed_pairs().collect(),
            ticks: self.ticks,
        }
    }

    fn ensure_initialized(&self) -> Result<(), FsmError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(FsmError::NotInitialized)
        }
    }

    fn rejected(&self, operation: &'static str, err: IndexError) -> FsmError {
        debug!(fsm = %self.id, operation, error = %err, "call rejected");
        err.into()
    }

    fn refresh_mode(&mut self) {
        if self.mode == Mode::InitializationPending
            && check_completeness(&self.actions, &self.evaluators).is_success()
        {
            self.mode = Mode::Running;
            debug!(fsm = %self.id, state_count = self.state_count, "all callables installed, running");
        }
    }
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn running(state_count: usize) -> Fsm {
        let mut fsm = Fsm::create(state_count, None).unwrap();
        for state in 0..state_count {
            fsm.set_action(state, || {}).unwrap();
        }
        for (from, to) in pairs(state_count) {
            fsm.set_evaluator(from, to, || false).unwrap();
        }
        fsm
    }

    #[test]
    fn create_starts_pending_in_state_zero() {
        let fsm = Fsm::create(3, None).unwrap();
        assert_eq!(fsm.state_count(), 3);
        assert_eq!(fsm.current_state(), 0);
        assert_eq!(fsm.mode(), Mode::InitializationPending);
        assert_eq!(fsm.missing_callables().len(), 3 + 6);
    }

    #[test]
    fn create_rejects_bad_state_counts() {
        assert_eq!(
            Fsm::create(0, None).unwrap_err(),
            FsmError::InvalidStateCount { state_count: 0 }
        );
        assert_eq!(
            Fsm::create(MAX_STATES + 1, None).unwrap_err(),
            FsmError::InvalidStateCount {
                state_count: MAX_STATES + 1
            }
        );
        assert!(Fsm::create(MAX_STATES, None).is_ok());
    }

    #[test]
    fn installing_everything_starts_the_machine() {
        let fsm = running(3);
        assert_eq!(fsm.mode(), Mode::Running);
        assert!(fsm.missing_callables().is_empty());
    }

    #[test]
    fn tick_before_running_runs_nothing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut fsm = Fsm::create(2, None).unwrap();
        fsm.set_action(0, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(
            fsm.tick(),
            Err(FsmError::NotRunning {
                mode: Mode::InitializationPending
            })
        );
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(fsm.ticks(), 0);
    }

    #[test]
    fn tick_runs_current_action_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut fsm = running(2);
        fsm.set_action(0, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        fsm.tick().unwrap();
        fsm.tick().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(fsm.ticks(), 2);
    }

    #[test]
    fn tick_commits_first_passing_candidate() {
        let mut fsm = running(4);
        fsm.set_evaluator(0, 1, || true).unwrap();
        fsm.set_evaluator(0, 3, || true).unwrap();
        fsm.set_permission(0, 3, true).unwrap();
        fsm.set_permission(0, 1, true).unwrap();

        let outcome = fsm.tick().unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: 0,
                to: 1,
                evaluated: 1
            }
        );
        assert_eq!(fsm.current_state(), 1);
        assert_eq!(fsm.get_outcome(0, 3), Ok(false));
    }

    #[test]
    fn committed_transitions_are_logged() {
        let mut fsm = running(2);
        fsm.set_evaluator(0, 1, || true).unwrap();
        fsm.set_evaluator(1, 0, || true).unwrap();
        fsm.set_permission(0, 1, true).unwrap();
        fsm.set_permission(1, 0, true).unwrap();

        for _ in 0..3 {
            fsm.tick().unwrap();
        }
        assert_eq!(fsm.log().path().collect::<Vec<_>>(), vec![0, 1, 0, 1]);
        assert_eq!(fsm.log().latest().map(|r| r.tick), Some(2));
    }

    #[test]
    fn disable_is_terminal() {
        let mut fsm = running(2);
        fsm.disable().unwrap();
        assert_eq!(fsm.mode(), Mode::Disabled);
        assert!(matches!(fsm.tick(), Err(FsmError::NotRunning { .. })));

        fsm.set_action(0, || {}).unwrap();
        assert_eq!(fsm.mode(), Mode::Disabled);
    }

    #[test]
    fn index_fault_during_tick_disables_machine() {
        let mut fsm = running(2);
        fsm.current = 5;

        assert_eq!(
            fsm.tick(),
            Err(FsmError::StateOutOfRange {
                state: 5,
                state_count: 2
            })
        );
        assert_eq!(fsm.mode(), Mode::Disabled);
        assert_eq!(fsm.ticks(), 0);
        assert!(matches!(fsm.tick(), Err(FsmError::NotRunning { .. })));
    }

    #[test]
    fn pending_machine_can_be_disabled() {
        let mut fsm = Fsm::create(2, None).unwrap();
        fsm.disable().unwrap();
        assert_eq!(fsm.mode(), Mode::Disabled);
    }

    #[test]
    fn uninitialized_machine_rejects_everything() {
        let mut fsm = Fsm::new();
        assert_eq!(fsm.state_count(), 0);
        assert_eq!(fsm.set_action(0, || {}), Err(FsmError::NotInitialized));
        assert_eq!(fsm.set_permission(0, 1, true), Err(FsmError::NotInitialized));
        assert_eq!(fsm.get_outcome(0, 1), Err(FsmError::NotInitialized));
        assert_eq!(fsm.tick(), Err(FsmError::NotInitialized));
        assert_eq!(fsm.disable(), Err(FsmError::NotInitialized));
    }

    #[test]
    fn initialize_replaces_previous_instance_and_keeps_id() {
        let mut fsm = running(3);
        fsm.set_permission(0, 1, true).unwrap();
        let id = fsm.id();

        fsm.initialize(2, None).unwrap();
        assert_eq!(fsm.id(), id);
        assert_eq!(fsm.state_count(), 2);
        assert_eq!(fsm.mode(), Mode::InitializationPending);
        assert_eq!(fsm.get_permission(0, 1), Ok(false));
    }

    #[test]
    fn failed_initialize_leaves_machine_untouched() {
        let mut fsm = running(3);
        fsm.set_permission(2, 1, true).unwrap();

        assert!(fsm.initialize(0, None).is_err());
        assert_eq!(fsm.state_count(), 3);
        assert_eq!(fsm.mode(), Mode::Running);
        assert_eq!(fsm.get_permission(2, 1), Ok(true));
    }

    #[test]
    fn snapshot_reflects_machine() {
        let mut fsm = running(3);
        fsm.set_permission(1, 2, true).unwrap();
        fsm.record_outcome(2, 0, true).unwrap();

        let snapshot = fsm.snapshot();
        assert_eq!(snapshot.state_count, 3);
        assert_eq!(snapshot.mode, Mode::Running);
        assert_eq!(snapshot.permitted, vec![(1, 2)]);
        assert_eq!(snapshot.passed, vec![(2, 0)]);
        assert!(serde_json::to_string(&snapshot).is_ok());
    }

    #[test]
    fn fsm_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Fsm>();
    }
}

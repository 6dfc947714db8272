//! Declarative machine configuration.
//!
//! A configuration describes the shape of a machine (state count and
//! initially permitted transitions) plus engine options. Callables are code
//! and are installed separately.

use crate::core::{check_state_count, PermissionSet};
use crate::error::FsmError;
use serde::{Deserialize, Serialize};

/// Serializable description of a machine.
///
/// # Example
///
/// ```rust
/// use bitfsm::{Fsm, FsmConfig};
///
/// let config = FsmConfig::from_json(r#"{
///     "state_count": 3,
///     "permitted": [[0, 1], [1, 2], [2, 0]]
/// }"#).unwrap();
///
/// let fsm = Fsm::from_config(&config).unwrap();
/// assert!(fsm.get_permission(1, 2).unwrap());
/// assert!(!fsm.get_permission(2, 1).unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FsmConfig {
    /// Number of states, 1 to `MAX_STATES`
    pub state_count: usize,

    /// Initially permitted `[from, to]` pairs
    #[serde(default)]
    pub permitted: Vec<(usize, usize)>,

    /// Clear the evaluation cache at the start of every tick
    #[serde(default)]
    pub clear_outcomes_each_tick: bool,
}

impl FsmConfig {
    pub fn new(state_count: usize) -> Self {
        Self {
            state_count,
            ..Self::default()
        }
    }

    pub fn permit(mut self, from: usize, to: usize) -> Self {
        self.permitted.push((from, to));
        self
    }

    pub fn clear_outcomes_each_tick(mut self, enabled: bool) -> Self {
        self.clear_outcomes_each_tick = enabled;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, FsmError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| FsmError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, FsmError> {
        serde_json::to_string_pretty(self).map_err(|err| FsmError::InvalidConfig(err.to_string()))
    }

    /// Check the state count and every listed pair.
    pub fn validate(&self) -> Result<(), FsmError> {
        self.permission_set().map(|_| ())
    }

    /// Build the initial permission set described by this configuration.
    pub fn permission_set(&self) -> Result<PermissionSet, FsmError> {
        if self.state_count == 0 {
            return Err(FsmError::InvalidStateCount { state_count: 0 });
        }
        check_state_count(self.state_count)?;
        Ok(PermissionSet::with_pairs(
            self.state_count,
            self.permitted.iter().copied(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config = FsmConfig::from_json(r#"{ "state_count": 2 }"#).unwrap();
        assert_eq!(config, FsmConfig::new(2));
        assert!(!config.clear_outcomes_each_tick);
    }

    #[test]
    fn parses_full_config() {
        let config = FsmConfig::from_json(
            r#"{
                "state_count": 4,
                "permitted": [[0, 1], [3, 0]],
                "clear_outcomes_each_tick": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.permitted, vec![(0, 1), (3, 0)]);
        assert!(config.clear_outcomes_each_tick);
        let set = config.permission_set().unwrap();
        assert!(set.contains(3, 0, 4).unwrap());
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let err = FsmConfig::from_json("{ state_count: }").unwrap_err();
        assert!(matches!(err, FsmError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = FsmConfig::from_json(r#"{ "state_count": 2, "priority": [1, 0] }"#).unwrap_err();
        assert!(matches!(err, FsmError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_pairs_are_reported() {
        let err = FsmConfig::new(3).permit(0, 1).permit(1, 3).validate().unwrap_err();
        assert_eq!(
            err,
            FsmError::TransitionOutOfRange {
                from: 1,
                to: 3,
                state_count: 3
            }
        );

        let err = FsmConfig::new(3).permit(2, 2).validate().unwrap_err();
        assert_eq!(err, FsmError::SelfTransition { state: 2 });
    }

    #[test]
    fn state_count_bounds_are_checked() {
        assert_eq!(
            FsmConfig::new(0).validate(),
            Err(FsmError::InvalidStateCount { state_count: 0 })
        );
        assert_eq!(
            FsmConfig::new(8).validate(),
            Err(FsmError::InvalidStateCount { state_count: 8 })
        );
    }

    #[test]
    fn json_round_trip() {
        let config = FsmConfig::new(3)
            .permit(0, 2)
            .permit(2, 1)
            .clear_outcomes_each_tick(true);
        let json = config.to_json().unwrap();
        assert_eq!(FsmConfig::from_json(&json).unwrap(), config);
    }
}

//! Permitted-transition graph.
//!
//! The graph is a directed graph without self-loops, stored as one bit per
//! ordered pair. It can be reshaped at any time, including between ticks of
//! a running machine.

use super::bitset::PairBitSet;
use super::index::{check_state, check_state_count, IndexError, WORDS};
use serde::{Deserialize, Serialize};

/// A set of permitted transitions, used to seed a machine's graph.
///
/// Bits are laid out by [`index`](super::index::index), so a set is only
/// meaningful together with the state count it was built for. Sets built
/// through [`grant`](Self::grant) or [`with_pairs`](Self::with_pairs) remember
/// that count and refuse to seed a machine of any other size.
///
/// # Example
///
/// ```rust
/// use bitfsm::core::PermissionSet;
///
/// let set = PermissionSet::with_pairs(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
/// assert!(set.contains(1, 2, 3).unwrap());
/// assert!(!set.contains(2, 1, 3).unwrap());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionSet {
    /// 0 while unbound
    #[serde(default)]
    state_count: usize,
    bits: PairBitSet,
}

impl PermissionSet {
    /// The fully denied set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw storage words. The result is not bound to a state count.
    pub fn from_words(words: [u64; WORDS]) -> Self {
        Self {
            state_count: 0,
            bits: PairBitSet::from_words(words),
        }
    }

    /// Add `from -> to`, validated against `state_count`. The first grant
    /// binds the set to `state_count`.
    pub fn grant(mut self, from: usize, to: usize, state_count: usize) -> Result<Self, IndexError> {
        self.check_bound(state_count)?;
        self.bits.write(from, to, state_count, true)?;
        self.state_count = state_count;
        Ok(self)
    }

    /// Build a set from a list of pairs. The first invalid pair is reported.
    pub fn with_pairs<I>(state_count: usize, pairs: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        check_state_count(state_count)?;
        let empty = Self {
            state_count,
            ..Self::new()
        };
        pairs
            .into_iter()
            .try_fold(empty, |set, (from, to)| set.grant(from, to, state_count))
    }

    /// State count the set was built for, if any.
    pub fn state_count(&self) -> Option<usize> {
        (self.state_count > 0).then_some(self.state_count)
    }

    fn check_bound(&self, state_count: usize) -> Result<(), IndexError> {
        match self.state_count() {
            Some(built_for) if built_for != state_count => {
                Err(IndexError::PermissionStateCount {
                    built_for,
                    state_count,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, from: usize, to: usize, state_count: usize) -> Result<bool, IndexError> {
        self.bits.read(from, to, state_count)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn words(&self) -> [u64; WORDS] {
        self.bits.words()
    }

    /// Permitted pairs in ascending index order.
    pub fn pairs(&self, state_count: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bits.pairs(state_count)
    }
}

/// Owner of the "permitted" bitset for one machine.
///
/// The default graph has zero states and rejects every lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionGraph {
    state_count: usize,
    permitted: PairBitSet,
}

impl TransitionGraph {
    /// Fully denied graph over `state_count` states.
    pub fn new(state_count: usize) -> Result<Self, IndexError> {
        check_state_count(state_count)?;
        Ok(Self {
            state_count,
            ..Self::default()
        })
    }

    /// Graph seeded from `permissions`, which must be unbound or built for
    /// `state_count`. Bits beyond the index space of `state_count` are
    /// discarded.
    pub fn with_permissions(
        state_count: usize,
        permissions: PermissionSet,
    ) -> Result<Self, IndexError> {
        permissions.check_bound(state_count)?;
        let mut graph = Self::new(state_count)?;
        graph.permitted = permissions.bits;
        graph.permitted.retain_within(state_count);
        Ok(graph)
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn set_permission(&mut self, from: usize, to: usize, granted: bool) -> Result<(), IndexError> {
        self.permitted.write(from, to, self.state_count, granted)
    }

    pub fn get_permission(&self, from: usize, to: usize) -> Result<bool, IndexError> {
        self.permitted.read(from, to, self.state_count)
    }

    /// States reachable from `from` in one permitted step, ascending.
    pub fn permitted_targets(
        &self,
        from: usize,
    ) -> Result<impl Iterator<Item = usize> + '_, IndexError> {
        check_state(from, self.state_count)?;
        Ok((0..self.state_count)
            .filter(move |&to| to != from)
            .filter(move |&to| matches!(self.get_permission(from, to), Ok(true))))
    }

    pub fn permitted_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.permitted.pairs(self.state_count)
    }

    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet {
            state_count: self.state_count,
            bits: self.permitted,
        }
    }

    pub fn deny_all(&mut self) {
        self.permitted.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::{pairs, MAX_STATES};

    #[test]
    fn new_graph_denies_everything() {
        let graph = TransitionGraph::new(MAX_STATES).unwrap();
        for (from, to) in pairs(MAX_STATES) {
            assert_eq!(graph.get_permission(from, to), Ok(false));
        }
    }

    #[test]
    fn set_permission_is_idempotent() {
        let mut graph = TransitionGraph::new(3).unwrap();
        graph.set_permission(0, 2, true).unwrap();
        graph.set_permission(0, 2, true).unwrap();
        assert_eq!(graph.get_permission(0, 2), Ok(true));
        assert_eq!(graph.permitted_pairs().count(), 1);

        graph.set_permission(0, 2, false).unwrap();
        graph.set_permission(0, 2, false).unwrap();
        assert_eq!(graph.get_permission(0, 2), Ok(false));
    }

    #[test]
    fn rejected_set_changes_nothing() {
        let mut graph = TransitionGraph::new(3).unwrap();
        graph.set_permission(1, 0, true).unwrap();
        let before = graph.clone();

        assert_eq!(
            graph.set_permission(5, 6, true),
            Err(IndexError::TransitionOutOfRange {
                from: 5,
                to: 6,
                state_count: 3
            })
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn permitted_targets_are_ascending() {
        let mut graph = TransitionGraph::new(5).unwrap();
        graph.set_permission(2, 4, true).unwrap();
        graph.set_permission(2, 0, true).unwrap();
        graph.set_permission(2, 3, true).unwrap();
        graph.set_permission(1, 2, true).unwrap();

        let targets: Vec<_> = graph.permitted_targets(2).unwrap().collect();
        assert_eq!(targets, vec![0, 3, 4]);
        assert!(graph.permitted_targets(5).is_err());
    }

    #[test]
    fn with_permissions_masks_foreign_bits() {
        let seeded = TransitionGraph::with_permissions(2, PermissionSet::from_words([u64::MAX; WORDS]))
            .unwrap();
        let listed: Vec<_> = seeded.permitted_pairs().collect();
        assert_eq!(listed, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn permission_set_round_trips_through_graph() {
        let set = PermissionSet::with_pairs(4, [(0, 1), (3, 2)]).unwrap();
        let graph = TransitionGraph::with_permissions(4, set).unwrap();
        assert_eq!(graph.permission_set(), set);
    }

    #[test]
    fn permission_set_reports_invalid_pair() {
        let result = PermissionSet::with_pairs(3, [(0, 1), (2, 2)]);
        assert_eq!(result, Err(IndexError::SelfTransition { state: 2 }));
    }

    #[test]
    fn permission_set_remembers_its_state_count() {
        let set = PermissionSet::with_pairs(7, [(0, 6)]).unwrap();
        assert_eq!(set.state_count(), Some(7));
        assert_eq!(PermissionSet::new().state_count(), None);

        assert_eq!(
            TransitionGraph::with_permissions(3, set),
            Err(IndexError::PermissionStateCount {
                built_for: 7,
                state_count: 3
            })
        );
        assert_eq!(
            set.grant(1, 2, 3),
            Err(IndexError::PermissionStateCount {
                built_for: 7,
                state_count: 3
            })
        );
    }

    #[test]
    fn unbound_set_binds_on_first_grant() {
        let set = PermissionSet::new().grant(2, 1, 3).unwrap();
        assert_eq!(set.state_count(), Some(3));

        let graph = TransitionGraph::with_permissions(3, set).unwrap();
        assert_eq!(graph.get_permission(2, 1), Ok(true));
    }

    #[test]
    fn oversized_graph_is_rejected() {
        assert!(TransitionGraph::new(MAX_STATES + 1).is_err());
    }
}

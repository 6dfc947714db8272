//! Cache of the most recent evaluator outcome per transition.

use super::bitset::PairBitSet;
use super::index::{check_state_count, IndexError};

/// One pass/fail bit per ordered pair, laid out exactly like the
/// permission graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationCache {
    state_count: usize,
    passed: PairBitSet,
}

impl EvaluationCache {
    pub fn new(state_count: usize) -> Result<Self, IndexError> {
        check_state_count(state_count)?;
        Ok(Self {
            state_count,
            ..Self::default()
        })
    }

    pub fn record_outcome(&mut self, from: usize, to: usize, passed: bool) -> Result<(), IndexError> {
        self.passed.write(from, to, self.state_count, passed)
    }

    /// Last recorded outcome; `false` if never evaluated or cleared.
    pub fn get_outcome(&self, from: usize, to: usize) -> Result<bool, IndexError> {
        self.passed.read(from, to, self.state_count)
    }

    /// Reset every outcome to Fail.
    pub fn clear_all(&mut self) {
        self.passed.clear_all();
    }

    pub fn passed_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.passed.pairs(self.state_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_default_to_fail() {
        let cache = EvaluationCache::new(4).unwrap();
        assert_eq!(cache.get_outcome(3, 0), Ok(false));
        assert_eq!(cache.passed_pairs().count(), 0);
    }

    #[test]
    fn record_overwrites_previous_outcome() {
        let mut cache = EvaluationCache::new(3).unwrap();
        cache.record_outcome(1, 2, true).unwrap();
        assert_eq!(cache.get_outcome(1, 2), Ok(true));

        cache.record_outcome(1, 2, false).unwrap();
        assert_eq!(cache.get_outcome(1, 2), Ok(false));
    }

    #[test]
    fn clear_all_drops_every_pass() {
        let mut cache = EvaluationCache::new(3).unwrap();
        cache.record_outcome(0, 1, true).unwrap();
        cache.record_outcome(2, 0, true).unwrap();
        cache.clear_all();
        assert_eq!(cache.passed_pairs().count(), 0);
    }

    #[test]
    fn out_of_range_outcome_is_rejected() {
        let mut cache = EvaluationCache::new(2).unwrap();
        assert!(cache.record_outcome(0, 2, true).is_err());
        assert!(cache.get_outcome(2, 0).is_err());
        assert_eq!(cache.passed_pairs().count(), 0);
    }
}

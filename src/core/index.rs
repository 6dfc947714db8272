//! Dense indexing of ordered state pairs.
//!
//! A machine with `n` states has `n * (n - 1)` ordered transitions once
//! self-loops are taken out. Every transition owns exactly one slot in
//! `[0, n * (n - 1))`:
//!
//! ```text
//! rank(from, to)  = to        if to < from
//!                 = to - 1    otherwise
//! index(from, to) = from * (n - 1) + rank(from, to)
//! ```
//!
//! Both the permission bitset and the evaluation bitset are addressed
//! through [`index`], so their bits always line up.

use thiserror::Error;

/// Upper bound on the number of states of a single machine.
///
/// All fixed storage (bitsets, callable tables) is sized from this value.
pub const MAX_STATES: usize = 7;

/// Number of ordered transitions representable at [`MAX_STATES`].
pub const MAX_TRANSITIONS: usize = MAX_STATES * (MAX_STATES - 1);

/// Bits held by one storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Storage words needed to hold [`MAX_TRANSITIONS`] bits.
pub const WORDS: usize = MAX_TRANSITIONS.div_ceil(WORD_BITS);

/// Errors raised while mapping states and transitions onto bit positions.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("state count {state_count} exceeds the maximum of {MAX_STATES}")]
    InvalidStateCount { state_count: usize },

    #[error("state {state} is out of range for {state_count} states")]
    StateOutOfRange { state: usize, state_count: usize },

    #[error("transition {from} -> {to} is out of range for {state_count} states")]
    TransitionOutOfRange {
        from: usize,
        to: usize,
        state_count: usize,
    },

    #[error("self transition {state} -> {state} has no index")]
    SelfTransition { state: usize },

    #[error("permission set built for {built_for} states used with {state_count} states")]
    PermissionStateCount { built_for: usize, state_count: usize },
}

/// Location of a single bit inside a packed `[u64; WORDS]` bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitAddress {
    pub word: usize,
    pub bit: u32,
}

impl BitAddress {
    /// Address of the bit at linear position `index`.
    pub fn of(index: usize) -> Self {
        Self {
            word: index / WORD_BITS,
            bit: (index % WORD_BITS) as u32,
        }
    }

    /// Single-bit mask selecting this address within its word.
    pub fn mask(&self) -> u64 {
        1u64 << self.bit
    }
}

/// Number of ordered transitions (self-loops excluded) for `state_count` states.
pub fn transition_count(state_count: usize) -> usize {
    state_count * state_count.saturating_sub(1)
}

/// Reject state counts that would overflow the fixed storage.
pub fn check_state_count(state_count: usize) -> Result<(), IndexError> {
    if state_count > MAX_STATES {
        return Err(IndexError::InvalidStateCount { state_count });
    }
    Ok(())
}

/// Validate a single state against `state_count`.
pub fn check_state(state: usize, state_count: usize) -> Result<(), IndexError> {
    check_state_count(state_count)?;
    if state >= state_count {
        return Err(IndexError::StateOutOfRange { state, state_count });
    }
    Ok(())
}

/// Linear index of the transition `from -> to`.
///
/// Fails without computing anything if either state is `>= state_count`,
/// if `from == to`, or if `state_count` exceeds [`MAX_STATES`].
///
/// # Example
///
/// ```rust
/// use bitfsm::core::index;
///
/// assert_eq!(index(0, 1, 3), Ok(0));
/// assert_eq!(index(0, 2, 3), Ok(1));
/// assert_eq!(index(1, 0, 3), Ok(2));
/// assert_eq!(index(2, 1, 3), Ok(5));
/// assert!(index(1, 1, 3).is_err());
/// assert!(index(0, 3, 3).is_err());
/// ```
pub fn index(from: usize, to: usize, state_count: usize) -> Result<usize, IndexError> {
    check_state_count(state_count)?;
    if from >= state_count || to >= state_count {
        return Err(IndexError::TransitionOutOfRange {
            from,
            to,
            state_count,
        });
    }
    if from == to {
        return Err(IndexError::SelfTransition { state: from });
    }

    let rank = if to < from { to } else { to - 1 };
    Ok(from * (state_count - 1) + rank)
}

/// Bit address of the transition `from -> to`.
pub fn address(from: usize, to: usize, state_count: usize) -> Result<BitAddress, IndexError> {
    index(from, to, state_count).map(BitAddress::of)
}

/// Inverse of [`index`]: the `(from, to)` pair stored at `index`.
///
/// Returns `None` when `index` lies outside `[0, n * (n - 1))`.
pub fn pair(index: usize, state_count: usize) -> Option<(usize, usize)> {
    if state_count > MAX_STATES || index >= transition_count(state_count) {
        return None;
    }
    let from = index / (state_count - 1);
    let rank = index % (state_count - 1);
    let to = if rank < from { rank } else { rank + 1 };
    Some((from, to))
}

/// All ordered pairs for `state_count` states, in ascending index order.
pub fn pairs(state_count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..state_count)
        .flat_map(move |from| (0..state_count).filter(move |&to| to != from).map(move |to| (from, to)))
}

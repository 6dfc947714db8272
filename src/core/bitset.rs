//! Fixed-capacity bitset over the transition index space.

use super::index::{address, pair, transition_count, BitAddress, IndexError, WORDS, WORD_BITS};
use serde::{Deserialize, Serialize};

/// Packed bitset with one bit per ordered transition.
///
/// The set itself does not know the state count; callers pass it in so the
/// pair is validated and mapped through [`index`](super::index::index).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairBitSet {
    words: [u64; WORDS],
}

impl PairBitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words(words: [u64; WORDS]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> [u64; WORDS] {
        self.words
    }

    /// Read the bit for `from -> to`.
    pub fn read(&self, from: usize, to: usize, state_count: usize) -> Result<bool, IndexError> {
        let addr = address(from, to, state_count)?;
        Ok(self.test(addr))
    }

    /// Write the bit for `from -> to`. Nothing changes if the pair is invalid.
    pub fn write(
        &mut self,
        from: usize,
        to: usize,
        state_count: usize,
        value: bool,
    ) -> Result<(), IndexError> {
        let addr = address(from, to, state_count)?;
        if value {
            self.words[addr.word] |= addr.mask();
        } else {
            self.words[addr.word] &= !addr.mask();
        }
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.words = [0; WORDS];
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Drop every bit at or above the transition count of `state_count`.
    pub fn retain_within(&mut self, state_count: usize) {
        let limit = transition_count(state_count);
        for (i, word) in self.words.iter_mut().enumerate() {
            let base = i * WORD_BITS;
            if base >= limit {
                *word = 0;
            } else if limit - base < WORD_BITS {
                *word &= (1u64 << (limit - base)) - 1;
            }
        }
    }

    /// Pairs whose bit is set, in ascending index order.
    pub fn pairs(&self, state_count: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..transition_count(state_count))
            .filter(move |&i| self.test(BitAddress::of(i)))
            .filter_map(move |i| pair(i, state_count))
    }

    fn test(&self, addr: BitAddress) -> bool {
        self.words[addr.word] & addr.mask() != 0
    }
}

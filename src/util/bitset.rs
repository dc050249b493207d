//! Growable bitset used for atom selections and per-shape "set" masks.

use std::fmt;

const WORD_BITS: usize = 64;

/// A growable set of `usize` indices backed by 64-bit words.
///
/// Reads past the end are `false`; writes past the end grow storage.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with bits `0..n` set.
    #[must_use]
    pub fn all(n: usize) -> Self {
        let mut set = Self {
            words: vec![u64::MAX; n.div_ceil(WORD_BITS)],
        };
        let rem = n % WORD_BITS;
        if rem != 0 {
            if let Some(last) = set.words.last_mut() {
                *last = (1u64 << rem) - 1;
            }
        }
        set
    }

    /// Whether bit `i` is set.
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        self.words
            .get(i / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (i % WORD_BITS)) != 0)
    }

    /// Set bit `i`.
    pub fn set(&mut self, i: usize) {
        let word = i / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (i % WORD_BITS);
    }

    /// Clear bit `i`.
    pub fn clear(&mut self, i: usize) {
        if let Some(w) = self.words.get_mut(i / WORD_BITS) {
            *w &= !(1u64 << (i % WORD_BITS));
        }
    }

    /// Set or clear bit `i`.
    pub fn set_to(&mut self, i: usize, value: bool) {
        if value {
            self.set(i);
        } else {
            self.clear(i);
        }
    }

    /// Clear every bit; storage is released.
    pub fn clear_all(&mut self) {
        self.words.clear();
    }

    /// In-place union.
    pub fn or_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// In-place intersection.
    pub fn and_with(&mut self, other: &Self) {
        for (i, a) in self.words.iter_mut().enumerate() {
            *a &= other.words.get(i).copied().unwrap_or(0);
        }
    }

    /// Number of set bits.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// One past the highest set bit, or 0.
    #[must_use]
    pub fn length(&self) -> usize {
        self.words.iter().rposition(|&w| w != 0).map_or(0, |i| {
            let high = WORD_BITS - self.words[i].leading_zeros() as usize;
            i * WORD_BITS + high
        })
    }

    /// Iterate set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(wi * WORD_BITS + bit)
            })
        })
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for i in iter {
            set.set(i);
        }
        set
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let mut bs = BitSet::new();
        assert!(!bs.get(200));
        bs.set(3);
        bs.set(130);
        assert!(bs.get(3) && bs.get(130));
        assert_eq!(bs.cardinality(), 2);
        assert_eq!(bs.length(), 131);
        bs.clear(130);
        assert_eq!(bs.length(), 4);
        bs.clear(9999);
        assert_eq!(bs.cardinality(), 1);
    }

    #[test]
    fn all_has_exact_length() {
        let bs = BitSet::all(70);
        assert_eq!(bs.cardinality(), 70);
        assert!(bs.get(69));
        assert!(!bs.get(70));
        assert!(BitSet::all(0).is_empty());
    }

    #[test]
    fn iter_is_ascending() {
        let bs: BitSet = [65, 1, 7, 64].into_iter().collect();
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![1, 7, 64, 65]);
    }

    #[test]
    fn union_and_intersection() {
        let mut a: BitSet = [1, 2].into_iter().collect();
        let b: BitSet = [2, 100].into_iter().collect();
        a.or_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 100]);
        let c: BitSet = [2].into_iter().collect();
        a.and_with(&c);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![2]);
    }
}

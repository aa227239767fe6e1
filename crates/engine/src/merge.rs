//! Duplicate removal across concatenated group results.

use core::hash::Hash;
use rustc_hash::FxHashMap;

/// Identity handed to a node the first time a merge pass meets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupToken(u64);

/// Out-of-band node-to-token map for one merge pass. Nodes themselves are
/// never touched.
#[derive(Clone, Debug)]
pub struct DedupTokens<H: Eq + Hash + Copy> {
    counter: u64,
    map: FxHashMap<H, DedupToken>,
}

impl<H: Eq + Hash + Copy> Default for DedupTokens<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Eq + Hash + Copy> DedupTokens<H> {
    pub fn new() -> Self {
        Self {
            counter: 1,
            map: FxHashMap::default(),
        }
    }

    /// Get the token for a node, minting one if not present.
    #[inline]
    pub fn key_of(&mut self, node: H) -> DedupToken {
        *self.map.entry(node).or_insert_with(|| {
            let token = DedupToken(self.counter);
            self.counter = self.counter.wrapping_add(1);
            token
        })
    }

    /// Mint a token for `node` and report whether it was new.
    #[inline]
    pub fn first_seen(&mut self, node: H) -> bool {
        let before = self.counter;
        self.key_of(node);
        self.counter != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Keep the first occurrence of every node, preserving first-seen order.
pub fn merge_unique<H, I>(nodes: I) -> Vec<H>
where
    H: Eq + Hash + Copy,
    I: IntoIterator<Item = H>,
{
    let mut tokens = DedupTokens::new();
    nodes
        .into_iter()
        .filter(|&node| tokens.first_seen(node))
        .collect()
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Solution tree: a trie of already-returned routes, keyed by
//! `(vertex, airway)` steps (spec.md §3, §4.G).

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;

use crate::graph::AirwayIndex;

/// One step of a recorded route: the vertex reached, and the airway
/// index of the edge used to reach it.
pub type Step = (NodeIndex, AirwayIndex);

#[derive(Default)]
struct TrieNode {
    children: HashMap<Step, usize>,
    terminal: bool,
}

/// Records every route the k-shortest-path loop has already emitted,
/// so enumeration never repeats one (spec.md P5) and so the loop can
/// find, for any prefix, which branches have already been explored.
#[derive(Default)]
pub struct SolutionTree {
    arena: Vec<TrieNode>,
}

impl SolutionTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: vec![TrieNode::default()],
        }
    }

    /// Insert `path`. Returns `true` if this is the first time this
    /// exact route has been recorded, `false` if it was already present
    /// (spec.md P5: "already-present" on the second insertion).
    pub fn insert(&mut self, path: &[Step]) -> bool {
        let mut cur = 0;
        for &step in path {
            cur = *self.arena[cur].children.entry(step).or_insert_with(|| {
                self.arena.push(TrieNode::default());
                self.arena.len() - 1
            });
        }
        let already = self.arena[cur].terminal;
        self.arena[cur].terminal = true;
        !already
    }

    #[must_use]
    pub fn contains(&self, path: &[Step]) -> bool {
        let mut cur = 0;
        for &step in path {
            match self.arena[cur].children.get(&step) {
                Some(&next) => cur = next,
                None => return false,
            }
        }
        self.arena[cur].terminal
    }

    /// Every branch recorded immediately after `prefix` (spec.md §4.G:
    /// "for every branch the solution tree records from the prefix
    /// endpoint, temporarily disable that branch").
    #[must_use]
    pub fn branches_from(&self, prefix: &[Step]) -> Vec<Step> {
        let mut cur = 0;
        for &step in prefix {
            match self.arena[cur].children.get(&step) {
                Some(&next) => cur = next,
                None => return Vec::new(),
            }
        }
        self.arena[cur].children.keys().copied().collect()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(TrieNode::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(v: usize, airway: AirwayIndex) -> Step {
        (NodeIndex::new(v), airway)
    }

    #[test]
    fn inserting_the_same_route_twice_reports_already_present() {
        let mut tree = SolutionTree::new();
        let path = vec![step(0, AirwayIndex::SID), step(1, AirwayIndex::DCT)];
        assert!(tree.insert(&path));
        assert!(!tree.insert(&path));
    }

    #[test]
    fn branches_from_prefix_lists_recorded_continuations() {
        let mut tree = SolutionTree::new();
        let prefix = vec![step(0, AirwayIndex::SID)];
        let mut a = prefix.clone();
        a.push(step(1, AirwayIndex::DCT));
        let mut b = prefix.clone();
        b.push(step(2, AirwayIndex::DCT));
        tree.insert(&a);
        tree.insert(&b);
        let mut branches = tree.branches_from(&prefix);
        branches.sort_by_key(|&(v, _)| v.index());
        assert_eq!(branches, vec![step(1, AirwayIndex::DCT), step(2, AirwayIndex::DCT)]);
    }

    #[test]
    fn unknown_prefix_has_no_branches() {
        let tree = SolutionTree::new();
        assert!(tree.branches_from(&[step(9, AirwayIndex::DCT)]).is_empty());
    }
}

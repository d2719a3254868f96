// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Solution pool: an ordered set of candidate routes keyed by
//! `(metric, lexicographic path)` (spec.md §3, §4.G).

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use super::solution_tree::Step;

/// A candidate route: its total metric and the `(vertex, airway)` steps
/// from the prefix point (or the departure) to the destination.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub metric: f64,
    pub steps: Vec<Step>,
    /// Cumulative metric through each step in `steps`, same length and
    /// order; lets the k-shortest-path loop cost a prefix without
    /// re-walking it.
    pub cumulative: Vec<f64>,
}

#[derive(Clone, Eq, PartialEq)]
struct PoolKey {
    metric: OrderedFloat<f64>,
    lex: Vec<(u32, u32)>,
}

impl PoolKey {
    fn of(candidate: &Candidate) -> Self {
        Self {
            metric: OrderedFloat(candidate.metric),
            lex: candidate
                .steps
                .iter()
                .map(|&(v, a)| (u32::try_from(v.index()).unwrap_or(u32::MAX), awy_key(a)))
                .collect(),
        }
    }
}

fn awy_key(a: crate::graph::AirwayIndex) -> u32 {
    a.raw()
}

impl PartialOrd for PoolKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PoolKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.metric
            .cmp(&other.metric)
            .then_with(|| self.lex.cmp(&other.lex))
    }
}

struct Entry {
    key: PoolKey,
    candidate: Candidate,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Bounded ordered set of pending k-shortest-path candidates (spec.md
/// §4.G: "Bound the pool size to a fixed maximum... discarding the
/// worst and any stale entries").
pub struct SolutionPool {
    entries: BTreeSet<Entry>,
    max_size: usize,
}

impl SolutionPool {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: BTreeSet::new(),
            max_size,
        }
    }

    pub fn insert(&mut self, candidate: Candidate) {
        self.entries.insert(Entry {
            key: PoolKey::of(&candidate),
            candidate,
        });
        while self.entries.len() > self.max_size {
            let worst = self.entries.iter().next_back().map(|e| e.key.clone());
            if let Some(key) = worst {
                self.entries.retain(|e| e.key != key);
            } else {
                break;
            }
        }
    }

    /// Remove and return the cheapest remaining candidate.
    pub fn pop_best(&mut self) -> Option<Candidate> {
        self.entries.pop_first().map(|e| e.candidate)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

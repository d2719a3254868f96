// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Multi-level search: Dijkstra core, mandatory-sequence planner and
//! the k-shortest-path loop (spec.md §4.E, §4.F, §4.G).

pub mod dijkstra;
pub mod kshortest;
pub mod mandatory;
pub mod solution_pool;
pub mod solution_tree;

pub use dijkstra::{DijkstraState, SearchNode};
pub use kshortest::KShortestLoop;
pub use mandatory::{MandatoryAlternative, MandatorySequence, SequenceStep};
pub use solution_pool::Candidate;
pub use solution_tree::SolutionTree;

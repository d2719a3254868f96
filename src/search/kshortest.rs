// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Yen-style k-shortest-path enumeration driving proposals to the
//! validator (spec.md §4.G, component G).

use petgraph::stable_graph::NodeIndex;

use super::dijkstra::{self, DijkstraState};
use super::mandatory::{self, MandatoryAlternative};
use super::solution_pool::{Candidate, SolutionPool};
use super::solution_tree::{SolutionTree, Step};
use crate::graph::LGraph;
use crate::perf::Performance;

/// Drives the Yen-style enumeration loop of spec.md §4.G.
pub struct KShortestLoop {
    pool: SolutionPool,
    tree: SolutionTree,
}

impl KShortestLoop {
    #[must_use]
    pub fn new(pool_max_size: usize) -> Self {
        Self {
            pool: SolutionPool::new(pool_max_size),
            tree: SolutionTree::new(),
        }
    }

    /// Called whenever the graph is mutated (spec.md §3's "modified"
    /// hook): flush the pool and solution tree so stale candidates are
    /// never returned.
    pub fn on_graph_modified(&mut self) {
        self.pool.clear();
        self.tree.clear();
    }

    /// The initial iteration: Dijkstra from `dep` to `dest` honouring
    /// the mandatory-crossing list, recorded in the solution tree.
    pub fn initial(
        &mut self,
        graph: &LGraph,
        perf: &dyn Performance,
        dep: NodeIndex,
        dest: NodeIndex,
        mandatory: Vec<MandatoryAlternative>,
    ) -> Option<Candidate> {
        let mut state = DijkstraState::seeded(graph, dep, 0);
        dijkstra::run(graph, perf, &mut state);
        let state = mandatory::plan(graph, state, mandatory)?;
        let path = state.path_with_distance(dest)?;
        let (steps, cumulative) = steps_and_cumulative(graph, &path);
        let metric = cumulative.last().copied().unwrap_or(0.0);
        self.tree.insert(&steps);
        Some(Candidate {
            metric,
            steps,
            cumulative,
        })
    }

    /// One subsequent iteration (spec.md §4.G): pop the best pending
    /// route, branch at every prefix, and refill the pool. Returns the
    /// popped route, or `None` when the pool is exhausted.
    pub fn next(
        &mut self,
        graph: &LGraph,
        perf: &dyn Performance,
        dest: NodeIndex,
    ) -> Option<Candidate> {
        let route = loop {
            let candidate = self.pool.pop_best()?;
            if route_exists(graph, &candidate) {
                break candidate;
            }
            // stale: the graph was mutated since this candidate was
            // queued; drop it and try the next.
        };
        self.tree.insert(&route.steps);

        for i in 0..route.steps.len() {
            let prefix = &route.steps[..i];
            let prefix_cost = if i == 0 { 0.0 } else { route.cumulative[i - 1] };
            let (prefix_end, _) = prefix.last().copied().unwrap_or((dest, crate::graph::AirwayIndex::DCT));
            let disabled_branches = self.tree.branches_from(prefix);
            let same_ident_exclusions: Vec<NodeIndex> = graph
                .vertex_indices()
                .filter(|&v| {
                    graph
                        .vertex(v)
                        .zip(graph.vertex(prefix_end))
                        .is_some_and(|(a, b)| a.ident == b.ident)
                })
                .collect();

            if let Some(candidate) = self.deviate(
                graph,
                perf,
                prefix,
                &route.cumulative[..i],
                prefix_cost,
                prefix_end,
                dest,
                &disabled_branches,
                &same_ident_exclusions,
            ) {
                self.pool.insert(candidate);
            }
        }
        Some(route)
    }

    #[allow(clippy::too_many_arguments)]
    fn deviate(
        &self,
        graph: &LGraph,
        perf: &dyn Performance,
        prefix: &[Step],
        prefix_cumulative: &[f64],
        prefix_cost: f64,
        prefix_end: NodeIndex,
        dest: NodeIndex,
        disabled_branches: &[Step],
        same_ident_exclusions: &[NodeIndex],
    ) -> Option<Candidate> {
        let mut state = DijkstraState::seeded(graph, prefix_end, 0);
        dijkstra::run_excluding(graph, perf, &mut state, disabled_branches, same_ident_exclusions);
        let tail = state.path_with_distance(dest)?;
        let mut steps: Vec<Step> = prefix.to_vec();
        let mut cumulative: Vec<f64> = prefix_cumulative.to_vec();
        for &(v, _, edge, dist) in tail.iter().skip(1) {
            steps.push((
                v,
                edge.and_then(|e| graph.edge(e))
                    .map_or(crate::graph::AirwayIndex::MATCHNONE, |e| e.airway),
            ));
            cumulative.push(prefix_cost + dist);
        }
        if self.tree.contains(&steps) {
            return None;
        }
        let metric = cumulative.last().copied().unwrap_or(prefix_cost);
        Some(Candidate {
            metric,
            steps,
            cumulative,
        })
    }
}

fn steps_and_cumulative(
    graph: &LGraph,
    path: &[(NodeIndex, usize, Option<petgraph::stable_graph::EdgeIndex>, f64)],
) -> (Vec<Step>, Vec<f64>) {
    let mut steps = Vec::new();
    let mut cumulative = Vec::new();
    for &(v, _, edge, dist) in path.iter().skip(1) {
        steps.push((
            v,
            edge.and_then(|e| graph.edge(e))
                .map_or(crate::graph::AirwayIndex::MATCHNONE, |e| e.airway),
        ));
        cumulative.push(dist);
    }
    (steps, cumulative)
}

fn route_exists(graph: &LGraph, candidate: &Candidate) -> bool {
    let mut cur: Option<NodeIndex> = None;
    for &(v, _) in &candidate.steps {
        if graph.vertex(v).is_none() {
            return false;
        }
        cur = Some(v);
    }
    cur.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData};
    use crate::geom::{Length, Point};
    use crate::graph::{AirwayIndex, Edge, Vertex};
    use crate::perf::{CruiseLevel, Wind};

    struct FlatPerf;
    impl Performance for FlatPerf {
        fn level_count(&self) -> usize {
            1
        }
        fn level(&self, _index: usize) -> CruiseLevel {
            CruiseLevel(100)
        }
        fn tas_kt(&self, _index: usize) -> f64 {
            420.0
        }
        fn metric_per_nmi(&self, _index: usize) -> f64 {
            1.0
        }
        fn wind(&self, _point: Point, _index: usize) -> Option<Wind> {
            None
        }
        fn level_change_metric(&self, _from: usize, _to: usize) -> f64 {
            0.0
        }
        fn level_change_min_track_nm(&self, _from: usize, _to: usize) -> f64 {
            0.0
        }
    }

    fn vertex(ident: &str) -> Vertex {
        let handle = DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
        }));
        Vertex::new(handle)
    }

    #[test]
    fn initial_iteration_finds_a_route_and_records_it() {
        let mut g = LGraph::new();
        let dep = g.add_vertex(vertex("VDEP"));
        let dest = g.add_vertex(vertex("VDEST"));
        let mut e = Edge::new(AirwayIndex::DCT, 1, Length::nm(50.0), 90.0);
        e.set_metric(0, 50.0);
        g.add_edge(dep, dest, e);

        let perf = FlatPerf;
        let mut loop_ = KShortestLoop::new(16);
        let route = loop_.initial(&g, &perf, dep, dest, Vec::new()).unwrap();
        assert!((route.metric - 50.0).abs() < 1e-9);
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Multi-level Dijkstra core (spec.md §4.E, component E).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use crate::graph::{AirwayIndex, LGraph};
use crate::perf::Performance;

/// A search node: a vertex at a specific rung of the cruise-level
/// ladder (the `(vertex, level)` product space of spec.md §4.E).
pub type SearchNode = (NodeIndex, usize);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NodeColor {
    White,
    Gray,
    Black,
}

#[derive(Clone, Debug)]
struct NodeState {
    distance: f64,
    pred: Option<SearchNode>,
    pred_edge: Option<EdgeIndex>,
    color: NodeColor,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            distance: f64::INFINITY,
            pred: None,
            pred_edge: None,
            color: NodeColor::White,
        }
    }
}

/// The full state vector of one Dijkstra run: per-`(vertex, level)`
/// distance/predecessor/colour, plus the priority queue (spec.md §4.E,
/// §9's "lexicographic (distance, vertex, level) ordering").
#[derive(Clone)]
pub struct DijkstraState {
    nodes: HashMap<SearchNode, NodeState>,
    queue: BinaryHeap<Reverse<(OrderedFloat<f64>, usize, usize)>>,
}

impl DijkstraState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    /// Seed `source` at level 0 with distance zero, gray.
    #[must_use]
    pub fn seeded(_graph: &LGraph, source: NodeIndex, level: usize) -> Self {
        let mut state = Self::new();
        state.seed(source, level);
        state
    }

    pub fn seed(&mut self, source: NodeIndex, level: usize) {
        self.nodes.insert(
            (source, level),
            NodeState {
                distance: 0.0,
                pred: None,
                pred_edge: None,
                color: NodeColor::Gray,
            },
        );
        self.push(source, level, 0.0);
    }

    fn push(&mut self, v: NodeIndex, level: usize, distance: f64) {
        self.queue
            .push(Reverse((OrderedFloat(distance), v.index(), level)));
    }

    fn get(&self, node: SearchNode) -> NodeState {
        self.nodes.get(&node).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn best_distance(&self, v: NodeIndex) -> Option<f64> {
        self.nodes
            .iter()
            .filter(|(&(nv, _), s)| nv == v && s.color != NodeColor::White)
            .map(|(_, s)| s.distance)
            .min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn best_node(&self, v: NodeIndex) -> Option<SearchNode> {
        self.nodes
            .iter()
            .filter(|(&(nv, _), s)| nv == v && s.color != NodeColor::White)
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
            .map(|(&k, _)| k)
    }

    /// Reset every node to white/infinite/self-pred, discarding all
    /// progress (spec.md §4.E support op).
    pub fn mark_all_white(&mut self) {
        self.nodes.clear();
        self.queue.clear();
    }

    /// Reset every white node's distance to infinity (no-op here since
    /// unvisited nodes already default to infinite; provided for
    /// symmetry with the other bulk-reset ops, spec.md §4.E).
    pub fn mark_white_infinite(&mut self) {}

    /// Reset every white node to self-predecessor (no-op here for the
    /// same reason as [`Self::mark_white_infinite`]).
    pub fn mark_white_selfpred(&mut self) {}

    /// Combination reset used between mandatory-sequence stages
    /// (spec.md §4.F step 3/b).
    pub fn mark_white_infinite_selfpred(&mut self) {
        self.mark_white_infinite();
        self.mark_white_selfpred();
    }

    /// Walk predecessors from `v`'s best-known node back to the
    /// source, colouring the path black and the leaf gray (spec.md
    /// §4.E's `mark_path`).
    pub fn mark_path(&mut self, graph: &LGraph, v: NodeIndex) {
        let Some(leaf) = self.best_node(v) else {
            return;
        };
        self.mark_path_node(graph, leaf);
    }

    /// As [`Self::mark_path`], but only considers the best node for
    /// `v` whose level falls within `band` (spec.md §4.F step 4.b).
    pub fn mark_path_within_band(&mut self, graph: &LGraph, v: NodeIndex, band: (usize, usize)) {
        let candidate = self
            .nodes
            .iter()
            .filter(|(&(nv, level), s)| {
                nv == v && s.color != NodeColor::White && level >= band.0 && level <= band.1
            })
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
            .map(|(&k, _)| k);
        if let Some(leaf) = candidate {
            self.mark_path_node(graph, leaf);
        }
    }

    fn mark_path_node(&mut self, _graph: &LGraph, leaf: SearchNode) {
        let mut cur = Some(leaf);
        let mut first = true;
        while let Some(node) = cur {
            let pred = self.nodes.get(&node).and_then(|s| s.pred);
            if let Some(entry) = self.nodes.get_mut(&node) {
                entry.color = if first { NodeColor::Gray } else { NodeColor::Black };
            }
            first = false;
            cur = pred;
        }
    }

    /// Import gray-frontier entries from `other` whenever they improve
    /// on this state's distance (spec.md §4.E's `copy_gray_paths`).
    pub fn copy_gray_paths(&mut self, other: &Self) {
        for (&node, incoming) in &other.nodes {
            if incoming.color != NodeColor::Gray {
                continue;
            }
            let better = match self.nodes.get(&node) {
                Some(existing) => incoming.distance < existing.distance,
                None => true,
            };
            if better {
                self.nodes.insert(node, incoming.clone());
                self.push(node.0, node.1, incoming.distance);
            }
        }
    }

    /// Rebuild the priority queue from the current gray frontier, after
    /// bulk state edits (spec.md §4.E's `rebuild_queue`).
    pub fn rebuild_queue(&mut self) {
        self.queue.clear();
        for (&node, state) in &self.nodes {
            if state.color == NodeColor::Gray {
                self.push(node.0, node.1, state.distance);
            }
        }
    }

    fn path_contains_ident(&self, graph: &LGraph, mut node: SearchNode, ident: &str) -> bool {
        loop {
            if graph.vertex(node.0).is_some_and(|v| v.ident == ident) {
                return true;
            }
            match self.nodes.get(&node).and_then(|s| s.pred) {
                Some(pred) => node = pred,
                None => return false,
            }
        }
    }

    /// Walk predecessors from `dest`'s best node back to the source,
    /// returning the path in travel order as `(vertex, level, incoming
    /// edge)` triples (the edge is `None` only for the source).
    #[must_use]
    pub fn path_to(&self, dest: NodeIndex) -> Option<Vec<(NodeIndex, usize, Option<EdgeIndex>)>> {
        self.path_with_distance(dest)
            .map(|p| p.into_iter().map(|(v, l, e, _)| (v, l, e)).collect())
    }

    /// As [`Self::path_to`], but each step also carries the cumulative
    /// distance from the seed up to and including that step — used by
    /// the k-shortest-path loop to cost a prefix without re-walking it
    /// (spec.md §4.G).
    #[must_use]
    pub fn path_with_distance(
        &self,
        dest: NodeIndex,
    ) -> Option<Vec<(NodeIndex, usize, Option<EdgeIndex>, f64)>> {
        let mut node = self.best_node(dest)?;
        let mut rev = Vec::new();
        loop {
            let state = self.nodes.get(&node)?;
            rev.push((node.0, node.1, state.pred_edge, state.distance));
            match state.pred {
                Some(pred) => node = pred,
                None => break,
            }
        }
        rev.reverse();
        Some(rev)
    }
}

impl Default for DijkstraState {
    fn default() -> Self {
        Self::new()
    }
}

/// Relax `u`'s out-edges, the inner loop of spec.md §4.E.
///
/// `airway_filter`, when given, restricts relaxation to edges matching
/// that airway wildcard (used by the mandatory-sequence planner's
/// per-step constrained runs).
fn relax(
    graph: &LGraph,
    perf: &dyn Performance,
    state: &mut DijkstraState,
    u: SearchNode,
    airway_filter: Option<AirwayIndex>,
) {
    let u_state = state.get(u);
    for eidx in graph.out_edges(u.0) {
        let Some((_, w)) = graph.edge_endpoints(eidx) else {
            continue;
        };
        let Some(edge) = graph.edge(eidx) else { continue };
        if let Some(pattern) = airway_filter {
            if !edge.airway.matches(pattern) {
                continue;
            }
        }
        for piv in 0..edge.level_count() {
            if !graph.is_valid_connection(eidx, u.1, piv) {
                continue;
            }
            if u.1 != piv {
                let track_needed = perf.level_change_min_track_nm(u.1, piv);
                if track_needed > edge.distance.value_nm() {
                    continue;
                }
            }
            let (pic_from, pic_to) = if edge.airway.is_sid() {
                // The climb to piv happens on the SID itself; no
                // additional level-change cost at the graph level.
                (piv, piv)
            } else if edge.airway.is_star() {
                // Symmetric: the descent from piu happens on the STAR.
                (u.1, u.1)
            } else {
                (u.1, piv)
            };
            let cruise = edge.metric_at(piv);
            let level_change = perf.level_change_metric(pic_from, pic_to);
            let new_distance = u_state.distance + cruise + level_change;
            if !new_distance.is_finite() {
                continue;
            }
            let w_node = (w, piv);
            if state.path_contains_ident(graph, u, graph.vertex(w).map_or("", |v| v.ident.as_str()))
            {
                continue;
            }
            let w_state = state.get(w_node);
            if new_distance < w_state.distance {
                state.nodes.insert(
                    w_node,
                    NodeState {
                        distance: new_distance,
                        pred: Some(u),
                        pred_edge: Some(eidx),
                        color: NodeColor::Gray,
                    },
                );
                state.push(w, piv, new_distance);
            }
        }
    }
}

/// Run Dijkstra to completion from whatever is already seeded in
/// `state` (spec.md §4.E).
pub fn run(graph: &LGraph, perf: &dyn Performance, state: &mut DijkstraState) {
    while let Some(Reverse((OrderedFloat(dist), vidx, level))) = state.queue.pop() {
        let u = (NodeIndex::new(vidx), level);
        let u_state = state.get(u);
        if u_state.color == NodeColor::Black || u_state.distance < dist {
            continue;
        }
        if let Some(entry) = state.nodes.get_mut(&u) {
            entry.color = NodeColor::Black;
        }
        relax(graph, perf, state, u, None);
    }
}

/// As [`run`], but `disabled_branches` (specific `(vertex, airway)`
/// continuations already present in the solution tree) are never
/// relaxed into, and no vertex in `excluded_idents` may be relaxed at
/// all — the two exclusion mechanisms spec.md §4.G uses per prefix
/// during k-shortest-path deviation.
pub fn run_excluding(
    graph: &LGraph,
    perf: &dyn Performance,
    state: &mut DijkstraState,
    disabled_branches: &[(NodeIndex, AirwayIndex)],
    excluded_idents: &[NodeIndex],
) {
    while let Some(Reverse((OrderedFloat(dist), vidx, level))) = state.queue.pop() {
        let u = (NodeIndex::new(vidx), level);
        let u_state = state.get(u);
        if u_state.color == NodeColor::Black || u_state.distance < dist {
            continue;
        }
        if let Some(entry) = state.nodes.get_mut(&u) {
            entry.color = NodeColor::Black;
        }
        relax_excluding(graph, perf, state, u, disabled_branches, excluded_idents);
    }
}

fn relax_excluding(
    graph: &LGraph,
    perf: &dyn Performance,
    state: &mut DijkstraState,
    u: SearchNode,
    disabled_branches: &[(NodeIndex, AirwayIndex)],
    excluded_idents: &[NodeIndex],
) {
    let u_state = state.get(u);
    for eidx in graph.out_edges(u.0) {
        let Some((_, w)) = graph.edge_endpoints(eidx) else {
            continue;
        };
        let Some(edge) = graph.edge(eidx) else { continue };
        if disabled_branches.iter().any(|&(bv, ba)| bv == w && edge.airway.matches(ba)) {
            continue;
        }
        if excluded_idents.iter().any(|&ex| {
            graph.vertex(ex).zip(graph.vertex(w)).is_some_and(|(a, b)| a.ident == b.ident)
        }) {
            continue;
        }
        for piv in 0..edge.level_count() {
            if !graph.is_valid_connection(eidx, u.1, piv) {
                continue;
            }
            if u.1 != piv {
                let track_needed = perf.level_change_min_track_nm(u.1, piv);
                if track_needed > edge.distance.value_nm() {
                    continue;
                }
            }
            let new_distance = u_state.distance + edge.metric_at(piv)
                + perf.level_change_metric(u.1, piv);
            if !new_distance.is_finite() {
                continue;
            }
            let w_node = (w, piv);
            let w_state = state.get(w_node);
            if new_distance < w_state.distance {
                state.nodes.insert(
                    w_node,
                    NodeState {
                        distance: new_distance,
                        pred: Some(u),
                        pred_edge: Some(eidx),
                        color: NodeColor::Gray,
                    },
                );
                state.push(w, piv, new_distance);
            }
        }
    }
}

/// As [`run`], but only relaxes edges matching `airway` — used for a
/// single mandatory-sequence step (spec.md §4.F step 4.b; DCT steps
/// relax exactly one synthesised edge).
pub fn run_constrained(graph: &LGraph, state: &mut DijkstraState, airway: AirwayIndex) {
    while let Some(Reverse((OrderedFloat(dist), vidx, level))) = state.queue.pop() {
        let u = (NodeIndex::new(vidx), level);
        let u_state = state.get(u);
        if u_state.color == NodeColor::Black || u_state.distance < dist {
            continue;
        }
        if let Some(entry) = state.nodes.get_mut(&u) {
            entry.color = NodeColor::Black;
        }
        relax_with_perf_stub(graph, state, u, airway);
    }
}

/// The constrained single-airway relaxation used by the mandatory
/// planner does not need level-change costing (each step's band is a
/// single target level reached via one named leg), so it skips the
/// performance-model lookups `relax` needs.
fn relax_with_perf_stub(graph: &LGraph, state: &mut DijkstraState, u: SearchNode, airway: AirwayIndex) {
    let u_state = state.get(u);
    for eidx in graph.out_edges(u.0) {
        let Some(edge) = graph.edge(eidx) else { continue };
        if !edge.airway.matches(airway) {
            continue;
        }
        let Some((_, w)) = graph.edge_endpoints(eidx) else {
            continue;
        };
        for piv in 0..edge.level_count() {
            if !graph.is_valid_connection(eidx, u.1, piv) {
                continue;
            }
            let new_distance = u_state.distance + edge.metric_at(piv).min(edge.metric_at(u.1));
            if !new_distance.is_finite() {
                continue;
            }
            let w_node = (w, piv);
            let w_state = state.get(w_node);
            if new_distance < w_state.distance {
                state.nodes.insert(
                    w_node,
                    NodeState {
                        distance: new_distance,
                        pred: Some(u),
                        pred_edge: Some(eidx),
                        color: NodeColor::Gray,
                    },
                );
                state.push(w, piv, new_distance);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData};
    use crate::geom::{Length, Point};
    use crate::graph::{Edge, Vertex};

    struct FlatPerf {
        levels: usize,
    }

    impl Performance for FlatPerf {
        fn level_count(&self) -> usize {
            self.levels
        }
        fn level(&self, index: usize) -> crate::perf::CruiseLevel {
            crate::perf::CruiseLevel(100 + u16::try_from(index * 20).unwrap())
        }
        fn tas_kt(&self, _index: usize) -> f64 {
            420.0
        }
        fn metric_per_nmi(&self, _index: usize) -> f64 {
            1.0
        }
        fn wind(&self, _point: Point, _index: usize) -> Option<crate::perf::Wind> {
            None
        }
        fn level_change_metric(&self, from: usize, to: usize) -> f64 {
            if from == to {
                0.0
            } else {
                1.0
            }
        }
        fn level_change_min_track_nm(&self, from: usize, to: usize) -> f64 {
            if from == to {
                0.0
            } else {
                5.0
            }
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
    fn shortest_path_prefers_the_cheaper_edge() {
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("AAA"));
        let b = g.add_vertex(vertex("BBB"));
        let c = g.add_vertex(vertex("CCC"));
        let mut direct = Edge::new(AirwayIndex::DCT, 1, Length::nm(100.0), 90.0);
        direct.set_metric(0, 100.0);
        g.add_edge(a, c, direct);
        let mut via_b1 = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 90.0);
        via_b1.set_metric(0, 10.0);
        g.add_edge(a, b, via_b1);
        let mut via_b2 = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 90.0);
        via_b2.set_metric(0, 10.0);
        g.add_edge(b, c, via_b2);

        let perf = FlatPerf { levels: 1 };
        let mut state = DijkstraState::seeded(&g, a, 0);
        run(&g, &perf, &mut state);
        let dist = state.best_distance(c).unwrap();
        assert!((dist - 20.0).abs() < 1e-9, "got {dist}");
    }

    #[test]
    fn same_identifier_revisit_is_pruned() {
        // A -> B -> A' would revisit identifier "AAA"; with a direct
        // edge available the search must not route back through it.
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("AAA"));
        let b = g.add_vertex(vertex("BBB"));
        let mut ab = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 90.0);
        ab.set_metric(0, 10.0);
        g.add_edge(a, b, ab);
        let mut ba = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 270.0);
        ba.set_metric(0, 10.0);
        g.add_edge(b, a, ba);

        let perf = FlatPerf { levels: 1 };
        let mut state = DijkstraState::seeded(&g, a, 0);
        run(&g, &perf, &mut state);
        // b's predecessor chain must not be extended back onto a.
        let path = state.path_to(b).unwrap();
        assert_eq!(path.len(), 2);
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::Direction;

use super::{AirwayIndex, Edge, Vertex};

/// The layered routing graph (spec.md §3, §4.C).
///
/// Backed by a [`StableDiGraph`] rather than `petgraph::Graph`: the
/// graph builder and repair loop repeatedly remove edges and vertices
/// over the lifetime of one search (bypassing supernodes, culling
/// excluded segments, applying intel), and `StableDiGraph` keeps every
/// surviving `NodeIndex`/`EdgeIndex` valid across those removals, where
/// `Graph` would silently invalidate them via swap-remove.
#[derive(Default)]
pub struct LGraph {
    inner: StableDiGraph<Vertex, Edge>,
    by_ident: HashMap<String, NodeIndex>,
}

impl LGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertex(&self, idx: NodeIndex) -> Option<&Vertex> {
        self.inner.node_weight(idx)
    }

    #[must_use]
    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.inner.edge_weight(idx)
    }

    #[must_use]
    pub fn edge_mut(&mut self, idx: EdgeIndex) -> Option<&mut Edge> {
        self.inner.edge_weight_mut(idx)
    }

    #[must_use]
    pub fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.inner.edge_endpoints(idx)
    }

    #[must_use]
    pub fn find_vertex(&self, ident: &str) -> Option<NodeIndex> {
        self.by_ident.get(ident).copied()
    }

    pub fn vertex_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    /// Add a vertex, or return the index of the already-present vertex
    /// sharing its identifier (I6: the identifier index stays
    /// consistent with the vertex set).
    pub fn add_vertex(&mut self, vertex: Vertex) -> NodeIndex {
        if let Some(&idx) = self.by_ident.get(&vertex.ident) {
            return idx;
        }
        let ident = vertex.ident.clone();
        let idx = self.inner.add_node(vertex);
        self.by_ident.insert(ident, idx);
        idx
    }

    /// Disconnect every edge incident to `v`, keeping the vertex itself
    /// (used by the supernode bypass and by intel-driven "forbidden
    /// point" disconnection — spec.md §4.D.2, §4.D.6).
    pub fn disconnect(&mut self, v: NodeIndex) {
        let incident: Vec<EdgeIndex> = self
            .inner
            .edges_directed(v, Direction::Outgoing)
            .chain(self.inner.edges_directed(v, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for e in incident {
            self.inner.remove_edge(e);
        }
    }

    /// Remove a vertex outright, along with its identifier mapping.
    pub fn remove_vertex(&mut self, v: NodeIndex) {
        if let Some(vertex) = self.inner.node_weight(v) {
            self.by_ident.remove(&vertex.ident);
        }
        self.inner.remove_node(v);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.by_ident.clear();
    }

    /// First out-edge of `u` towards `v` matching `pattern`, if any
    /// (spec.md §4.C's `find-edge`; ordering among ties is
    /// implementation-defined).
    #[must_use]
    pub fn find_edge(&self, u: NodeIndex, v: NodeIndex, pattern: AirwayIndex) -> Option<EdgeIndex> {
        self.inner
            .edges_connecting(u, v)
            .find(|e| e.weight().airway.matches(pattern))
            .map(|e| e.id())
    }

    pub fn out_edges(&self, u: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.inner
            .edges_directed(u, Direction::Outgoing)
            .map(|e| e.id())
    }

    pub fn in_edges(&self, v: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.inner
            .edges_directed(v, Direction::Incoming)
            .map(|e| e.id())
    }

    /// Add an edge, merging with any existing edge of the same airway
    /// index between the same ordered pair by elementwise minimum (I4).
    pub fn add_edge(&mut self, u: NodeIndex, v: NodeIndex, edge: Edge) -> EdgeIndex {
        if let Some(existing) = self.find_edge(u, v, edge.airway) {
            if let Some(slot) = self.inner.edge_weight_mut(existing) {
                slot.merge_min(&edge);
            }
            return existing;
        }
        self.inner.add_edge(u, v, edge)
    }

    pub fn remove_edge(&mut self, e: EdgeIndex) {
        self.inner.remove_edge(e);
    }

    /// Swap the contents of this graph with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.inner, &mut other.inner);
        std::mem::swap(&mut self.by_ident, &mut other.by_ident);
    }

    /// Collect and remove every edge with no valid level (spec.md §3:
    /// "Edges with no valid level are collected and removed after each
    /// mutation pass").
    pub fn prune_invalid_edges(&mut self) -> usize {
        let dead: Vec<EdgeIndex> = self
            .inner
            .edge_indices()
            .filter(|&e| !self.inner[e].is_valid())
            .collect();
        let count = dead.len();
        for e in dead {
            self.inner.remove_edge(e);
        }
        count
    }

    /// I5 + the DCT branch of `is_valid_connection`: is a non-DCT
    /// airway edge from `u` to `v` valid at `level`?
    fn parallel_airway_valid_at(&self, u: NodeIndex, v: NodeIndex, level: usize) -> bool {
        self.inner
            .edges_connecting(u, v)
            .filter(|e| e.weight().airway.is_airway())
            .any(|e| e.weight().is_valid_at(level))
    }

    /// Suppress DCT edges per I5: wherever a named-airway edge is valid
    /// at a level for an ordered pair, the parallel DCT edge (if any)
    /// is invalidated at that level.
    pub fn suppress_dct_where_airway_valid(&mut self) {
        let mut to_invalidate: Vec<(EdgeIndex, usize)> = Vec::new();
        for dct_edge in self.inner.edge_indices() {
            let (u, v) = self.inner.edge_endpoints(dct_edge).unwrap();
            if !self.inner[dct_edge].airway.is_dct() {
                continue;
            }
            for level in 0..self.inner[dct_edge].level_count() {
                if self.inner[dct_edge].is_valid_at(level)
                    && self.parallel_airway_valid_at(u, v, level)
                {
                    to_invalidate.push((dct_edge, level));
                }
            }
        }
        for (e, level) in to_invalidate {
            self.inner[e].invalidate(level);
        }
    }

    /// The search's pruning predicate (spec.md §4.C `is_valid_connection`).
    ///
    /// `piu`/`piv` are cruise-level indices before/after traversing
    /// `eidx`. SID edges gate on the level entered (`piv`); STAR edges
    /// gate on the level departed (`piu`); DCT and named-airway edges
    /// require validity at `piu`, and when `piu != piv` every
    /// intermediate level must be valid on the edge itself or — for
    /// DCT only — on a parallel airway edge between the same endpoints.
    #[must_use]
    pub fn is_valid_connection(&self, eidx: EdgeIndex, piu: usize, piv: usize) -> bool {
        let Some(edge) = self.inner.edge_weight(eidx) else {
            return false;
        };
        if edge.airway.is_sid() {
            return edge.is_valid_at(piv);
        }
        if edge.airway.is_star() {
            return edge.is_valid_at(piu);
        }
        if !edge.is_valid_at(piu) {
            return false;
        }
        if piu == piv {
            return true;
        }
        let (lo, hi) = if piu <= piv { (piu, piv) } else { (piv, piu) };
        let (u, v) = match self.inner.edge_endpoints(eidx) {
            Some(pair) => pair,
            None => return false,
        };
        (lo..=hi).all(|level| {
            edge.is_valid_at(level)
                || (edge.airway.is_dct() && self.parallel_airway_valid_at(u, v, level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData};
    use crate::geom::{Length, Point};

    fn vertex(ident: &str) -> Vertex {
        let handle = DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
        }));
        Vertex::new(handle)
    }

    #[test]
    fn adding_the_same_ident_twice_reuses_the_vertex() {
        let mut g = LGraph::new();
        let a1 = g.add_vertex(vertex("KLO"));
        let a2 = g.add_vertex(vertex("KLO"));
        assert_eq!(a1, a2);
    }

    #[test]
    fn re_adding_an_airway_edge_merges_by_elementwise_min() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("AAA"));
        let v = g.add_vertex(vertex("BBB"));
        let mut e1 = Edge::new(AirwayIndex::DCT, 2, Length::nm(10.0), 90.0);
        e1.set_metric(0, 10.0);
        g.add_edge(u, v, e1);
        let mut e2 = Edge::new(AirwayIndex::DCT, 2, Length::nm(10.0), 90.0);
        e2.set_metric(0, 5.0);
        e2.set_metric(1, 8.0);
        g.add_edge(u, v, e2);
        let idx = g.find_edge(u, v, AirwayIndex::DCT).unwrap();
        assert!((g.edge(idx).unwrap().metric_at(0) - 5.0).abs() < 1e-9);
        assert!((g.edge(idx).unwrap().metric_at(1) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn dct_is_suppressed_where_airway_is_valid() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("AAA"));
        let v = g.add_vertex(vertex("BBB"));
        let mut dct = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 90.0);
        dct.set_metric(0, 10.0);
        g.add_edge(u, v, dct);
        let mut awy = Edge::new(AirwayIndex::MATCHAWY, 1, Length::nm(10.0), 90.0);
        awy.set_metric(0, 12.0);
        g.add_edge(u, v, awy);
        g.suppress_dct_where_airway_valid();
        let dct_idx = g.find_edge(u, v, AirwayIndex::DCT).unwrap();
        assert!(!g.edge(dct_idx).unwrap().is_valid_at(0));
    }

    #[test]
    fn is_valid_connection_same_level_requires_validity_at_piu() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("AAA"));
        let v = g.add_vertex(vertex("BBB"));
        let mut e = Edge::new(AirwayIndex::DCT, 2, Length::nm(10.0), 90.0);
        e.set_metric(1, 5.0);
        let eidx = g.add_edge(u, v, e);
        assert!(!g.is_valid_connection(eidx, 0, 0));
        assert!(g.is_valid_connection(eidx, 1, 1));
    }

    #[test]
    fn sid_edge_gates_on_piv() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("VDEP"));
        let v = g.add_vertex(vertex("AAA"));
        let mut sid = Edge::new(AirwayIndex::SID, 2, Length::nm(5.0), 90.0);
        sid.set_metric(1, 5.0);
        let eidx = g.add_edge(u, v, sid);
        assert!(g.is_valid_connection(eidx, 0, 1));
        assert!(!g.is_valid_connection(eidx, 0, 0));
    }

    #[test]
    fn dct_level_change_requires_every_intermediate_level() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("AAA"));
        let v = g.add_vertex(vertex("BBB"));
        let mut dct = Edge::new(AirwayIndex::DCT, 3, Length::nm(10.0), 90.0);
        dct.set_metric(0, 10.0);
        dct.set_metric(2, 10.0);
        let eidx = g.add_edge(u, v, dct);
        // level 1 is not valid on the DCT edge and there is no parallel
        // airway, so a 0 -> 2 level change must be rejected.
        assert!(!g.is_valid_connection(eidx, 0, 2));
    }

    #[test]
    fn dct_level_change_permitted_via_parallel_airway() {
        let mut g = LGraph::new();
        let u = g.add_vertex(vertex("AAA"));
        let v = g.add_vertex(vertex("BBB"));
        let mut dct = Edge::new(AirwayIndex::DCT, 3, Length::nm(10.0), 90.0);
        dct.set_metric(0, 10.0);
        dct.set_metric(2, 10.0);
        let eidx = g.add_edge(u, v, dct);
        let mut awy = Edge::new(AirwayIndex::MATCHAWY, 3, Length::nm(10.0), 90.0);
        awy.set_metric(1, 12.0);
        g.add_edge(u, v, awy);
        assert!(g.is_valid_connection(eidx, 0, 2));
    }
}

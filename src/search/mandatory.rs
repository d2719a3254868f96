// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Mandatory-crossing-sequence planner (spec.md §4.F, component F).

use petgraph::stable_graph::NodeIndex;

use super::dijkstra::{DijkstraState, NodeColor};
use crate::graph::{AirwayIndex, LGraph};

/// One step of a mandatory sequence: cross `vertex` within `level_band`
/// (inclusive level indices), reaching it via `airway_to_next` from
/// the previous step (or from the baseline route for the first step).
#[derive(Clone, Debug)]
pub struct SequenceStep {
    pub vertex_ident: String,
    pub level_band: (usize, usize),
    pub airway_to_next: AirwayIndex,
}

/// One candidate ordered path through a mandatory alternative.
#[derive(Clone, Debug, Default)]
pub struct MandatorySequence {
    pub steps: Vec<SequenceStep>,
}

/// A disjunction of sequences; the planner satisfies exactly one per
/// alternative, preferring whichever has the closest entry point.
#[derive(Clone, Debug, Default)]
pub struct MandatoryAlternative {
    pub sequences: Vec<MandatorySequence>,
}

/// Resolve a named vertex to its current graph index, skipping steps
/// whose vertex no longer exists in the graph (a mutation may have
/// bypassed or disconnected it).
fn entry_distance(graph: &LGraph, state: &DijkstraState, ident: &str) -> Option<f64> {
    let v = graph.find_vertex(ident)?;
    state.best_distance(v)
}

/// Run the mandatory-sequence planner starting from an already-computed
/// baseline Dijkstra state (spec.md §4.F).
///
/// Returns the final state with gray paths honouring every
/// alternative, or `None` if some alternative's entry point was never
/// reached.
pub fn plan(
    graph: &LGraph,
    mut state: DijkstraState,
    mut alternatives: Vec<MandatoryAlternative>,
) -> Option<DijkstraState> {
    while !alternatives.is_empty() {
        let (selected_idx, selected_entry) = alternatives
            .iter()
            .enumerate()
            .filter_map(|(i, alt)| {
                alt.sequences
                    .iter()
                    .filter_map(|seq| seq.steps.first())
                    .filter_map(|step| {
                        entry_distance(graph, &state, &step.vertex_ident).map(|d| (i, d))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let rule = alternatives.remove(selected_idx);

        // Constrain the frontier to paths reaching one of the rule's
        // entry points, per spec.md §4.F step 3.
        let entry_vertices: Vec<NodeIndex> = rule
            .sequences
            .iter()
            .filter_map(|seq| seq.steps.first())
            .filter_map(|step| graph.find_vertex(&step.vertex_ident))
            .collect();
        let mut constrained = state.clone();
        constrained.mark_all_white();
        for &v in &entry_vertices {
            constrained.mark_path(graph, v);
        }
        constrained.mark_white_infinite_selfpred();

        let mut accumulator: Option<DijkstraState> = None;
        for sequence in &rule.sequences {
            let mut cur = constrained.clone();
            let mut ok = true;
            for step in &sequence.steps {
                let Some(v) = graph.find_vertex(&step.vertex_ident) else {
                    ok = false;
                    break;
                };
                cur.mark_path_within_band(graph, v, step.level_band);
                cur.mark_white_infinite_selfpred();
                cur.rebuild_queue();
                super::dijkstra::run_constrained(graph, &mut cur, step.airway_to_next);
            }
            if !ok {
                continue;
            }
            match &mut accumulator {
                Some(acc) => acc.copy_gray_paths(&cur),
                None => accumulator = Some(cur),
            }
        }

        state = accumulator?;
    }
    Some(state)
}

/// Whether `color` marks a node as part of the current solution
/// frontier (used by callers walking the result).
#[must_use]
pub fn is_settled(color: NodeColor) -> bool {
    matches!(color, NodeColor::Black | NodeColor::Gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData};
    use crate::geom::{Length, Point};
    use crate::graph::Edge;

    fn vertex(ident: &str) -> crate::graph::Vertex {
        let handle = DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
        }));
        crate::graph::Vertex::new(handle)
    }

    #[test]
    fn plan_with_no_alternatives_returns_the_baseline_unchanged() {
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("AAA"));
        let b = g.add_vertex(vertex("BBB"));
        let mut e = Edge::new(AirwayIndex::DCT, 1, Length::nm(10.0), 90.0);
        e.set_metric(0, 10.0);
        g.add_edge(a, b, e);
        let state = DijkstraState::seeded(&g, a, 1);
        let result = plan(&g, state, Vec::new());
        assert!(result.is_some());
    }
}

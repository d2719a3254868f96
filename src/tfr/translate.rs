// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! TFR-to-graph translator (spec.md §4.H, component H): turns a
//! validator rule match into graph mutations.

use super::engine::{RuleAlternative, RuleCodeType, RuleMatch};
use crate::config::SearchConfig;
use crate::graph::{AirwayIndex, LGraph};
use crate::perf::CruiseLevel;

/// Levels of `ladder` whose altitude lies within `[altmin, altmax]`
/// (either bound unset means unbounded on that side).
pub(crate) fn level_indices_in_band(
    ladder: &[CruiseLevel],
    altmin_ft: Option<i32>,
    altmax_ft: Option<i32>,
) -> Vec<usize> {
    ladder
        .iter()
        .enumerate()
        .filter(|(_, level)| {
            altmin_ft.map_or(true, |lo| level.feet() >= lo) && altmax_ft.map_or(true, |hi| level.feet() <= hi)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Kill every edge between `from_ident` and `to_ident` at the given
/// levels. `bidirectional` also kills the reverse direction.
///
/// Shared with the validator repair loop (spec.md §4.I), which cites
/// airway segments by the same `(from, to, levels)` shape.
pub(crate) fn kill_segment(
    graph: &mut LGraph,
    from_ident: &str,
    to_ident: &str,
    levels: &[usize],
    bidirectional: bool,
) -> bool {
    let (Some(u), Some(v)) = (graph.find_vertex(from_ident), graph.find_vertex(to_ident)) else {
        return false;
    };
    let mut changed = false;
    for eidx in graph.out_edges(u).collect::<Vec<_>>() {
        if graph.edge_endpoints(eidx).map(|(_, to)| to) != Some(v) {
            continue;
        }
        if let Some(edge) = graph.edge_mut(eidx) {
            for &level in levels {
                if edge.is_valid_at(level) {
                    edge.invalidate(level);
                    changed = true;
                }
            }
        }
    }
    if bidirectional {
        changed |= kill_segment(graph, to_ident, from_ident, levels, false);
    }
    changed
}

/// Rename an airway segment to DCT (a common validator-driven
/// "downgrade" mutation, spec.md §4.I): the named-airway edge is
/// invalidated and a DCT edge with the same endpoints/metric takes
/// over.
fn rename_segment_to_dct(graph: &mut LGraph, from_ident: &str, to_ident: &str) -> bool {
    let (Some(u), Some(v)) = (graph.find_vertex(from_ident), graph.find_vertex(to_ident)) else {
        return false;
    };
    let Some(airway_edge) = graph.find_edge(u, v, AirwayIndex::MATCHAWY) else {
        return false;
    };
    let Some(edge) = graph.edge(airway_edge).cloned() else {
        return false;
    };
    let mut dct = crate::graph::Edge::new(AirwayIndex::DCT, edge.level_count(), edge.distance, edge.true_course);
    for level in 0..edge.level_count() {
        if edge.is_valid_at(level) {
            dct.set_metric(level, edge.metric_at(level));
        }
    }
    graph.add_edge(u, v, dct);
    graph.edge_mut(airway_edge).unwrap().invalidate_all();
    true
}

/// Disconnect a named vertex at every level (spec.md §4.H, §4.I).
fn disconnect_vertex(graph: &mut LGraph, ident: &str) -> bool {
    let Some(v) = graph.find_vertex(ident) else {
        return false;
    };
    graph.disconnect(v);
    true
}

/// Outcome of translating one rule match: whether any mutation
/// occurred, and, for mandatory rules, the planner input to feed back
/// into the next k-shortest-path iteration.
#[derive(Default)]
pub struct TranslationOutcome {
    pub mutated: bool,
    pub mandatory: Option<crate::search::MandatoryAlternative>,
}

/// Translate one rule match into graph mutations (spec.md §4.H).
pub fn translate_rule(
    graph: &mut LGraph,
    config: &SearchConfig,
    ladder: &[CruiseLevel],
    rule: &RuleMatch,
) -> TranslationOutcome {
    match rule.code_type {
        RuleCodeType::Mandatory => translate_mandatory(graph, ladder, rule),
        RuleCodeType::Forbidden => translate_forbidden(graph, config, ladder, rule),
        RuleCodeType::Closed => translate_closed(graph, config, ladder, rule),
    }
}

fn translate_mandatory(graph: &mut LGraph, ladder: &[CruiseLevel], rule: &RuleMatch) -> TranslationOutcome {
    let mandatory = rule.as_mandatory_alternative();
    let mut mutated = false;
    if rule.is_mandatoryinbound {
        if let Some(terminal) = &rule.terminal_ident {
            let justified: Vec<usize> = rule
                .alternatives
                .iter()
                .filter_map(|alt| match alt {
                    RuleAlternative::Sequence(steps) => steps.first(),
                    RuleAlternative::RouteSegment { .. } => None,
                })
                .flat_map(|step| step.level_band.0..=step.level_band.1)
                .collect();
            if let Some(v) = graph.find_vertex(terminal) {
                for eidx in graph.in_edges(v).collect::<Vec<_>>() {
                    if let Some(edge) = graph.edge_mut(eidx) {
                        for level in 0..edge.level_count() {
                            if !justified.contains(&level) && edge.is_valid_at(level) {
                                edge.invalidate(level);
                                mutated = true;
                            }
                        }
                    }
                }
            }
        }
    }
    let _ = ladder;
    TranslationOutcome {
        mutated: mutated || mandatory.is_some(),
        mandatory,
    }
}

fn translate_forbidden(
    graph: &mut LGraph,
    config: &SearchConfig,
    ladder: &[CruiseLevel],
    rule: &RuleMatch,
) -> TranslationOutcome {
    let mut mutated = false;
    for alt in &rule.alternatives {
        match alt {
            RuleAlternative::Sequence(steps) => {
                for pair in steps.windows(2) {
                    let levels: Vec<usize> = (pair[0].level_band.0..=pair[0].level_band.1).collect();
                    mutated |= kill_segment(graph, &pair[0].vertex_ident, &pair[1].vertex_ident, &levels, !rule.is_unconditional);
                }
            }
            RuleAlternative::RouteSegment { from_ident, to_ident } => {
                let levels: Vec<usize> = (0..ladder.len()).collect();
                mutated |= kill_segment(graph, from_ident, to_ident, &levels, !rule.is_unconditional);
            }
        }
    }
    if !mutated {
        mutated = scale_crossing_conditions(graph, ladder, &rule.crossing_conditions, config.forbidden_penalty);
    }
    TranslationOutcome {
        mutated,
        mandatory: None,
    }
}

fn translate_closed(
    graph: &mut LGraph,
    config: &SearchConfig,
    ladder: &[CruiseLevel],
    rule: &RuleMatch,
) -> TranslationOutcome {
    let mut mutated = false;
    for condition in &rule.crossing_conditions {
        let levels = level_indices_in_band(ladder, condition.altmin_ft, condition.altmax_ft);
        if let Some(v) = graph.find_vertex(&condition.ident) {
            for eidx in graph
                .out_edges(v)
                .chain(graph.in_edges(v))
                .collect::<Vec<_>>()
            {
                if let Some(edge) = graph.edge_mut(eidx) {
                    for &level in &levels {
                        if edge.is_valid_at(level) {
                            edge.invalidate(level);
                            mutated = true;
                        }
                    }
                }
            }
        }
    }
    if !mutated {
        mutated = scale_crossing_conditions(
            graph,
            ladder,
            &rule.crossing_conditions,
            config.reciprocal_forbidden_penalty(),
        );
    }
    TranslationOutcome {
        mutated,
        mandatory: None,
    }
}

/// Fall back to scaling metrics by `factor` at a condition's vertex
/// rather than killing edges outright (spec.md §4.H's "fall back to
/// scaling the solution's vertex/edge metric").
fn scale_crossing_conditions(
    graph: &mut LGraph,
    ladder: &[CruiseLevel],
    conditions: &[super::engine::CrossingCondition],
    factor: f64,
) -> bool {
    let mut mutated = false;
    for condition in conditions {
        let levels = level_indices_in_band(ladder, condition.altmin_ft, condition.altmax_ft);
        let Some(v) = graph.find_vertex(&condition.ident) else {
            continue;
        };
        for eidx in graph.out_edges(v).collect::<Vec<_>>() {
            if let Some(edge) = graph.edge_mut(eidx) {
                for &level in &levels {
                    if edge.is_valid_at(level) {
                        edge.set_metric(level, edge.metric_at(level) * factor);
                        mutated = true;
                    }
                }
            }
        }
    }
    mutated
}

/// Rename-to-DCT is exposed separately since it is invoked directly by
/// specific validator error codes (spec.md §4.I) rather than through a
/// rule match.
pub fn downgrade_to_dct(graph: &mut LGraph, from_ident: &str, to_ident: &str) -> bool {
    rename_segment_to_dct(graph, from_ident, to_ident)
}

/// Disconnect-by-ident is likewise invoked directly by the repair loop.
pub fn disconnect(graph: &mut LGraph, ident: &str) -> bool {
    disconnect_vertex(graph, ident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData};
    use crate::geom::{Length, Point};
    use crate::graph::{Edge, Vertex};

    fn vertex(ident: &str) -> Vertex {
        let handle = DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
        }));
        Vertex::new(handle)
    }

    #[test]
    fn route_segment_forbidden_kills_both_directions() {
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("XIRDO"));
        let b = g.add_vertex(vertex("ARDEP"));
        let mut fwd = Edge::new(AirwayIndex::DCT, 2, Length::nm(40.0), 90.0);
        fwd.set_metric(0, 40.0);
        fwd.set_metric(1, 40.0);
        g.add_edge(a, b, fwd);
        let mut rev = Edge::new(AirwayIndex::DCT, 2, Length::nm(40.0), 270.0);
        rev.set_metric(0, 40.0);
        rev.set_metric(1, 40.0);
        g.add_edge(b, a, rev);

        let config = SearchConfig::default();
        let ladder = vec![CruiseLevel(100), CruiseLevel(120)];
        let rule = RuleMatch {
            code_type: RuleCodeType::Forbidden,
            is_dct: true,
            is_unconditional: true,
            is_routestatic: true,
            is_mandatoryinbound: false,
            alternatives: vec![RuleAlternative::RouteSegment {
                from_ident: "XIRDO".to_string(),
                to_ident: "ARDEP".to_string(),
            }],
            crossing_conditions: Vec::new(),
            terminal_ident: None,
        };
        let outcome = translate_rule(&mut g, &config, &ladder, &rule);
        assert!(outcome.mutated);
        let fwd_idx = g.find_edge(a, b, AirwayIndex::DCT).unwrap();
        let rev_idx = g.find_edge(b, a, AirwayIndex::DCT).unwrap();
        assert!(!g.edge(fwd_idx).unwrap().is_valid());
        assert!(!g.edge(rev_idx).unwrap().is_valid());
    }
}

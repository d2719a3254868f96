// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Validator-driven repair loop (spec.md §4.I): submit, parse, mutate,
//! resubmit until the validator accepts the route or the loop gives up.

use log::{debug, info, warn};

use super::proc::ValidatorProcess;
use super::rules::{classify, MutationRecipe};
use crate::config::SearchConfig;
use crate::db::TerrainQuery;
use crate::error::Result;
use crate::flightplan::FlightPlan;
use crate::graph::{AirwayIndex, AirwayTable, LGraph};
use crate::groundclear;
use crate::intel::{ForbiddenPoint, IntelStore};
use crate::status::StoppingStatus;
use crate::tfr::translate as xlate;

/// Lines that terminate a response block cleanly (spec.md §4.I).
const ACCEPTED_MARKERS: &[&str] = &["NO ERRORS", "ROUTE ACCEPTED"];

/// Bounds on the repair loop: how many validator rounds to try before
/// giving up, and how many child-process restarts a timeout budget
/// tolerates (spec.md §4.I, §5).
#[derive(Copy, Clone, Debug)]
pub struct RepairBudget {
    pub max_rounds: usize,
    pub max_restarts: usize,
}

impl Default for RepairBudget {
    fn default() -> Self {
        Self {
            max_rounds: 64,
            max_restarts: 3,
        }
    }
}

impl RepairBudget {
    /// Restart budget from [`SearchConfig::validator_restart_budget`];
    /// `max_rounds` still defaults, since the config only bounds
    /// process restarts, not repair-loop rounds.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_restarts: config.validator_restart_budget as usize,
            ..Self::default()
        }
    }
}

pub struct RepairOutcome {
    pub route: FlightPlan,
    pub status: StoppingStatus,
}

fn is_accepted(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|line| ACCEPTED_MARKERS.iter().any(|marker| line.trim() == *marker))
}

/// Highest cruise-level index actually used by `route`, per the
/// ladder.
fn max_level_index(route: &FlightPlan, ladder: &[crate::perf::CruiseLevel]) -> Option<usize> {
    route
        .waypoints
        .iter()
        .filter_map(|wp| ladder.iter().position(|level| *level == wp.level))
        .max()
}

/// Apply one classified mutation to the working graph. Returns whether
/// anything actually changed.
fn apply_recipe(
    recipe: &MutationRecipe,
    graph: &mut LGraph,
    airways: &mut AirwayTable,
    intel: &mut dyn IntelStore,
    ladder: &[crate::perf::CruiseLevel],
) -> bool {
    match recipe {
        MutationRecipe::DisconnectVertex(ident) => xlate::disconnect(graph, ident),
        MutationRecipe::KillDctSegment(from, to) => {
            kill_dct_only(graph, from, to) | kill_dct_only(graph, to, from)
        }
        MutationRecipe::DisconnectWithAirwayFallback(ident, airway) => {
            let mut changed = xlate::disconnect(graph, ident);
            if let Some(name) = airway {
                changed |= downgrade_airway_everywhere(graph, airways, name);
            }
            changed
        }
        MutationRecipe::KillProcedureAndRemember(ident) => {
            let changed = kill_procedure_edges(graph, ident);
            intel.add_forbidden_point(ForbiddenPoint { ident: ident.clone() });
            changed
        }
        MutationRecipe::RestrictToAirway { vertex, airway, outgoing } => {
            restrict_to_airway(graph, airways, vertex, airway, *outgoing)
        }
        MutationRecipe::DowngradeAirwayEverywhere(name) => downgrade_airway_everywhere(graph, airways, name),
        MutationRecipe::UpgradeDctToAirway { from, to, airway } => {
            upgrade_dct_to_airway(graph, airways, from, to, airway)
        }
        MutationRecipe::KillCrossing(band) => kill_crossing(graph, band, ladder),
        MutationRecipe::ShrinkCruiseLadder | MutationRecipe::Unrecognized => false,
    }
}

fn kill_dct_only(graph: &mut LGraph, from_ident: &str, to_ident: &str) -> bool {
    let (Some(u), Some(v)) = (graph.find_vertex(from_ident), graph.find_vertex(to_ident)) else {
        return false;
    };
    let mut changed = false;
    for eidx in graph.out_edges(u).collect::<Vec<_>>() {
        if graph.edge_endpoints(eidx).map(|(_, to)| to) != Some(v) {
            continue;
        }
        if let Some(edge) = graph.edge_mut(eidx) {
            if edge.airway.is_dct() && edge.is_valid() {
                edge.invalidate_all();
                changed = true;
            }
        }
    }
    changed
}

fn kill_procedure_edges(graph: &mut LGraph, ident: &str) -> bool {
    let Some(v) = graph.find_vertex(ident) else {
        return false;
    };
    let mut changed = false;
    for eidx in graph.in_edges(v).chain(graph.out_edges(v)).collect::<Vec<_>>() {
        if let Some(edge) = graph.edge_mut(eidx) {
            if (edge.airway.is_sid() || edge.airway.is_star()) && edge.is_valid() {
                edge.invalidate_all();
                changed = true;
            }
        }
    }
    changed
}

fn restrict_to_airway(
    graph: &mut LGraph,
    airways: &mut AirwayTable,
    vertex_ident: &str,
    airway_name: &str,
    outgoing: bool,
) -> bool {
    let Some(v) = graph.find_vertex(vertex_ident) else {
        return false;
    };
    let keep = airways.lookup(airway_name, false);
    let edges: Vec<_> = if outgoing {
        graph.out_edges(v).collect()
    } else {
        graph.in_edges(v).collect()
    };
    let mut changed = false;
    for eidx in edges {
        if let Some(edge) = graph.edge_mut(eidx) {
            if edge.airway != keep && edge.is_valid() {
                edge.invalidate_all();
                changed = true;
            }
        }
    }
    changed
}

fn downgrade_airway_everywhere(graph: &mut LGraph, airways: &mut AirwayTable, name: &str) -> bool {
    let target = airways.lookup(name, false);
    if target == AirwayIndex::MATCHNONE {
        return false;
    }
    let mut changed = false;
    for u in graph.vertex_indices().collect::<Vec<_>>() {
        for eidx in graph.out_edges(u).collect::<Vec<_>>() {
            let Some((from, to)) = graph.edge_endpoints(eidx) else { continue };
            let matches = graph.edge(eidx).is_some_and(|e| e.airway == target && e.is_valid());
            if !matches {
                continue;
            }
            let edge = graph.edge(eidx).unwrap().clone();
            let mut dct = crate::graph::Edge::new(AirwayIndex::DCT, edge.level_count(), edge.distance, edge.true_course);
            for level in 0..edge.level_count() {
                if edge.is_valid_at(level) {
                    dct.set_metric(level, edge.metric_at(level));
                }
            }
            graph.add_edge(from, to, dct);
            graph.edge_mut(eidx).unwrap().invalidate_all();
            changed = true;
        }
    }
    changed
}

fn upgrade_dct_to_airway(
    graph: &mut LGraph,
    airways: &mut AirwayTable,
    from_ident: &str,
    to_ident: &str,
    airway_name: &str,
) -> bool {
    let (Some(u), Some(v)) = (graph.find_vertex(from_ident), graph.find_vertex(to_ident)) else {
        return false;
    };
    let named = airways.lookup(airway_name, false);
    let mut changed = false;
    for eidx in graph.out_edges(u).collect::<Vec<_>>() {
        if graph.edge_endpoints(eidx).map(|(_, to)| to) != Some(v) {
            continue;
        }
        if let Some(edge) = graph.edge_mut(eidx) {
            if edge.airway.is_dct() && edge.is_valid() {
                edge.invalidate_all();
                changed = true;
            }
        }
    }
    if changed && named != AirwayIndex::MATCHNONE && graph.find_edge(u, v, named).is_none() {
        warn!("ROUTE172 suggested {airway_name} between {from_ident} and {to_ident} but no such airway edge exists");
    }
    changed
}

fn kill_crossing(graph: &mut LGraph, band: &super::rules::AltitudeBand, ladder: &[crate::perf::CruiseLevel]) -> bool {
    let Some(v) = graph.find_vertex(&band.ident) else {
        return false;
    };
    let levels = xlate::level_indices_in_band(ladder, band.altmin_ft, band.altmax_ft);
    let mut changed = false;
    for eidx in graph.out_edges(v).chain(graph.in_edges(v)).collect::<Vec<_>>() {
        if let Some(edge) = graph.edge_mut(eidx) {
            for &level in &levels {
                if edge.is_valid_at(level) {
                    edge.invalidate(level);
                    changed = true;
                }
            }
        }
    }
    changed
}

/// Drive the submit/parse/mutate loop to convergence (spec.md §4.I).
///
/// `config.cruise_ladder` is shrunk in place on a ROUTE179-shaped
/// response (ladder/performance mismatch); the caller's `Performance`
/// collaborator is expected to be re-derived from the new ladder length
/// before the next search iteration, since this crate only owns the
/// ladder's altitudes, not the aircraft performance numbers attached to
/// them.
#[allow(clippy::too_many_arguments)]
pub fn run(
    graph: &mut LGraph,
    airways: &mut AirwayTable,
    config: &mut SearchConfig,
    process: &mut dyn ValidatorProcess,
    intel: &mut dyn IntelStore,
    terrain: &dyn TerrainQuery,
    tas_kt: u32,
    mut route: FlightPlan,
    budget: RepairBudget,
) -> Result<RepairOutcome> {
    let mut restarts = 0usize;
    let mut probe_cursor = 0usize;

    for round in 0..budget.max_rounds {
        let icao = route.render_icao(tas_kt)?;
        debug!("validator round {round}: submitting {icao}");
        let lines = match process.submit(&icao) {
            Ok(lines) => lines,
            Err(err) => {
                warn!("validator submit failed: {err}; restarting ({restarts}/{})", budget.max_restarts);
                restarts += 1;
                if restarts > budget.max_restarts {
                    return Ok(RepairOutcome {
                        route,
                        status: StoppingStatus::STOPPING_ERROR_VALIDATOR_TIMEOUT,
                    });
                }
                process.restart()?;
                continue;
            }
        };

        if is_accepted(&lines) {
            if groundclear::finalize(graph, terrain, &config.cruise_ladder, &route) {
                info!("ground-clearance finalizer forced another round after acceptance");
                continue;
            }
            return Ok(RepairOutcome {
                route,
                status: StoppingStatus::ACCEPTED,
            });
        }

        let mut mutated = false;
        for line in &lines {
            let Some(recipe) = classify(line) else { continue };
            if matches!(recipe, MutationRecipe::ShrinkCruiseLadder) {
                match max_level_index(&route, &config.cruise_ladder) {
                    Some(0) | None => {
                        return Ok(RepairOutcome {
                            route,
                            status: StoppingStatus::STOPPING_ERROR_INTERNAL_ERROR,
                        });
                    }
                    Some(pis) => {
                        config.cruise_ladder.truncate(pis);
                        mutated = true;
                    }
                }
                continue;
            }
            if apply_recipe(&recipe, graph, airways, intel, &config.cruise_ladder) {
                mutated = true;
            }
        }

        if mutated {
            probe_cursor = 0;
            continue;
        }

        if !probe_dct(graph, &route, &mut probe_cursor) {
            return Ok(RepairOutcome {
                route,
                status: StoppingStatus::STOPPING_ERROR_ENROUTE,
            });
        }
    }

    Ok(RepairOutcome {
        route,
        status: StoppingStatus::STOPPING_ERROR_ITERATION,
    })
}

/// Fallback when no response line classified to a mutation: force the
/// next airway leg at `probe_cursor` to DCT and advance the cursor.
/// Returns `false` once the cursor has walked off the end without
/// changing anything, telling the caller to give up (spec.md §4.I).
fn probe_dct(graph: &mut LGraph, route: &FlightPlan, probe_cursor: &mut usize) -> bool {
    while *probe_cursor + 1 < route.waypoints.len() {
        let from = &route.waypoints[*probe_cursor];
        let to = &route.waypoints[*probe_cursor + 1];
        *probe_cursor += 1;
        if xlate::downgrade_to_dct(graph, &from.ident, &to.ident) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbHandle, MapElementData, PathCode};
    use crate::geom::{Length, Point};
    use crate::graph::{Edge, Vertex};
    use crate::intel::ForbiddenSegment;
    use crate::perf::CruiseLevel;

    struct ScriptedProcess {
        rounds: Vec<Vec<String>>,
        next: usize,
    }

    impl ValidatorProcess for ScriptedProcess {
        fn submit(&mut self, _icao_route: &str) -> Result<Vec<String>> {
            let lines = self.rounds.get(self.next).cloned().unwrap_or_default();
            self.next += 1;
            Ok(lines)
        }

        fn restart(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct NoOpIntel;
    impl IntelStore for NoOpIntel {
        fn forbidden_points(&self, _bbox: crate::geom::BoundingBox) -> Vec<ForbiddenPoint> {
            Vec::new()
        }
        fn forbidden_segments(&self, _bbox: crate::geom::BoundingBox) -> Vec<ForbiddenSegment> {
            Vec::new()
        }
        fn add_forbidden_point(&mut self, _point: ForbiddenPoint) {}
        fn add_forbidden_segment(&mut self, _segment: ForbiddenSegment) {}
    }

    struct SeaLevelTerrain;
    impl TerrainQuery for SeaLevelTerrain {
        fn max_elevation_ft(&self, _from: Point, _to: Point, _corridor: Length) -> i32 {
            0
        }
    }

    fn vertex(ident: &str) -> Vertex {
        let handle = DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
        }));
        Vertex::new(handle)
    }

    fn route() -> FlightPlan {
        FlightPlan {
            waypoints: vec![
                crate::flightplan::FlightPlanWaypoint {
                    ident: "AAA".to_string(),
                    coordinate: Point::from_deg(50.0, 8.0),
                    path_code: PathCode::Sid,
                    level: CruiseLevel(100),
                    airway: None,
                },
                crate::flightplan::FlightPlanWaypoint {
                    ident: "BBB".to_string(),
                    coordinate: Point::from_deg(50.1, 8.1),
                    path_code: PathCode::Dct,
                    level: CruiseLevel(100),
                    airway: None,
                },
            ],
        }
    }

    fn two_vertex_graph() -> (LGraph, crate::graph::AirwayTable) {
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("AAA"));
        let b = g.add_vertex(vertex("BBB"));
        let mut fwd = Edge::new(AirwayIndex::DCT, 1, Length::nm(30.0), 45.0);
        fwd.set_metric(0, 30.0);
        g.add_edge(a, b, fwd);
        (g, crate::graph::AirwayTable::new())
    }

    #[test]
    fn accepted_on_first_round_with_clean_terrain() {
        let (mut graph, mut airways) = two_vertex_graph();
        let mut config = SearchConfig::default();
        config.cruise_ladder = vec![CruiseLevel(100)];
        let mut process = ScriptedProcess {
            rounds: vec![vec!["NO ERRORS".to_string()]],
            next: 0,
        };
        let mut intel = NoOpIntel;
        let terrain = SeaLevelTerrain;
        let outcome = run(
            &mut graph,
            &mut airways,
            &mut config,
            &mut process,
            &mut intel,
            &terrain,
            420,
            route(),
            RepairBudget::default(),
        )
        .unwrap();
        assert_eq!(outcome.status, StoppingStatus::ACCEPTED);
    }

    fn dct_segment_graph() -> (LGraph, crate::graph::AirwayTable) {
        let mut g = LGraph::new();
        let a = g.add_vertex(vertex("XIRDO"));
        let b = g.add_vertex(vertex("ARDEP"));
        let mut fwd = Edge::new(AirwayIndex::DCT, 1, Length::nm(30.0), 45.0);
        fwd.set_metric(0, 30.0);
        g.add_edge(a, b, fwd);
        (g, crate::graph::AirwayTable::new())
    }

    fn dct_segment_route() -> FlightPlan {
        FlightPlan {
            waypoints: vec![
                crate::flightplan::FlightPlanWaypoint {
                    ident: "XIRDO".to_string(),
                    coordinate: Point::from_deg(50.0, 8.0),
                    path_code: PathCode::Sid,
                    level: CruiseLevel(100),
                    airway: None,
                },
                crate::flightplan::FlightPlanWaypoint {
                    ident: "ARDEP".to_string(),
                    coordinate: Point::from_deg(50.1, 8.1),
                    path_code: PathCode::Dct,
                    level: CruiseLevel(100),
                    airway: None,
                },
            ],
        }
    }

    #[test]
    fn dct_rejection_is_killed_then_accepted() {
        let (mut graph, mut airways) = dct_segment_graph();
        let mut config = SearchConfig::default();
        config.cruise_ladder = vec![CruiseLevel(100)];
        let mut process = ScriptedProcess {
            rounds: vec![
                vec!["ROUTE52: THE DCT SEGMENT XIRDO..ARDEP IS FORBIDDEN".to_string()],
                vec!["NO ERRORS".to_string()],
            ],
            next: 0,
        };
        let mut intel = NoOpIntel;
        let terrain = SeaLevelTerrain;
        let outcome = run(
            &mut graph,
            &mut airways,
            &mut config,
            &mut process,
            &mut intel,
            &terrain,
            420,
            dct_segment_route(),
            RepairBudget::default(),
        )
        .unwrap();
        assert_eq!(outcome.status, StoppingStatus::ACCEPTED);
        let eidx = graph.find_edge(
            graph.find_vertex("XIRDO").unwrap(),
            graph.find_vertex("ARDEP").unwrap(),
            AirwayIndex::DCT,
        );
        assert!(eidx.map_or(true, |e| !graph.edge(e).unwrap().is_valid()));
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Ground-clearance finalizer (spec.md §4.K, component K): the last
//! check run on a candidate route before it is accepted, independent of
//! whatever the validator already approved.

use crate::db::TerrainQuery;
use crate::flightplan::FlightPlan;
use crate::geom::Length;
use crate::graph::LGraph;
use crate::perf::CruiseLevel;

const CORRIDOR_NM: f64 = 5.0;

/// Minimum safe altitude for a 5-nm corridor under `from`-`to`: 1,000 ft
/// above the highest terrain, plus another 1,000 ft if that terrain is
/// itself at or above 5,000 ft MSL (spec.md §4.D.1, §4.K).
fn min_altitude_ft(terrain: &dyn TerrainQuery, from: crate::geom::Point, to: crate::geom::Point) -> i32 {
    let elevation = terrain.max_elevation_ft(from, to, Length::nm(CORRIDOR_NM));
    elevation + if elevation >= 5_000 { 2_000 } else { 1_000 }
}

/// Re-check every edge of `route` against fresh terrain data and kill
/// any cruise level below the recomputed minimum altitude, in both
/// directions (spec.md §4.K). Returns whether anything changed; the
/// caller must force another validator round when it does.
pub fn finalize(graph: &mut LGraph, terrain: &dyn TerrainQuery, ladder: &[CruiseLevel], route: &FlightPlan) -> bool {
    let mut changed = false;
    for pair in route.waypoints.windows(2) {
        let minalt = min_altitude_ft(terrain, pair[0].coordinate, pair[1].coordinate);
        let (Some(u), Some(v)) = (graph.find_vertex(&pair[0].ident), graph.find_vertex(&pair[1].ident)) else {
            continue;
        };
        for (a, b) in [(u, v), (v, u)] {
            for eidx in graph.out_edges(a).collect::<Vec<_>>() {
                if graph.edge_endpoints(eidx).map(|(_, to)| to) != Some(b) {
                    continue;
                }
                let Some(edge) = graph.edge_mut(eidx) else { continue };
                for (pi, level) in ladder.iter().enumerate() {
                    if level.feet() < minalt && edge.is_valid_at(pi) {
                        edge.invalidate(pi);
                        changed = true;
                    }
                }
            }
        }
    }
    changed
}

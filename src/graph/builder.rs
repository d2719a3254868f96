// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The graph builder (spec.md §4.D, component D): ingests airways,
//! bypasses invalid supernodes, applies exclude regions and intel,
//! adds DCT and SID/STAR edges, and runs the final metric pass.

use std::cell::RefCell;
use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;

use super::{AirwayIndex, AirwayTable, Edge, LGraph, Vertex};
use crate::airspace::AirspaceCache;
use crate::config::{ExcludeRegion, ExcludeSelector, ExplicitProcedureFix, SearchConfig};
use crate::db::{AirspaceQuery, AirwayQuery, DbHandle, MapElementData, NavaidQuery, TerrainQuery, WaypointQuery};
use crate::error::{NoFixWithinToleranceSnafu, Result};
use crate::geom::{BoundingBox, Length, Point};
use crate::intel::IntelStore;
use crate::perf::{ground_speed_kt, Performance};
use crate::tfr::{DctCheckResult, DctParameters, TfrEngine};

/// Terrain-corridor half-width used for minimum-altitude computation
/// (spec.md §4.D.1, §4.K).
const TERRAIN_CORRIDOR_NM: f64 = 5.0;

/// The database and engine collaborators the builder needs, bundled so
/// `GraphBuilder::build`'s signature stays manageable (spec.md §4.D
/// draws on nearly every external collaborator trait at once).
pub struct BuildCollaborators<'a, Q: AirspaceQuery> {
    pub airways: &'a dyn AirwayQuery,
    pub navaids: &'a dyn NavaidQuery,
    pub waypoints: &'a dyn WaypointQuery,
    pub terrain: &'a dyn TerrainQuery,
    pub airspace: Option<&'a AirspaceCache<'a, Q>>,
}

/// The two synthetic terminal vertices the builder creates for every
/// search (spec.md §4.D.5).
#[derive(Copy, Clone, Debug)]
pub struct Terminals {
    pub dep: NodeIndex,
    pub dest: NodeIndex,
}

/// Builds a routing graph for one search (spec.md §4.D).
pub struct GraphBuilder<'a> {
    config: &'a SearchConfig,
    /// DCT check results keyed by endpoint-ident pair, tagged with the
    /// TFR engine's generation at the time they were computed (spec.md
    /// §4.D.4's DCT cache; see DESIGN.md). Reused across repeated
    /// builds against an unchanged rule set.
    dct_cache: RefCell<HashMap<(String, String), (u64, DctCheckResult)>>,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            dct_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Look up a cached DCT check, recomputing (and re-caching) it if
    /// the engine's generation has moved on since it was last computed.
    fn cached_dct_check(&self, tfr: &dyn TfrEngine, params: &DctParameters) -> DctCheckResult {
        let key = (params.id0.clone(), params.id1.clone());
        let generation = tfr.generation();
        if let Some((cached_gen, cached)) = self.dct_cache.borrow().get(&key) {
            if *cached_gen == generation {
                return cached.clone();
            }
        }
        let result = tfr.check_dct(params);
        self.dct_cache.borrow_mut().insert(key, (generation, result.clone()));
        result
    }

    /// Run the full build pipeline, D.1 through D.7, returning the
    /// graph and its departure/destination terminals.
    #[allow(clippy::too_many_arguments)]
    pub fn build<Q: AirspaceQuery>(
        &self,
        bbox: BoundingBox,
        collab: &BuildCollaborators<'_, Q>,
        perf: &dyn Performance,
        tfr: &dyn TfrEngine,
        intel: &dyn IntelStore,
        airways: &mut AirwayTable,
        dep_airport: (String, Point),
        dest_airport: (String, Point),
    ) -> Result<(LGraph, Terminals)> {
        let mut graph = LGraph::new();
        self.ingest_airways(&mut graph, bbox, collab, airways, perf.level_count());
        self.bypass_invalid_supernodes(&mut graph);
        self.apply_exclude_regions(&mut graph, collab);
        self.add_dct_edges(&mut graph, bbox, collab.terrain, tfr, perf.level_count());
        let terminals = self.add_sid_star_connectors(&mut graph, dep_airport, dest_airport, perf.level_count())?;
        self.apply_intel(&mut graph, bbox, intel, airways);
        self.compute_final_metrics(&mut graph, perf);
        graph.prune_invalid_edges();
        Ok((graph, terminals))
    }

    /// D.1: load airways/navaids/intersections in `bbox` and add
    /// vertices and edges for each.
    fn ingest_airways<Q: AirspaceQuery>(
        &self,
        graph: &mut LGraph,
        bbox: BoundingBox,
        collab: &BuildCollaborators<'_, Q>,
        airways: &mut AirwayTable,
        level_count: usize,
    ) {
        for handle in collab.navaids.navaids_in_bbox(bbox) {
            add_if_significant(graph, handle);
        }
        for handle in collab.waypoints.waypoints_in_bbox(bbox) {
            add_if_significant(graph, handle);
        }

        for segment in collab.airways.airways_in_bbox(bbox) {
            add_if_significant(graph, segment.from.clone());
            add_if_significant(graph, segment.to.clone());
            let Some(u) = graph.find_vertex(segment.from.ident()) else {
                continue;
            };
            let Some(v) = graph.find_vertex(segment.to.ident()) else {
                continue;
            };

            let minalt = terrain_min_altitude(collab.terrain, segment.from.coordinate(), segment.to.coordinate());
            let airway = airways.lookup(&segment.name, true);
            let distance = segment.from.coordinate().distance(segment.to.coordinate());

            if segment.forward {
                self.add_airway_direction(graph, u, v, airway, &segment, minalt, distance, level_count);
            }
            if segment.backward {
                self.add_airway_direction(graph, v, u, airway, &segment, minalt, distance, level_count);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_airway_direction(
        &self,
        graph: &mut LGraph,
        u: NodeIndex,
        v: NodeIndex,
        airway: AirwayIndex,
        segment: &crate::db::AirwaySegment,
        minalt: i32,
        distance: Length,
        level_count: usize,
    ) {
        let course = graph.vertex(u).map_or(0.0, |vx| vx.coordinate.true_course(graph.vertex(v).unwrap().coordinate));
        let mut edge = Edge::new(airway, level_count, distance, course);
        let mut dct = Edge::new(AirwayIndex::DCT, level_count, distance, course);

        let (base, top) = if self.config.honour_airway_levels {
            (segment.base_level_ft, segment.top_level_ft)
        } else {
            (i32::MIN, i32::MAX)
        };

        for pi in 0..level_count {
            let feet = self.config.cruise_ladder.get(pi).map_or(0, |l| l.feet());
            if feet < minalt {
                continue;
            }
            let in_band = feet >= base && feet <= top;
            if in_band && !airway.is_dct() {
                edge.set_metric(pi, distance.value_nm());
            } else {
                dct.set_metric(pi, distance.value_nm());
            }
        }
        if !airway.is_dct() {
            graph.add_edge(u, v, edge);
        }
        graph.add_edge(u, v, dct);
    }

    /// D.2: bypass vertices that fail I1 or are not routable,
    /// synthesising direct edges over matching in/out airway pairs.
    fn bypass_invalid_supernodes(&self, graph: &mut LGraph) {
        let candidates: Vec<NodeIndex> = graph
            .vertex_indices()
            .filter(|&v| {
                graph.vertex(v).is_some_and(|vertex| {
                    !Vertex::is_valid_ident(&vertex.ident) || !vertex.handle.is_routable()
                })
            })
            .collect();

        for v in candidates {
            let ins: Vec<_> = graph.in_edges(v).collect();
            let outs: Vec<_> = graph.out_edges(v).collect();
            for &in_idx in &ins {
                let Some((s, _)) = graph.edge_endpoints(in_idx) else { continue };
                if s == v {
                    continue;
                }
                let Some(in_edge) = graph.edge(in_idx).cloned() else { continue };
                for &out_idx in &outs {
                    let Some((_, t)) = graph.edge_endpoints(out_idx) else { continue };
                    if t == v || t == s {
                        continue;
                    }
                    let Some(out_edge) = graph.edge(out_idx).cloned() else { continue };
                    if in_edge.airway != out_edge.airway {
                        continue;
                    }
                    let mut bypass = Edge::new(
                        in_edge.airway,
                        in_edge.level_count().min(out_edge.level_count()),
                        Length::nm(in_edge.distance.value_nm() + out_edge.distance.value_nm()),
                        in_edge.true_course,
                    );
                    for level in 0..bypass.level_count() {
                        let a = in_edge.metric_at(level);
                        let b = out_edge.metric_at(level);
                        if a.is_finite() && b.is_finite() {
                            bypass.set_metric(level, a + b);
                        }
                    }
                    graph.add_edge(s, t, bypass);
                }
            }
            graph.disconnect(v);
        }
    }

    /// D.3: rescale or invalidate edges crossing a configured exclude
    /// region.
    fn apply_exclude_regions<Q: AirspaceQuery>(&self, graph: &mut LGraph, collab: &BuildCollaborators<'_, Q>) {
        for region in &self.config.exclude_regions {
            let levels = self.levels_in_band(region.floor_ft, region.ceiling_ft);
            let edges: Vec<_> = graph.vertex_indices().flat_map(|u| graph.out_edges(u).collect::<Vec<_>>()).collect();
            for eidx in edges {
                let Some((u, v)) = graph.edge_endpoints(eidx) else { continue };
                let (Some(uv), Some(vv)) = (graph.vertex(u), graph.vertex(v)) else { continue };
                if !self.segment_in_region(region, collab, uv.coordinate, vv.coordinate) {
                    continue;
                }
                let Some(edge) = graph.edge_mut(eidx) else { continue };
                let is_dct = edge.airway.is_dct();
                for &level in &levels {
                    if !edge.is_valid_at(level) {
                        continue;
                    }
                    let metric = edge.metric_at(level);
                    if is_dct {
                        if metric <= region.dct_limit {
                            edge.set_metric(level, metric * region.dct_scale + region.dct_offset);
                        } else {
                            edge.invalidate(level);
                        }
                    } else if metric > region.awy_limit {
                        edge.invalidate(level);
                    }
                }
            }
        }
    }

    fn segment_in_region<Q: AirspaceQuery>(
        &self,
        region: &ExcludeRegion,
        collab: &BuildCollaborators<'_, Q>,
        p0: Point,
        p1: Point,
    ) -> bool {
        match &region.selector {
            ExcludeSelector::BoundingBox { sw_lat, sw_lon, ne_lat, ne_lon } => {
                let bbox = BoundingBox {
                    sw: Point::from_units(*sw_lat, *sw_lon),
                    ne: Point::from_units(*ne_lat, *ne_lon),
                };
                bbox.contains(p0) || bbox.contains(p1)
            }
            ExcludeSelector::Airspace { ident, class, typecode } => collab.airspace.is_some_and(|cache| {
                cache.is_intersect(
                    ident,
                    class.as_deref(),
                    typecode.as_deref(),
                    p0,
                    p1,
                    Some(region.floor_ft),
                    Some(region.ceiling_ft),
                )
            }),
        }
    }

    /// D.4: add DCT edges between nearby vertex pairs, then cull DCT
    /// edges far longer than the best available airway route.
    fn add_dct_edges(
        &self,
        graph: &mut LGraph,
        bbox: BoundingBox,
        terrain: &dyn TerrainQuery,
        tfr: &dyn TfrEngine,
        level_count: usize,
    ) {
        let expanded = bbox.expand(Length::nm(self.config.dct_limit_nm));
        let vertices: Vec<NodeIndex> = graph
            .vertex_indices()
            .filter(|&v| graph.vertex(v).is_some_and(|vx| expanded.contains(vx.coordinate)))
            .collect();

        for (i, &u) in vertices.iter().enumerate() {
            for &v in &vertices[i + 1..] {
                let (Some(uv), Some(vv)) = (graph.vertex(u), graph.vertex(v)) else { continue };
                let distance = uv.coordinate.distance(vv.coordinate);
                let params = DctParameters {
                    id0: uv.ident.clone(),
                    coord0: uv.coordinate,
                    id1: vv.ident.clone(),
                    coord1: vv.coordinate,
                    altmin_ft: self.config.cruise_ladder.first().map_or(0, |l| l.feet()),
                    altmax_ft: self.config.cruise_ladder.last().map_or(0, |l| l.feet()),
                };
                let whitelisted = distance.value_nm() <= self.config.dct_limit_nm;
                let check = self.cached_dct_check(tfr, &params);
                if !whitelisted && check.forward.is_empty() && check.backward.is_empty() {
                    continue;
                }
                let minalt = terrain_min_altitude(terrain, uv.coordinate, vv.coordinate);
                self.add_dct_direction(graph, u, v, distance, &check.forward, minalt, level_count);
                self.add_dct_direction(graph, v, u, distance, &check.backward, minalt, level_count);
            }
        }
        graph.suppress_dct_where_airway_valid();
        self.cull_long_dct_edges(graph);
    }

    fn add_dct_direction(
        &self,
        graph: &mut LGraph,
        u: NodeIndex,
        v: NodeIndex,
        distance: Length,
        permitted: &crate::altitude::IntervalSet,
        minalt: i32,
        level_count: usize,
    ) {
        let course = graph.vertex(u).map_or(0.0, |vx| vx.coordinate.true_course(graph.vertex(v).unwrap().coordinate));
        let mut edge = Edge::new(AirwayIndex::DCT, level_count, distance, course);
        let mut any = false;
        for (pi, level) in self.config.cruise_ladder.iter().enumerate().take(level_count) {
            if level.feet() >= minalt && permitted.contains(level.feet()) {
                edge.set_metric(pi, distance.value_nm());
                any = true;
            }
        }
        if any {
            graph.add_edge(u, v, edge);
        }
    }

    /// Best-distance-only Dijkstra over airway edges, then remove any
    /// DCT edge whose direct distance exceeds `dct_airway_tolerance`
    /// times the best airway distance between the same endpoints.
    fn cull_long_dct_edges(&self, graph: &mut LGraph) {
        let vertices: Vec<NodeIndex> = graph.vertex_indices().collect();
        for &src in &vertices {
            let best = airway_only_distances(graph, src);
            let dct_edges: Vec<_> = graph.out_edges(src).collect();
            for eidx in dct_edges {
                let Some(edge) = graph.edge(eidx) else { continue };
                if !edge.airway.is_dct() {
                    continue;
                }
                let Some((_, dst)) = graph.edge_endpoints(eidx) else { continue };
                if let Some(&airway_dist) = best.get(&dst) {
                    if edge.distance.value_nm() > airway_dist * self.config.dct_airway_tolerance {
                        if let Some(edge) = graph.edge_mut(eidx) {
                            edge.invalidate_all();
                        }
                    }
                }
            }
        }
    }

    /// D.5: create `Vdep`/`Vdest` and connect them within the SID/STAR
    /// radius (or an explicit fix override).
    fn add_sid_star_connectors(
        &self,
        graph: &mut LGraph,
        dep_airport: (String, Point),
        dest_airport: (String, Point),
        level_count: usize,
    ) -> Result<Terminals> {
        let dep = graph.add_vertex(Vertex::new(DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: format!("{}/DEP", dep_airport.0),
            coordinate: dep_airport.1,
        }))));
        let dest = graph.add_vertex(Vertex::new(DbHandle::MapElement(std::rc::Rc::new(MapElementData {
            ident: format!("{}/DEST", dest_airport.0),
            coordinate: dest_airport.1,
        }))));

        self.connect_terminal(
            graph,
            dep,
            dep_airport.1,
            self.config.sid_radius_nm,
            self.config.explicit_sid_fix.as_ref(),
            self.config.sid_penalty,
            AirwayIndex::SID,
            level_count,
            true,
        )?;
        self.connect_terminal(
            graph,
            dest,
            dest_airport.1,
            self.config.star_radius_nm,
            self.config.explicit_star_fix.as_ref(),
            self.config.star_penalty,
            AirwayIndex::STAR,
            level_count,
            false,
        )?;

        Ok(Terminals { dep, dest })
    }

    #[allow(clippy::too_many_arguments)]
    fn connect_terminal(
        &self,
        graph: &mut LGraph,
        terminal: NodeIndex,
        airport_point: Point,
        radius_nm: f64,
        explicit_fix: Option<&ExplicitProcedureFix>,
        penalty: Option<f64>,
        airway: AirwayIndex,
        level_count: usize,
        outgoing: bool,
    ) -> Result<()> {
        let targets: Vec<NodeIndex> = if let Some(fix) = explicit_fix {
            let nearest = graph
                .vertex_indices()
                .filter(|&v| v != terminal)
                .min_by(|&a, &b| {
                    let da = graph.vertex(a).map_or(f64::INFINITY, |vx| vx.coordinate.distance(airport_point).value_nm());
                    let db = graph.vertex(b).map_or(f64::INFINITY, |vx| vx.coordinate.distance(airport_point).value_nm());
                    da.total_cmp(&db)
                })
                .filter(|&v| {
                    graph
                        .vertex(v)
                        .is_some_and(|vx| vx.coordinate.distance(airport_point) <= fix.tolerance)
                });
            match nearest {
                Some(v) => vec![v],
                None => {
                    return NoFixWithinToleranceSnafu { ident: fix.ident.clone() }.fail();
                }
            }
        } else {
            graph
                .vertex_indices()
                .filter(|&v| v != terminal)
                .filter(|&v| {
                    graph
                        .vertex(v)
                        .is_some_and(|vx| vx.coordinate.distance(airport_point).value_nm() <= radius_nm)
                })
                .collect()
        };

        for v in targets {
            let Some(vx) = graph.vertex(v) else { continue };
            let distance = airport_point.distance(vx.coordinate);
            let metric = distance.value_nm() + self.config.airport_connection_offset;
            let metric = penalty.map_or(metric, |p| metric * p);
            let course = if outgoing {
                airport_point.true_course(vx.coordinate)
            } else {
                vx.coordinate.true_course(airport_point)
            };
            let mut edge = Edge::new(airway, level_count, distance, course);
            for pi in 0..level_count {
                edge.set_metric(pi, metric);
            }
            if outgoing {
                graph.add_edge(terminal, v, edge);
            } else {
                graph.add_edge(v, terminal, edge);
            }
        }
        Ok(())
    }

    /// D.6: replay the persistent intel store within `bbox`.
    fn apply_intel(&self, graph: &mut LGraph, bbox: BoundingBox, intel: &dyn IntelStore, airways: &mut AirwayTable) {
        for point in intel.forbidden_points(bbox) {
            if let Some(v) = graph.find_vertex(&point.ident) {
                graph.disconnect(v);
            }
        }
        for segment in intel.forbidden_segments(bbox) {
            let (Some(u), Some(v)) = (graph.find_vertex(&segment.from_ident), graph.find_vertex(&segment.to_ident))
            else {
                continue;
            };
            let airway = airways.lookup(&segment.airway, false);
            if let Some(eidx) = graph.find_edge(u, v, airway) {
                let levels = self.levels_in_band(segment.from_alt_ft.min(segment.to_alt_ft), segment.from_alt_ft.max(segment.to_alt_ft));
                if let Some(edge) = graph.edge_mut(eidx) {
                    for level in levels {
                        edge.invalidate(level);
                    }
                }
            }
        }
    }

    /// D.7: final per-level metric: base distance, DCT adjustment, wind
    /// correction, metric-per-nmi multiplier.
    fn compute_final_metrics(&self, graph: &mut LGraph, perf: &dyn Performance) {
        let edges: Vec<_> = graph.vertex_indices().flat_map(|u| graph.out_edges(u).collect::<Vec<_>>()).collect();
        for eidx in edges {
            let Some((u, v)) = graph.edge_endpoints(eidx) else { continue };
            let (Some(uv), Some(vv)) = (graph.vertex(u), graph.vertex(v)) else { continue };
            let midpoint = uv.coordinate.midpoint(vv.coordinate);
            let Some(edge) = graph.edge_mut(eidx) else { continue };
            let course = edge.true_course;
            let distance_nm = edge.distance.value_nm();
            let is_dct = edge.airway.is_dct();
            for pi in 0..edge.level_count() {
                if !edge.is_valid_at(pi) {
                    continue;
                }
                let mut metric = distance_nm;
                let wind = perf.wind(midpoint, pi);
                let gs = ground_speed_kt(perf.tas_kt(pi), course, wind);
                if gs > 0.0 {
                    metric *= perf.tas_kt(pi) / gs;
                }
                if is_dct {
                    metric = metric * self.config.dct_penalty + self.config.dct_offset;
                }
                metric *= perf.metric_per_nmi(pi);
                edge.set_metric(pi, metric);
            }
        }
    }

    fn levels_in_band(&self, floor_ft: i32, ceiling_ft: i32) -> Vec<usize> {
        self.config
            .cruise_ladder
            .iter()
            .enumerate()
            .filter(|(_, level)| level.feet() >= floor_ft && level.feet() <= ceiling_ft)
            .map(|(i, _)| i)
            .collect()
    }
}

fn add_if_significant(graph: &mut LGraph, handle: DbHandle) {
    let ident = handle.ident().to_string();
    if !Vertex::is_valid_ident(&ident) {
        return;
    }
    graph.add_vertex(Vertex::new(handle));
}

/// Terrain-corridor minimum altitude (spec.md §4.D.1): 1,000 ft above
/// the highest terrain under a 5-nm corridor, plus an extra 1,000 ft if
/// that terrain is itself at or above 5,000 ft MSL.
fn terrain_min_altitude(terrain: &dyn TerrainQuery, from: Point, to: Point) -> i32 {
    let elevation = terrain.max_elevation_ft(from, to, Length::nm(TERRAIN_CORRIDOR_NM));
    let margin = if elevation >= 5_000 { 2_000 } else { 1_000 };
    elevation + margin
}

/// Best distance to every reachable vertex from `src` following only
/// named-airway edges, ignoring cruise level (spec.md §4.D.4's
/// all-pairs post-pass: "airways preferred" only needs a single
/// best-distance figure per endpoint pair, not a per-level one).
fn airway_only_distances(graph: &LGraph, src: NodeIndex) -> HashMap<NodeIndex, f64> {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    let mut dist: HashMap<NodeIndex, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();
    dist.insert(src, 0.0);
    heap.push(Reverse((ordered_float::OrderedFloat(0.0), src.index())));

    while let Some(Reverse((d, raw))) = heap.pop() {
        let u = NodeIndex::new(raw);
        if dist.get(&u).copied().unwrap_or(f64::INFINITY) < d.0 {
            continue;
        }
        for eidx in graph.out_edges(u) {
            let Some(edge) = graph.edge(eidx) else { continue };
            if !edge.airway.is_airway() || !edge.is_valid() {
                continue;
            }
            let Some((_, v)) = graph.edge_endpoints(eidx) else { continue };
            let nd = d.0 + edge.distance.value_nm();
            if nd < dist.get(&v).copied().unwrap_or(f64::INFINITY) {
                dist.insert(v, nd);
                heap.push(Reverse((ordered_float::OrderedFloat(nd), v.index())));
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AirwaySegment, NavaidHandleData};
    use crate::perf::Wind;

    struct Fixtures {
        navaid_klo: DbHandle,
        navaid_rdg: DbHandle,
    }

    impl Fixtures {
        fn new() -> Self {
            Self {
                navaid_klo: DbHandle::Navaid(std::rc::Rc::new(NavaidHandleData {
                    ident: "KLO".to_string(),
                    coordinate: Point::from_deg(50.0, 8.0),
                })),
                navaid_rdg: DbHandle::Navaid(std::rc::Rc::new(NavaidHandleData {
                    ident: "RDG".to_string(),
                    coordinate: Point::from_deg(50.2, 8.4),
                })),
            }
        }
    }

    struct StubAirways(Vec<AirwaySegment>);
    impl AirwayQuery for StubAirways {
        fn airways_in_bbox(&self, _bbox: BoundingBox) -> Vec<AirwaySegment> {
            self.0.clone()
        }
    }
    struct StubNavaids(Vec<DbHandle>);
    impl NavaidQuery for StubNavaids {
        fn navaids_in_bbox(&self, _bbox: BoundingBox) -> Vec<DbHandle> {
            self.0.clone()
        }
    }
    struct EmptyWaypoints;
    impl WaypointQuery for EmptyWaypoints {
        fn waypoints_in_bbox(&self, _bbox: BoundingBox) -> Vec<DbHandle> {
            Vec::new()
        }
    }
    struct FlatTerrain;
    impl TerrainQuery for FlatTerrain {
        fn max_elevation_ft(&self, _from: Point, _to: Point, _corridor: Length) -> i32 {
            1_000
        }
    }
    struct NoOpIntel;
    impl IntelStore for NoOpIntel {
        fn forbidden_points(&self, _bbox: BoundingBox) -> Vec<crate::intel::ForbiddenPoint> {
            Vec::new()
        }
        fn forbidden_segments(&self, _bbox: BoundingBox) -> Vec<crate::intel::ForbiddenSegment> {
            Vec::new()
        }
        fn add_forbidden_point(&mut self, _point: crate::intel::ForbiddenPoint) {}
        fn add_forbidden_segment(&mut self, _segment: crate::intel::ForbiddenSegment) {}
    }
    struct StubAirspace;
    impl AirspaceQuery for StubAirspace {
        fn airspaces(&self, _ident: &str, _class: Option<&str>, _typecode: Option<&str>) -> Vec<crate::airspace::AirspaceRecord> {
            Vec::new()
        }
    }

    struct PermissiveTfr;
    impl TfrEngine for PermissiveTfr {
        fn check_dct(&self, params: &DctParameters) -> crate::tfr::DctCheckResult {
            let set = crate::altitude::IntervalSet::single(params.altmin_ft, params.altmax_ft);
            crate::tfr::DctCheckResult { forward: set.clone(), backward: set }
        }
        fn check_fplan(&self, _route: &crate::flightplan::FlightPlan, _equipment: &crate::tfr::Equipment) -> crate::tfr::FplanCheckResult {
            crate::tfr::FplanCheckResult::default()
        }
        fn generation(&self) -> u64 {
            0
        }
    }
    struct FlatPerf(usize);
    impl Performance for FlatPerf {
        fn level_count(&self) -> usize {
            self.0
        }
        fn level(&self, index: usize) -> crate::perf::CruiseLevel {
            crate::perf::CruiseLevel(100 + index as u16 * 20)
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

    fn config() -> SearchConfig {
        SearchConfig {
            cruise_ladder: vec![crate::perf::CruiseLevel(100), crate::perf::CruiseLevel(120)],
            dct_limit_nm: 200.0,
            sid_radius_nm: 100.0,
            star_radius_nm: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn build_connects_departure_to_destination() {
        let fx = Fixtures::new();
        let cfg = config();
        let builder = GraphBuilder::new(&cfg);
        let airways_db = StubAirways(vec![AirwaySegment {
            name: "UL607".to_string(),
            from: fx.navaid_klo.clone(),
            to: fx.navaid_rdg.clone(),
            forward: true,
            backward: true,
            base_level_ft: 0,
            top_level_ft: 60_000,
        }]);
        let navaids = StubNavaids(vec![fx.navaid_klo.clone(), fx.navaid_rdg.clone()]);
        let waypoints = EmptyWaypoints;
        let terrain = FlatTerrain;
        let intel = NoOpIntel;
        let tfr = PermissiveTfr;
        let perf = FlatPerf(2);
        let mut table = AirwayTable::new();

        let collab: BuildCollaborators<'_, StubAirspace> = BuildCollaborators {
            airways: &airways_db,
            navaids: &navaids,
            waypoints: &waypoints,
            terrain: &terrain,
            airspace: None,
        };

        let bbox = BoundingBox {
            sw: Point::from_deg(49.0, 7.0),
            ne: Point::from_deg(51.0, 9.0),
        };
        let (graph, terminals) = builder
            .build(
                bbox,
                &collab,
                &perf,
                &tfr,
                &intel,
                &mut table,
                ("EDDH".to_string(), Point::from_deg(49.9, 7.9)),
                ("EDDF".to_string(), Point::from_deg(50.1, 8.1)),
            )
            .unwrap();

        assert!(graph.find_vertex("KLO").is_some());
        assert!(graph.out_edges(terminals.dep).next().is_some());
    }
}

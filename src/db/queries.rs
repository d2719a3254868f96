// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use crate::db::DbHandle;
use crate::geom::{BoundingBox, Length, Point};

/// One directed-or-bidirectional airway segment as loaded from the
/// database (spec.md §4.D.1).
#[derive(Clone, Debug)]
pub struct AirwaySegment {
    pub name: String,
    pub from: DbHandle,
    pub to: DbHandle,
    pub forward: bool,
    pub backward: bool,
    pub base_level_ft: i32,
    pub top_level_ft: i32,
}

/// Navaids within a bounding box (spec.md §6).
pub trait NavaidQuery {
    fn navaids_in_bbox(&self, bbox: BoundingBox) -> Vec<DbHandle>;
}

/// ICAO intersections (and other waypoint-like fixes) within a bounding
/// box (spec.md §6).
pub trait WaypointQuery {
    fn waypoints_in_bbox(&self, bbox: BoundingBox) -> Vec<DbHandle>;
}

/// Airways intersecting a bounding box (spec.md §6, §4.D.1).
pub trait AirwayQuery {
    fn airways_in_bbox(&self, bbox: BoundingBox) -> Vec<AirwaySegment>;
}

/// Terrain elevation along a corridor, consumed by the graph builder's
/// minimum-altitude computation (spec.md §4.D.1) and the
/// ground-clearance finalizer (spec.md §4.K).
pub trait TerrainQuery {
    /// Maximum terrain elevation (feet MSL) under a corridor of the
    /// given half-width between `from` and `to`.
    fn max_elevation_ft(&self, from: Point, to: Point, corridor: Length) -> i32;
}

/// Raw airspace records matching an identifier/class/typecode filter
/// (spec.md §6); see [`crate::airspace`] for the composed-airspace
/// logic built on top.
pub trait AirspaceQuery {
    fn airspaces(
        &self,
        ident: &str,
        class: Option<&str>,
        typecode: Option<&str>,
    ) -> Vec<crate::airspace::AirspaceRecord>;
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Database collaborators (spec.md §1, §6, §9).
//!
//! Airports, navaids, waypoints, airways, airspaces and terrain are all
//! external collaborators: the core only needs a small capability set
//! out of each ("get identifier, coordinate, insert into route"), so it
//! is modelled as a tagged variant over the five database-object kinds
//! rather than a `dyn` trait-object hierarchy (spec.md §9's "Inheritance"
//! note). The actual query surfaces (by bbox, by ident, by area) are
//! traits the caller implements against its own database.

mod handle;
mod queries;

pub use handle::{DbHandle, DbObjectKind, FplWaypointData, MapElementData, PathCode};
pub use queries::{
    AirspaceQuery, AirwayQuery, AirwaySegment, NavaidQuery, TerrainQuery, WaypointQuery,
};

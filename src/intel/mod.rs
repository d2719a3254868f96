// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The persistent "CFMU intel" store (spec.md §3, §4.J): an external
//! collaborator that remembers points and segments the validator has
//! previously rejected, so the graph builder can prune them before the
//! next search ever reaches the validator.

use crate::geom::BoundingBox;

/// A point the intel store has learned is unusable (spec.md §3).
#[derive(Clone, Debug)]
pub struct ForbiddenPoint {
    pub ident: String,
}

/// A directed segment the intel store has learned is unusable at a
/// given level band on a specific airway (spec.md §3).
#[derive(Clone, Debug)]
pub struct ForbiddenSegment {
    pub from_ident: String,
    pub from_alt_ft: i32,
    pub to_ident: String,
    pub to_alt_ft: i32,
    pub airway: String,
}

/// The query/write surface the graph builder and repair loop need from
/// the persistent store (spec.md §4.J). Storage, file format and
/// bounding-box indexing are the collaborator's concern.
pub trait IntelStore {
    fn forbidden_points(&self, bbox: BoundingBox) -> Vec<ForbiddenPoint>;
    fn forbidden_segments(&self, bbox: BoundingBox) -> Vec<ForbiddenSegment>;

    /// Memoise a point the validator rejected, for replay on future
    /// searches.
    fn add_forbidden_point(&mut self, point: ForbiddenPoint);

    /// Memoise a segment the validator rejected.
    fn add_forbidden_segment(&mut self, segment: ForbiddenSegment);
}

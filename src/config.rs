// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Search parameters.
//!
//! The core is a library, not a CLI (spec.md §6 places CLI front-ends out
//! of scope), so there is no config-file loader here. Callers build one
//! of these plain structs and pass it to the graph builder / search
//! entry points, the same way the teacher passes a bare `Header` or
//! parser options around rather than reading them from a config crate.

use crate::geom::Length;

/// A region excluded from the routing graph or penalized within it
/// (spec.md §4.D.3).
#[derive(Clone, Debug)]
pub struct ExcludeRegion {
    pub selector: ExcludeSelector,
    pub floor_ft: i32,
    pub ceiling_ft: i32,
    /// DCT edges with metric at or below this limit are rescaled rather
    /// than invalidated.
    pub dct_limit: f64,
    /// Airway edges with metric at or below this limit are kept as-is.
    pub awy_limit: f64,
    pub dct_scale: f64,
    pub dct_offset: f64,
}

#[derive(Clone, Debug)]
pub enum ExcludeSelector {
    BoundingBox {
        sw_lat: i32,
        sw_lon: i32,
        ne_lat: i32,
        ne_lon: i32,
    },
    Airspace {
        ident: String,
        class: Option<String>,
        typecode: Option<String>,
    },
}

/// Explicit SID or STAR fix override (spec.md §4.D.5).
#[derive(Clone, Debug)]
pub struct ExplicitProcedureFix {
    pub ident: String,
    pub tolerance: Length,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Cruise levels available to the aircraft, ascending.
    pub cruise_ladder: Vec<crate::perf::CruiseLevel>,
    /// Whether to clamp airway segment validity to the airway's
    /// published base/top levels (spec.md §4.D.1).
    pub honour_airway_levels: bool,
    /// Maximum DCT segment length considered during graph build
    /// (spec.md §4.D.4), nautical miles.
    pub dct_limit_nm: f64,
    /// Tolerance factor applied when culling DCT edges that are not
    /// meaningfully shorter than the best airway route between the same
    /// endpoints (spec.md §4.D.4's post-pass). Named after the original
    /// implementation's `1.01` literal; see SPEC_FULL.md §2.
    pub dct_airway_tolerance: f64,
    /// Global multiplier applied to every DCT edge's final metric
    /// (spec.md §4.D.7), before the per-nmi factor. Distinct from
    /// [`ExcludeRegion::dct_scale`], which rescales only the DCT edges
    /// that cross a specific excluded region.
    pub dct_penalty: f64,
    /// Global additive offset applied to every DCT edge's final metric
    /// (spec.md §4.D.7), alongside [`Self::dct_penalty`].
    pub dct_offset: f64,
    /// Radius within which vertices are connected to the departure via
    /// a SID edge, nautical miles.
    pub sid_radius_nm: f64,
    /// Radius within which vertices are connected to the destination
    /// via a STAR edge, nautical miles.
    pub star_radius_nm: f64,
    /// Fixed additive offset applied to SID/STAR connector metrics.
    pub airport_connection_offset: f64,
    /// Optional penalty multiplier applied to all SID edges.
    pub sid_penalty: Option<f64>,
    /// Optional penalty multiplier applied to all STAR edges.
    pub star_penalty: Option<f64>,
    pub explicit_sid_fix: Option<ExplicitProcedureFix>,
    pub explicit_star_fix: Option<ExplicitProcedureFix>,
    pub exclude_regions: Vec<ExcludeRegion>,
    /// Penalty factor used by the TFR translator's metric-scaling
    /// fallback (spec.md §4.H). `reciprocal()` gives the inverse used
    /// to disprefer "closed" rule matches in the other direction.
    pub forbidden_penalty: f64,
    /// Upper bound on entries kept in the k-shortest-path pool
    /// (spec.md §4.G).
    pub pool_max_size: usize,
    /// Local iteration cap before `stoppingerroriteration` fires.
    pub max_local_iterations: u32,
    /// Validator round-trip timeout.
    pub validator_timeout_ms: u64,
    /// Number of validator child-process restarts tolerated before
    /// giving up (spec.md §4.I).
    pub validator_restart_budget: u32,
}

impl SearchConfig {
    /// The reciprocal of [`Self::forbidden_penalty`], used to
    /// disprefer in the opposite sense (spec.md §4.H's "closed" rule
    /// fallback).
    #[must_use]
    pub fn reciprocal_forbidden_penalty(&self) -> f64 {
        1.0 / self.forbidden_penalty
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cruise_ladder: Vec::new(),
            honour_airway_levels: true,
            dct_limit_nm: 100.0,
            dct_airway_tolerance: 1.01,
            dct_penalty: 1.0,
            dct_offset: 0.0,
            sid_radius_nm: 30.0,
            star_radius_nm: 30.0,
            airport_connection_offset: 0.0,
            sid_penalty: None,
            star_penalty: None,
            explicit_sid_fix: None,
            explicit_star_fix: None,
            exclude_regions: Vec::new(),
            forbidden_penalty: 1.0e6,
            pool_max_size: 16_384,
            max_local_iterations: 200,
            validator_timeout_ms: 30_000,
            validator_restart_budget: 3,
        }
    }
}

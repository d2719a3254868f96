// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Aircraft performance model — external collaborator (spec.md §1, §6).
//!
//! The core only consumes a discrete ladder of cruise levels and a
//! handful of per-level/per-level-pair numbers; the actual performance
//! modelling (fuel burn, TAS tables, wind grids) lives outside the
//! core, reached through the [`Performance`] trait.

use crate::geom::Point;

/// One rung of the cruise-level ladder, indexed by position (`pi` in
/// spec.md §4.E, §4.F). Flight level is carried as hundreds of feet,
/// matching ICAO `FLnnn` convention.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct CruiseLevel(pub u16);

impl CruiseLevel {
    #[must_use]
    pub const fn feet(self) -> i32 {
        self.0 as i32 * 100
    }
}

/// Wind at a point, used to compute ground speed on a leg.
#[derive(Copy, Clone, Debug)]
pub struct Wind {
    pub direction_true_deg: f64,
    pub speed_kt: f64,
}

/// The aircraft performance model the search consumes (spec.md §6).
pub trait Performance {
    /// Number of cruise levels, `L` in spec.md §3/§4.
    fn level_count(&self) -> usize;

    fn level(&self, index: usize) -> CruiseLevel;

    /// True airspeed at the given level, knots.
    fn tas_kt(&self, index: usize) -> f64;

    /// Metric-per-nautical-mile factor at the given level (spec.md
    /// §4.D.7's final metric pass multiplies distance by this).
    fn metric_per_nmi(&self, index: usize) -> f64;

    /// Wind forecast at `point` and the given level.
    fn wind(&self, point: Point, index: usize) -> Option<Wind>;

    /// Cost of changing from `from` to `to` (spec.md §4.E's
    /// `levelchange_metric`). Zero when `from == to`.
    fn level_change_metric(&self, from: usize, to: usize) -> f64;

    /// Minimum track-nautical-miles required to carry out a level
    /// change from `from` to `to`; the search rejects a level change
    /// whose required distance exceeds the edge's geographic length
    /// (spec.md §4.E, §6).
    fn level_change_min_track_nm(&self, from: usize, to: usize) -> f64;
}

/// Ground speed given a true course and wind, knots. Shared by the
/// graph builder's metric pass (spec.md §4.D.7) and any caller wanting
/// to render ETE.
#[must_use]
pub fn ground_speed_kt(tas_kt: f64, true_course_deg: f64, wind: Option<Wind>) -> f64 {
    let Some(wind) = wind else {
        return tas_kt;
    };
    // Wind vector in the direction it blows towards (meteorological
    // convention gives the direction it blows *from*).
    let wind_to_deg = (wind.direction_true_deg + 180.0) % 360.0;
    let course_rad = true_course_deg.to_radians();
    let wind_rad = wind_to_deg.to_radians();
    let wind_along = wind.speed_kt * (wind_rad - course_rad).cos();
    let wind_cross = wind.speed_kt * (wind_rad - course_rad).sin();
    // Crab angle to stay on course, then ground speed along course.
    let along_track = (tas_kt.powi(2) - wind_cross.powi(2)).max(0.0).sqrt();
    along_track + wind_along
}

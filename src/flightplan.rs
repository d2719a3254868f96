// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The abstract flight-plan view the core hands to its collaborators
//! (spec.md §6: "The core consumes only the abstract (sequence of
//! waypoints with path codes SID/STAR/airway/DCT) view"). ICAO
//! rendering, XML/GPX/FPL import-export and INI dumps all live outside
//! the core; this module only produces the one string shape the
//! validator wire protocol needs (spec.md §6).

use crate::db::PathCode;
use crate::error::{FlightPlanRenderSnafu, Result};
use crate::geom::Point;
use crate::perf::CruiseLevel;

/// One waypoint on a proposed route, tagged with the path code it was
/// reached by and the cruise level flown to it.
#[derive(Clone, Debug)]
pub struct FlightPlanWaypoint {
    pub ident: String,
    pub coordinate: Point,
    pub path_code: PathCode,
    pub level: CruiseLevel,
    /// The airway name carried into this waypoint, when `path_code` is
    /// [`PathCode::Airway`]; unused otherwise.
    pub airway: Option<String>,
}

/// A complete candidate route, departure to destination inclusive.
#[derive(Clone, Debug, Default)]
pub struct FlightPlan {
    pub waypoints: Vec<FlightPlanWaypoint>,
}

impl FlightPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the minimal ICAO-style route string the validator wire
    /// format expects: `N<tas> F<level> IDENT DCT IDENT AIRWAY IDENT
    /// ...`, speed/level changes only emitted when they change.
    pub fn render_icao(&self, tas_kt: u32) -> Result<String> {
        if self.waypoints.len() < 2 {
            return FlightPlanRenderSnafu {
                reason: "a flight plan needs at least a departure and a destination".to_string(),
            }
            .fail();
        }
        let mut out = format!(
            "N{tas:04} F{level:03} {ident}",
            tas = tas_kt,
            level = self.waypoints[0].level.0,
            ident = self.waypoints[0].ident,
        );
        let mut last_level = self.waypoints[0].level;
        for pair in self.waypoints.windows(2) {
            let to = &pair[1];
            if to.level != last_level {
                out.push_str(&format!(" F{:03}", to.level.0));
                last_level = to.level;
            }
            match to.path_code {
                crate::db::PathCode::Dct => out.push_str(" DCT"),
                crate::db::PathCode::Airway => {
                    if let Some(airway) = &to.airway {
                        out.push(' ');
                        out.push_str(airway);
                    }
                }
                crate::db::PathCode::Sid | crate::db::PathCode::Star => {}
            }
            out.push(' ');
            out.push_str(&to.ident);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(ident: &str, path_code: PathCode, level: u16) -> FlightPlanWaypoint {
        FlightPlanWaypoint {
            ident: ident.to_string(),
            coordinate: Point::from_deg(50.0, 8.0),
            path_code,
            level: CruiseLevel(level),
            airway: None,
        }
    }

    #[test]
    fn render_rejects_a_plan_with_fewer_than_two_waypoints() {
        let plan = FlightPlan {
            waypoints: vec![wp("EDDH", PathCode::Sid, 100)],
        };
        assert!(plan.render_icao(420).is_err());
    }

    #[test]
    fn render_inserts_dct_and_level_changes() {
        let plan = FlightPlan {
            waypoints: vec![
                wp("EDDH", PathCode::Sid, 100),
                wp("KLO", PathCode::Dct, 140),
                wp("EDDF", PathCode::Star, 140),
            ],
        };
        let rendered = plan.render_icao(420).unwrap();
        assert_eq!(rendered, "N0420 F100 EDDH F140 DCT KLO EDDF");
    }

    #[test]
    fn render_emits_airway_identifiers() {
        let mut leg = wp("RONIG", PathCode::Airway, 100);
        leg.airway = Some("N869".to_string());
        let plan = FlightPlan {
            waypoints: vec![wp("DKB", PathCode::Sid, 100), leg],
        };
        let rendered = plan.render_icao(420).unwrap();
        assert_eq!(rendered, "N0420 F100 DKB N869 RONIG");
    }
}

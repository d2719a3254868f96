// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use std::rc::Rc;

use crate::geom::Point;

/// Which kind of database object a [`DbHandle`] wraps.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DbObjectKind {
    Airport,
    Navaid,
    Waypoint,
    MapElement,
    FplWaypoint,
}

/// The path code a waypoint was reached by, carried into the rendered
/// flight plan (spec.md §6's "abstract view" of a waypoint sequence).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PathCode {
    Sid,
    Star,
    Airway,
    Dct,
}

/// A minimal record of a user-created or SID/STAR-synthesised waypoint
/// that does not correspond to a database navaid.
#[derive(Clone, Debug)]
pub struct MapElementData {
    pub ident: String,
    pub coordinate: Point,
}

/// A waypoint already placed on a flight plan by an earlier stage (e.g.
/// a previous search iteration); carried through unchanged.
#[derive(Clone, Debug)]
pub struct FplWaypointData {
    pub ident: String,
    pub coordinate: Point,
    pub path_code: PathCode,
}

/// An opaque handle to an underlying database object (spec.md §3's
/// Vertex attribute, §9's tagged-variant recommendation).
///
/// Holding `Rc<T>` rather than a raw reference lets a [`DbHandle`] be
/// cloned freely into graph vertices, route waypoint lists and
/// flight-plan records without the graph needing to participate in a
/// reference cycle back to the database (spec.md §9's "Cyclic
/// references" note).
#[derive(Clone, Debug)]
pub enum DbHandle {
    Airport(Rc<AirportHandleData>),
    Navaid(Rc<NavaidHandleData>),
    Waypoint(Rc<WaypointHandleData>),
    MapElement(Rc<MapElementData>),
    FplWaypoint(Rc<FplWaypointData>),
}

#[derive(Clone, Debug)]
pub struct AirportHandleData {
    pub icao_ident: String,
    pub coordinate: Point,
}

#[derive(Clone, Debug)]
pub struct NavaidHandleData {
    pub ident: String,
    pub coordinate: Point,
}

#[derive(Clone, Debug)]
pub struct WaypointHandleData {
    pub ident: String,
    pub coordinate: Point,
}

impl DbHandle {
    #[must_use]
    pub fn kind(&self) -> DbObjectKind {
        match self {
            Self::Airport(_) => DbObjectKind::Airport,
            Self::Navaid(_) => DbObjectKind::Navaid,
            Self::Waypoint(_) => DbObjectKind::Waypoint,
            Self::MapElement(_) => DbObjectKind::MapElement,
            Self::FplWaypoint(_) => DbObjectKind::FplWaypoint,
        }
    }

    #[must_use]
    pub fn ident(&self) -> &str {
        match self {
            Self::Airport(a) => &a.icao_ident,
            Self::Navaid(n) => &n.ident,
            Self::Waypoint(w) => &w.ident,
            Self::MapElement(m) => &m.ident,
            Self::FplWaypoint(f) => &f.ident,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Point {
        match self {
            Self::Airport(a) => a.coordinate,
            Self::Navaid(n) => n.coordinate,
            Self::Waypoint(w) => w.coordinate,
            Self::MapElement(m) => m.coordinate,
            Self::FplWaypoint(f) => f.coordinate,
        }
    }

    /// Whether this object can be a routable en-route point (spec.md
    /// §4.D.2's "routable navaid or ICAO intersection" test).
    #[must_use]
    pub fn is_routable(&self) -> bool {
        matches!(
            self.kind(),
            DbObjectKind::Navaid | DbObjectKind::Waypoint | DbObjectKind::MapElement
        )
    }

    /// Renders this handle as a flight-plan waypoint record tagged
    /// with the path code it was reached by ("insert into route",
    /// spec.md §9).
    #[must_use]
    pub fn to_flight_plan_waypoint(&self, path_code: PathCode) -> FplWaypointData {
        FplWaypointData {
            ident: self.ident().to_string(),
            coordinate: self.coordinate(),
            path_code,
        }
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use super::Length;

/// One unit is `360 / 2^32` degrees: the full signed 32-bit range wraps
/// exactly once around a great circle, the same binary-angle convention
/// the original navigation database this crate's domain model is drawn
/// from (`vfrnav`) uses for its `Point` class.
const UNITS_PER_DEGREE: f64 = (1u64 << 32) as f64 / 360.0;
const EARTH_RADIUS_NM: f64 = 3_440.065;
const INVALID_LAT: i32 = i32::MIN;

/// A point in fixed-point equirectangular coordinates (spec.md §3).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Point {
    lat: i32,
    lon: i32,
}

impl Point {
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            lat: INVALID_LAT,
            lon: 0,
        }
    }

    #[must_use]
    pub fn from_deg(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat: (lat_deg * UNITS_PER_DEGREE).round() as i32,
            lon: (lon_deg * UNITS_PER_DEGREE).round() as i32,
        }
    }

    #[must_use]
    pub const fn from_units(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    #[must_use]
    pub fn lat_deg(self) -> f64 {
        f64::from(self.lat) / UNITS_PER_DEGREE
    }

    #[must_use]
    pub fn lon_deg(self) -> f64 {
        f64::from(self.lon) / UNITS_PER_DEGREE
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.lat != INVALID_LAT
    }

    /// Raw BAM units, for canonical cache keys and wire encoding.
    #[must_use]
    pub const fn units(self) -> (i32, i32) {
        (self.lat, self.lon)
    }

    fn lat_rad(self) -> f64 {
        self.lat_deg().to_radians()
    }

    fn lon_rad(self) -> f64 {
        self.lon_deg().to_radians()
    }

    /// Great-circle distance, nautical miles (haversine).
    #[must_use]
    pub fn distance(self, other: Self) -> Length {
        let (lat1, lat2) = (self.lat_rad(), other.lat_rad());
        let dlat = lat2 - lat1;
        let dlon = other.lon_rad() - self.lon_rad();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        Length::nm(EARTH_RADIUS_NM * c)
    }

    /// Initial true course from `self` to `other`, degrees `[0, 360)`.
    #[must_use]
    pub fn true_course(self, other: Self) -> f64 {
        let (lat1, lat2) = (self.lat_rad(), other.lat_rad());
        let dlon = other.lon_rad() - self.lon_rad();
        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        let brg = y.atan2(x).to_degrees();
        (brg + 360.0) % 360.0
    }

    /// The point halfway between `self` and `other` along the great
    /// circle connecting them.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        let (lat1, lat2) = (self.lat_rad(), other.lat_rad());
        let (lon1, lon2) = (self.lon_rad(), other.lon_rad());
        let bx = lat2.cos() * (lon2 - lon1).cos();
        let by = lat2.cos() * (lon2 - lon1).sin();
        let lat_mid = (lat1.sin() + lat2.sin()).atan2(
            ((lat1.cos() + bx).powi(2) + by.powi(2)).sqrt(),
        );
        let lon_mid = lon1 + by.atan2(lat1.cos() + bx);
        Self::from_deg(lat_mid.to_degrees(), normalize_lon_deg(lon_mid.to_degrees()))
    }

    /// A simple bounding box containing every point within `radius` of
    /// `self`, built by expanding in latitude/longitude degrees rather
    /// than computing the true geodesic disc — adequate for bbox
    /// pre-filtering before a precise distance check (spec.md §3).
    #[must_use]
    pub fn bbox_by_radius(self, radius: Length) -> BoundingBox {
        let dlat = radius.value_nm() / 60.0;
        let lat_rad = self.lat_rad();
        let dlon = if lat_rad.cos().abs() > 1.0e-6 {
            dlat / lat_rad.cos()
        } else {
            180.0
        };
        BoundingBox {
            sw: Self::from_deg(self.lat_deg() - dlat, self.lon_deg() - dlon),
            ne: Self::from_deg(self.lat_deg() + dlat, self.lon_deg() + dlon),
        }
    }
}

fn normalize_lon_deg(deg: f64) -> f64 {
    let mut d = deg;
    while d > 180.0 {
        d -= 360.0;
    }
    while d < -180.0 {
        d += 360.0;
    }
    d
}

/// An axis-aligned lat/lon bounding box.
#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
    pub sw: Point,
    pub ne: Point,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        p.lat_deg() >= self.sw.lat_deg()
            && p.lat_deg() <= self.ne.lat_deg()
            && p.lon_deg() >= self.sw.lon_deg()
            && p.lon_deg() <= self.ne.lon_deg()
    }

    #[must_use]
    pub fn expand(self, margin: Length) -> Self {
        Self {
            sw: self.sw.bbox_by_radius(margin).sw,
            ne: self.ne.bbox_by_radius(margin).ne,
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            sw: Point::from_deg(
                self.sw.lat_deg().min(other.sw.lat_deg()),
                self.sw.lon_deg().min(other.sw.lon_deg()),
            ),
            ne: Point::from_deg(
                self.ne.lat_deg().max(other.ne.lat_deg()),
                self.ne.lon_deg().max(other.ne.lon_deg()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_units_is_accurate() {
        let p = Point::from_deg(53.6304, 9.9883);
        assert!((p.lat_deg() - 53.6304).abs() < 1e-6);
        assert!((p.lon_deg() - 9.9883).abs() < 1e-6);
    }

    #[test]
    fn invalid_point_is_not_valid() {
        assert!(!Point::invalid().is_valid());
        assert!(Point::from_deg(0.0, 0.0).is_valid());
    }

    #[test]
    fn distance_between_identical_points_is_zero() {
        let p = Point::from_deg(50.0, 8.0);
        assert!(p.distance(p).value_nm() < 1e-9);
    }

    #[test]
    fn distance_hamburg_luebeck_is_about_35nm() {
        // EDDH -> EDHL, a well known ~35nm hop.
        let eddh = Point::from_deg(53.6304, 9.9883);
        let edhl = Point::from_deg(53.8050, 10.7192);
        let nm = eddh.distance(edhl).value_nm();
        assert!((20.0..50.0).contains(&nm), "got {nm}");
    }

    #[test]
    fn true_course_eastbound_is_about_90() {
        let a = Point::from_deg(50.0, 8.0);
        let b = Point::from_deg(50.0, 9.0);
        let course = a.true_course(b);
        assert!((80.0..100.0).contains(&course), "got {course}");
    }

    #[test]
    fn bbox_contains_origin() {
        let p = Point::from_deg(50.0, 8.0);
        let bbox = p.bbox_by_radius(Length::nm(50.0));
        assert!(bbox.contains(p));
    }
}

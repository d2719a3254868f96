// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use std::rc::Rc;

use super::Polygon;
use crate::altitude::IntervalSet;
use crate::geom::Point;

/// A single named airspace record as returned by the database (spec.md
/// §6).
#[derive(Clone)]
pub struct AirspaceRecord {
    pub ident: String,
    pub class: Option<String>,
    pub typecode: Option<String>,
    pub floor_ft: i32,
    pub ceiling_ft: i32,
    pub polygon: Rc<dyn Polygon>,
}

impl std::fmt::Debug for AirspaceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirspaceRecord")
            .field("ident", &self.ident)
            .field("floor_ft", &self.floor_ft)
            .field("ceiling_ft", &self.ceiling_ft)
            .finish_non_exhaustive()
    }
}

/// How a component combines with the accumulator built from the
/// components before it (spec.md §4.A).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AirspaceOperator {
    Set,
    Union,
    Subtract,
    Intersect,
}

/// One step of a composed airspace's evaluation sequence. `record` is
/// `None` when the referenced component could not be resolved (missing
/// or invalid); per spec.md §4.A that behaves as an empty set rather
/// than an error.
#[derive(Clone, Debug)]
pub struct AirspaceComponent {
    pub operator: AirspaceOperator,
    pub record: Option<AirspaceRecord>,
}

/// A composed airspace: a sequence of components folded left to right.
#[derive(Clone, Debug, Default)]
pub struct ComposedAirspace {
    pub components: Vec<AirspaceComponent>,
}

impl ComposedAirspace {
    #[must_use]
    pub fn single(record: AirspaceRecord) -> Self {
        Self {
            components: vec![AirspaceComponent {
                operator: AirspaceOperator::Set,
                record: Some(record),
            }],
        }
    }

    fn fold(&self, mut contributes: impl FnMut(&AirspaceRecord) -> IntervalSet) -> IntervalSet {
        let mut acc = IntervalSet::empty();
        for comp in &self.components {
            let this = comp
                .record
                .as_ref()
                .map_or_else(IntervalSet::empty, &mut contributes);
            acc = match comp.operator {
                AirspaceOperator::Set => this,
                AirspaceOperator::Union => acc.union(&this),
                AirspaceOperator::Subtract => acc.subtract(&this),
                AirspaceOperator::Intersect => acc.intersect(&this),
            };
        }
        acc
    }

    /// Altitudes at which `p` lies inside this composed airspace
    /// (spec.md §4.A's `get_altrange`).
    #[must_use]
    pub fn altrange_point(&self, p: Point, clip: Option<(i32, i32)>) -> IntervalSet {
        let set = self.fold(|rec| {
            if rec.polygon.contains(p) {
                IntervalSet::single(rec.floor_ft, rec.ceiling_ft)
            } else {
                IntervalSet::empty()
            }
        });
        clip.map_or(set.clone(), |(lo, hi)| set.clip(lo, hi))
    }

    /// Altitudes at which the segment `p0`-`p1` crosses this composed
    /// airspace.
    #[must_use]
    pub fn altrange_segment(&self, p0: Point, p1: Point, clip: Option<(i32, i32)>) -> IntervalSet {
        let set = self.fold(|rec| {
            if rec.polygon.segment_intersects(p0, p1) {
                IntervalSet::single(rec.floor_ft, rec.ceiling_ft)
            } else {
                IntervalSet::empty()
            }
        });
        clip.map_or(set.clone(), |(lo, hi)| set.clip(lo, hi))
    }

    #[must_use]
    pub fn is_inside(&self, p: Point, alt_ft: i32, altlwr: Option<i32>, altupr: Option<i32>) -> bool {
        let clip = clip_window(altlwr, altupr);
        self.altrange_point(p, clip).contains(alt_ft)
    }

    #[must_use]
    pub fn is_intersect(
        &self,
        p0: Point,
        p1: Point,
        altlwr: Option<i32>,
        altupr: Option<i32>,
    ) -> bool {
        let clip = clip_window(altlwr, altupr);
        !self.altrange_segment(p0, p1, clip).is_empty()
    }
}

fn clip_window(altlwr: Option<i32>, altupr: Option<i32>) -> Option<(i32, i32)> {
    match (altlwr, altupr) {
        (Some(lo), Some(hi)) => Some((lo, hi)),
        (Some(lo), None) => Some((lo, i32::MAX)),
        (None, Some(hi)) => Some((i32::MIN, hi)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysInside;
    impl Polygon for AlwaysInside {
        fn contains(&self, _p: Point) -> bool {
            true
        }
        fn segment_intersects(&self, _p0: Point, _p1: Point) -> bool {
            true
        }
    }

    struct NeverInside;
    impl Polygon for NeverInside {
        fn contains(&self, _p: Point) -> bool {
            false
        }
        fn segment_intersects(&self, _p0: Point, _p1: Point) -> bool {
            false
        }
    }

    fn record(name: &str, poly: Rc<dyn Polygon>, floor: i32, ceiling: i32) -> AirspaceRecord {
        AirspaceRecord {
            ident: name.to_string(),
            class: None,
            typecode: None,
            floor_ft: floor,
            ceiling_ft: ceiling,
            polygon: poly,
        }
    }

    #[test]
    fn single_component_is_transparent() {
        let composed = ComposedAirspace::single(record("A", Rc::new(AlwaysInside), 0, 10_000));
        let p = Point::from_deg(50.0, 8.0);
        assert!(composed.is_inside(p, 5_000, None, None));
        assert!(!composed.is_inside(p, 15_000, None, None));
    }

    #[test]
    fn subtract_removes_overlap() {
        let composed = ComposedAirspace {
            components: vec![
                AirspaceComponent {
                    operator: AirspaceOperator::Set,
                    record: Some(record("A", Rc::new(AlwaysInside), 0, 10_000)),
                },
                AirspaceComponent {
                    operator: AirspaceOperator::Subtract,
                    record: Some(record("B", Rc::new(AlwaysInside), 2_000, 4_000)),
                },
            ],
        };
        let p = Point::from_deg(50.0, 8.0);
        assert!(composed.is_inside(p, 1_000, None, None));
        assert!(!composed.is_inside(p, 3_000, None, None));
        assert!(composed.is_inside(p, 9_000, None, None));
    }

    #[test]
    fn missing_component_behaves_as_empty() {
        let composed = ComposedAirspace {
            components: vec![AirspaceComponent {
                operator: AirspaceOperator::Set,
                record: None,
            }],
        };
        let p = Point::from_deg(50.0, 8.0);
        assert!(!composed.is_inside(p, 1_000, None, None));
    }

    #[test]
    fn intersect_requires_both_members() {
        let composed = ComposedAirspace {
            components: vec![
                AirspaceComponent {
                    operator: AirspaceOperator::Set,
                    record: Some(record("A", Rc::new(AlwaysInside), 0, 10_000)),
                },
                AirspaceComponent {
                    operator: AirspaceOperator::Intersect,
                    record: Some(record("B", Rc::new(NeverInside), 0, 10_000)),
                },
            ],
        };
        let p = Point::from_deg(50.0, 8.0);
        assert!(!composed.is_inside(p, 1_000, None, None));
    }

    #[test]
    fn clip_window_with_only_lower_bound_is_open_ended() {
        let composed = ComposedAirspace::single(record("A", Rc::new(AlwaysInside), 0, 50_000));
        let p = Point::from_deg(50.0, 8.0);
        let set = composed.altrange_point(p, clip_window(Some(10_000), None));
        assert_eq!(set.ranges(), &[(10_000, 50_000)]);
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use std::cell::RefCell;
use std::collections::BTreeMap;

use log::trace;

use super::compose::{AirspaceComponent, AirspaceOperator, ComposedAirspace};
use crate::altitude::IntervalSet;
use crate::db::AirspaceQuery;
use crate::geom::Point;

/// Canonical lookup key: identifier plus the class/typecode filter the
/// caller asked for. Ordered so the cache can use a `BTreeMap` rather
/// than pull in a hasher dependency for what is a small, long-lived
/// table (spec.md §4.A: "Caching uses ordered containers keyed by the
/// canonical point or the canonical (unordered-pair) segment
/// endpoints").
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct AirspaceKey {
    ident: String,
    class: Option<String>,
    typecode: Option<String>,
}

/// Canonical point key for altitude-range memoization: BAM coordinates
/// are already integers, so the pair is used verbatim.
type PointKey = (i32, i32);

/// Canonical, unordered segment key.
fn segment_key(p0: Point, p1: Point) -> (PointKey, PointKey) {
    let a = p0.units();
    let b = p1.units();
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Memoized airspace lookups and altitude-range queries over a
/// [`AirspaceQuery`] collaborator (spec.md §4.A, component A).
pub struct AirspaceCache<'q, Q: AirspaceQuery> {
    query: &'q Q,
    composed: RefCell<BTreeMap<AirspaceKey, ComposedAirspace>>,
    point_ranges: RefCell<BTreeMap<(AirspaceKey, PointKey), IntervalSet>>,
    segment_ranges: RefCell<BTreeMap<(AirspaceKey, (PointKey, PointKey)), IntervalSet>>,
}

impl<'q, Q: AirspaceQuery> AirspaceCache<'q, Q> {
    #[must_use]
    pub fn new(query: &'q Q) -> Self {
        Self {
            query,
            composed: RefCell::new(BTreeMap::new()),
            point_ranges: RefCell::new(BTreeMap::new()),
            segment_ranges: RefCell::new(BTreeMap::new()),
        }
    }

    /// Resolve (and cache) the composed airspace matching `ident`,
    /// optionally filtered by class and typecode. Re-entrant lookups of
    /// the same key reuse the cached composition instead of re-querying
    /// the database.
    fn find(&self, ident: &str, class: Option<&str>, typecode: Option<&str>) -> AirspaceKey {
        let key = AirspaceKey {
            ident: ident.to_string(),
            class: class.map(str::to_string),
            typecode: typecode.map(str::to_string),
        };
        if !self.composed.borrow().contains_key(&key) {
            trace!("airspace cache miss for {ident} (composing from database)");
            let records = self.query.airspaces(ident, class, typecode);
            let mut components = Vec::with_capacity(records.len());
            for (i, record) in records.into_iter().enumerate() {
                components.push(AirspaceComponent {
                    operator: if i == 0 {
                        AirspaceOperator::Set
                    } else {
                        AirspaceOperator::Union
                    },
                    record: Some(record),
                });
            }
            self.composed
                .borrow_mut()
                .insert(key.clone(), ComposedAirspace { components });
        }
        key
    }

    #[must_use]
    pub fn is_inside(
        &self,
        ident: &str,
        class: Option<&str>,
        typecode: Option<&str>,
        p: Point,
        alt_ft: i32,
        altlwr: Option<i32>,
        altupr: Option<i32>,
    ) -> bool {
        let key = self.find(ident, class, typecode);
        let composed = &self.composed.borrow()[&key];
        composed.is_inside(p, alt_ft, altlwr, altupr)
    }

    #[must_use]
    pub fn is_intersect(
        &self,
        ident: &str,
        class: Option<&str>,
        typecode: Option<&str>,
        p0: Point,
        p1: Point,
        altlwr: Option<i32>,
        altupr: Option<i32>,
    ) -> bool {
        let key = self.find(ident, class, typecode);
        let composed = &self.composed.borrow()[&key];
        composed.is_intersect(p0, p1, altlwr, altupr)
    }

    /// Altitudes at which `p` is inside the named airspace, memoized by
    /// (airspace, point).
    #[must_use]
    pub fn get_altrange_point(
        &self,
        ident: &str,
        class: Option<&str>,
        typecode: Option<&str>,
        p: Point,
    ) -> IntervalSet {
        let key = self.find(ident, class, typecode);
        let point_key = p.units();
        if let Some(cached) = self
            .point_ranges
            .borrow()
            .get(&(key.clone(), point_key))
        {
            return cached.clone();
        }
        let set = self.composed.borrow()[&key].altrange_point(p, None);
        self.point_ranges
            .borrow_mut()
            .insert((key, point_key), set.clone());
        set
    }

    /// Altitudes at which the segment `p0`-`p1` crosses the named
    /// airspace, memoized by (airspace, unordered segment endpoints).
    #[must_use]
    pub fn get_altrange_segment(
        &self,
        ident: &str,
        class: Option<&str>,
        typecode: Option<&str>,
        p0: Point,
        p1: Point,
    ) -> IntervalSet {
        let key = self.find(ident, class, typecode);
        let seg_key = segment_key(p0, p1);
        if let Some(cached) = self
            .segment_ranges
            .borrow()
            .get(&(key.clone(), seg_key))
        {
            return cached.clone();
        }
        let set = self.composed.borrow()[&key].altrange_segment(p0, p1, None);
        self.segment_ranges
            .borrow_mut()
            .insert((key, seg_key), set.clone());
        set
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::airspace::{AirspaceRecord, Polygon};

    struct AlwaysInside;
    impl Polygon for AlwaysInside {
        fn contains(&self, _p: Point) -> bool {
            true
        }
        fn segment_intersects(&self, _p0: Point, _p1: Point) -> bool {
            true
        }
    }

    struct CountingQuery {
        calls: Cell<u32>,
    }

    impl AirspaceQuery for CountingQuery {
        fn airspaces(
            &self,
            ident: &str,
            _class: Option<&str>,
            _typecode: Option<&str>,
        ) -> Vec<AirspaceRecord> {
            self.calls.set(self.calls.get() + 1);
            vec![AirspaceRecord {
                ident: ident.to_string(),
                class: None,
                typecode: None,
                floor_ft: 0,
                ceiling_ft: 66_000,
                polygon: Rc::new(AlwaysInside),
            }]
        }
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let query = CountingQuery { calls: Cell::new(0) };
        let cache = AirspaceCache::new(&query);
        let p = Point::from_deg(50.0, 8.0);
        assert!(cache.is_inside("EDGG", None, None, p, 30_000, None, None));
        assert!(cache.is_inside("EDGG", None, None, p, 40_000, None, None));
        assert_eq!(query.calls.get(), 1);
    }

    #[test]
    fn altrange_point_is_memoized_by_canonical_key() {
        let query = CountingQuery { calls: Cell::new(0) };
        let cache = AirspaceCache::new(&query);
        let p = Point::from_deg(50.0, 8.0);
        let first = cache.get_altrange_point("EDGG", None, None, p);
        let second = cache.get_altrange_point("EDGG", None, None, p);
        assert_eq!(first, second);
        assert_eq!(query.calls.get(), 1);
    }
}

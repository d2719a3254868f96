// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Altitude-interval-set arithmetic.
//!
//! The original implementation (`src/interval.hh`/`.cc`) factors this
//! out of `get_altrange`, `check_dct` and the mandatory-sequence
//! planner's crossing-gate computation; SPEC_FULL.md §2 keeps that
//! factoring rather than re-deriving interval unions/intersections ad
//! hoc at each call site. Bounds are feet, inclusive on both ends.

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct IntervalSet {
    /// Sorted, non-overlapping, non-adjacent `(lo, hi)` pairs.
    ranges: Vec<(i32, i32)>,
}

impl IntervalSet {
    #[must_use]
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    #[must_use]
    pub fn single(lo: i32, hi: i32) -> Self {
        if lo > hi {
            Self::empty()
        } else {
            Self {
                ranges: vec![(lo, hi)],
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        self.ranges.iter().any(|&(lo, hi)| value >= lo && value <= hi)
    }

    #[must_use]
    pub fn ranges(&self) -> &[(i32, i32)] {
        &self.ranges
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut all: Vec<(i32, i32)> = self
            .ranges
            .iter()
            .chain(other.ranges.iter())
            .copied()
            .collect();
        all.sort_unstable();
        Self {
            ranges: merge_sorted(all),
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (lo1, hi1) = self.ranges[i];
            let (lo2, hi2) = other.ranges[j];
            let lo = lo1.max(lo2);
            let hi = hi1.min(hi2);
            if lo <= hi {
                out.push((lo, hi));
            }
            if hi1 < hi2 {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { ranges: out }
    }

    #[must_use]
    pub fn clip(&self, lo: i32, hi: i32) -> Self {
        self.intersect(&Self::single(lo, hi))
    }

    /// Subtract `other` from `self`.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut out = Vec::new();
        for &(lo, hi) in &self.ranges {
            let mut cur_lo = lo;
            for &(olo, ohi) in &other.ranges {
                if ohi < cur_lo || olo > hi {
                    continue;
                }
                if olo > cur_lo {
                    out.push((cur_lo, olo - 1));
                }
                cur_lo = cur_lo.max(ohi + 1);
                if cur_lo > hi {
                    break;
                }
            }
            if cur_lo <= hi {
                out.push((cur_lo, hi));
            }
        }
        Self { ranges: out }
    }
}

fn merge_sorted(sorted: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(sorted.len());
    for (lo, hi) in sorted {
        if let Some(last) = merged.last_mut() {
            if lo <= last.1.saturating_add(1) {
                last.1 = last.1.max(hi);
                continue;
            }
        }
        merged.push((lo, hi));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_merges_overlapping_ranges() {
        let a = IntervalSet::single(0, 100);
        let b = IntervalSet::single(50, 200);
        let u = a.union(&b);
        assert_eq!(u.ranges(), &[(0, 200)]);
    }

    #[test]
    fn union_merges_adjacent_ranges() {
        let a = IntervalSet::single(0, 99);
        let b = IntervalSet::single(100, 200);
        assert_eq!(a.union(&b).ranges(), &[(0, 200)]);
    }

    #[test]
    fn intersect_of_disjoint_is_empty() {
        let a = IntervalSet::single(0, 100);
        let b = IntervalSet::single(200, 300);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = IntervalSet::single(0, 100);
        let b = IntervalSet::single(50, 200);
        assert_eq!(a.intersect(&b).ranges(), &[(50, 100)]);
    }

    #[test]
    fn subtract_splits_range() {
        let a = IntervalSet::single(0, 100);
        let b = IntervalSet::single(40, 60);
        assert_eq!(a.subtract(&b).ranges(), &[(0, 39), (61, 100)]);
    }

    #[test]
    fn subtract_whole_range_leaves_empty() {
        let a = IntervalSet::single(0, 100);
        assert!(a.subtract(&a).is_empty());
    }

    #[test]
    fn contains_checks_every_range() {
        let a = IntervalSet::single(0, 10).union(&IntervalSet::single(20, 30));
        assert!(a.contains(5));
        assert!(a.contains(25));
        assert!(!a.contains(15));
    }

    #[test]
    fn clip_bounds_to_requested_window() {
        let a = IntervalSet::single(0, 1000);
        assert_eq!(a.clip(100, 200).ranges(), &[(100, 200)]);
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use super::AirwayIndex;
use crate::geom::Length;

/// Per-level metric marking an edge unusable at that cruise level
/// (spec.md §3: "each entry either a finite cost or an explicit invalid
/// marker").
pub const INVALID_METRIC: f64 = f64::INFINITY;

/// The solution-state a k-shortest-path iteration attaches to an edge:
/// which level (if any) is on the currently proposed route, and
/// whether the edge-filter pass has temporarily disabled it (spec.md
/// §4.G).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SolutionMarker {
    pub level: Option<u16>,
    pub filtered: bool,
}

/// A directed edge carrying a per-cruise-level metric array (spec.md
/// §3).
#[derive(Clone, Debug)]
pub struct Edge {
    pub airway: AirwayIndex,
    metrics: Vec<f64>,
    pub distance: Length,
    pub true_course: f64,
    pub solution: SolutionMarker,
}

impl Edge {
    #[must_use]
    pub fn new(airway: AirwayIndex, level_count: usize, distance: Length, true_course: f64) -> Self {
        Self {
            airway,
            metrics: vec![INVALID_METRIC; level_count],
            distance,
            true_course,
            solution: SolutionMarker::default(),
        }
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn metric_at(&self, level: usize) -> f64 {
        self.metrics.get(level).copied().unwrap_or(INVALID_METRIC)
    }

    pub fn set_metric(&mut self, level: usize, metric: f64) {
        if let Some(slot) = self.metrics.get_mut(level) {
            *slot = metric;
        }
    }

    pub fn invalidate(&mut self, level: usize) {
        self.set_metric(level, INVALID_METRIC);
    }

    pub fn invalidate_all(&mut self) {
        self.metrics.iter_mut().for_each(|m| *m = INVALID_METRIC);
    }

    /// An edge is valid at `level` iff its metric there is finite
    /// (spec.md §3).
    #[must_use]
    pub fn is_valid_at(&self, level: usize) -> bool {
        self.metric_at(level).is_finite()
    }

    /// An edge is valid iff some level is valid (spec.md §3).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.metrics.iter().any(|m| m.is_finite())
    }

    /// Merge another edge's metrics into this one by elementwise
    /// minimum, as I4 requires when an airway is re-added between the
    /// same ordered pair.
    pub fn merge_min(&mut self, other: &Self) {
        for (slot, &incoming) in self.metrics.iter_mut().zip(other.metrics.iter()) {
            if incoming < *slot {
                *slot = incoming;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_edge_is_invalid_at_every_level() {
        let e = Edge::new(AirwayIndex::DCT, 4, Length::nm(10.0), 90.0);
        assert!(!e.is_valid());
        for l in 0..4 {
            assert!(!e.is_valid_at(l));
        }
    }

    #[test]
    fn setting_one_level_makes_the_edge_valid() {
        let mut e = Edge::new(AirwayIndex::DCT, 4, Length::nm(10.0), 90.0);
        e.set_metric(1, 12.0);
        assert!(e.is_valid());
        assert!(e.is_valid_at(1));
        assert!(!e.is_valid_at(0));
    }

    #[test]
    fn merge_min_takes_the_lower_metric_per_level() {
        let mut a = Edge::new(AirwayIndex::DCT, 2, Length::nm(10.0), 0.0);
        a.set_metric(0, 10.0);
        a.set_metric(1, 20.0);
        let mut b = Edge::new(AirwayIndex::DCT, 2, Length::nm(10.0), 0.0);
        b.set_metric(0, 5.0);
        b.set_metric(1, 25.0);
        a.merge_min(&b);
        assert!((a.metric_at(0) - 5.0).abs() < 1e-9);
        assert!((a.metric_at(1) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn invalidate_all_clears_every_level() {
        let mut e = Edge::new(AirwayIndex::DCT, 3, Length::nm(10.0), 0.0);
        e.set_metric(0, 1.0);
        e.set_metric(2, 1.0);
        e.invalidate_all();
        assert!(!e.is_valid());
    }
}

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

use std::collections::HashMap;

/// A non-negative integer identifying an airway, or one of a handful of
/// reserved sentinels (spec.md §3, §4.B).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AirwayIndex(u32);

impl AirwayIndex {
    pub const DCT: Self = Self(0);
    pub const SID: Self = Self(1);
    pub const STAR: Self = Self(2);
    pub const MATCHALL: Self = Self(3);
    pub const MATCHNONE: Self = Self(4);
    pub const MATCHAWY: Self = Self(5);
    pub const MATCHDCTAWY: Self = Self(6);
    pub const MATCHDCTAWYSIDSTAR: Self = Self(7);
    pub const MATCHAWYSIDSTAR: Self = Self(8);
    pub const MATCHSIDSTAR: Self = Self(9);

    /// Number of reserved sentinel values below which named-airway
    /// indices begin.
    const FIRST_NAMED: u32 = 10;

    #[must_use]
    const fn named(raw: u32) -> Self {
        Self(Self::FIRST_NAMED + raw)
    }

    /// The raw ordinal, for callers that need a total order over
    /// indices (e.g. the solution pool's lexicographic tiebreak)
    /// without caring what it names.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 < Self::FIRST_NAMED
    }

    #[must_use]
    pub const fn is_named(self) -> bool {
        !self.is_sentinel()
    }

    #[must_use]
    pub const fn is_dct(self) -> bool {
        self.0 == Self::DCT.0
    }

    #[must_use]
    pub const fn is_sid(self) -> bool {
        self.0 == Self::SID.0
    }

    #[must_use]
    pub const fn is_star(self) -> bool {
        self.0 == Self::STAR.0
    }

    #[must_use]
    pub const fn is_airway(self) -> bool {
        self.is_named()
    }

    /// Whether `self` (an edge's actual airway index) matches the
    /// wildcard `pattern`, per spec.md §3's "comparing an edge's
    /// airway index against a wildcard is defined by table lookup".
    #[must_use]
    pub fn matches(self, pattern: Self) -> bool {
        match pattern {
            Self::MATCHALL => true,
            Self::MATCHNONE => false,
            Self::MATCHAWY => self.is_airway(),
            Self::MATCHDCTAWY => self.is_dct() || self.is_airway(),
            Self::MATCHDCTAWYSIDSTAR => self.is_dct() || self.is_airway() || self.is_sid() || self.is_star(),
            Self::MATCHAWYSIDSTAR => self.is_airway() || self.is_sid() || self.is_star(),
            Self::MATCHSIDSTAR => self.is_sid() || self.is_star(),
            specific => self == specific,
        }
    }
}

/// A growable, bidirectional map between uppercase airway names and
/// their [`AirwayIndex`] (spec.md §4.B). The empty name always resolves
/// to [`AirwayIndex::DCT`].
#[derive(Default, Debug)]
pub struct AirwayTable {
    names: Vec<String>,
    by_name: HashMap<String, AirwayIndex>,
}

impl AirwayTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name`, optionally interning it if unknown.
    ///
    /// Returns [`AirwayIndex::MATCHNONE`] for an unknown name when
    /// `create` is `false`.
    pub fn lookup(&mut self, name: &str, create: bool) -> AirwayIndex {
        if name.is_empty() {
            return AirwayIndex::DCT;
        }
        let upper = name.to_uppercase();
        if let Some(&idx) = self.by_name.get(&upper) {
            return idx;
        }
        if !create {
            return AirwayIndex::MATCHNONE;
        }
        let idx = AirwayIndex::named(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push(upper.clone());
        self.by_name.insert(upper, idx);
        idx
    }

    /// Render an index back to its display name: `"DCT"`, `"SID"`,
    /// `"STAR"`, `"[MATCH...]"` for sentinels, or the interned airway
    /// name otherwise.
    #[must_use]
    pub fn name(&self, index: AirwayIndex) -> String {
        match index {
            AirwayIndex::DCT => "DCT".to_string(),
            AirwayIndex::SID => "SID".to_string(),
            AirwayIndex::STAR => "STAR".to_string(),
            AirwayIndex::MATCHALL => "[MATCHALL]".to_string(),
            AirwayIndex::MATCHNONE => "[MATCHNONE]".to_string(),
            AirwayIndex::MATCHAWY => "[MATCHAWY]".to_string(),
            AirwayIndex::MATCHDCTAWY => "[MATCHDCTAWY]".to_string(),
            AirwayIndex::MATCHDCTAWYSIDSTAR => "[MATCHDCTAWYSIDSTAR]".to_string(),
            AirwayIndex::MATCHAWYSIDSTAR => "[MATCHAWYSIDSTAR]".to_string(),
            AirwayIndex::MATCHSIDSTAR => "[MATCHSIDSTAR]".to_string(),
            named => self
                .names
                .get((named.0 - AirwayIndex::FIRST_NAMED) as usize)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_dct() {
        let mut table = AirwayTable::new();
        assert_eq!(table.lookup("", true), AirwayIndex::DCT);
    }

    #[test]
    fn unknown_name_without_create_is_matchnone() {
        let mut table = AirwayTable::new();
        assert_eq!(table.lookup("UL607", false), AirwayIndex::MATCHNONE);
    }

    #[test]
    fn created_name_round_trips_through_the_table() {
        let mut table = AirwayTable::new();
        let idx = table.lookup("ul607", true);
        assert!(idx.is_named());
        assert_eq!(table.lookup("UL607", false), idx);
        assert_eq!(table.name(idx), "UL607");
    }

    #[test]
    fn wildcard_matching() {
        let mut table = AirwayTable::new();
        let ul607 = table.lookup("UL607", true);
        assert!(ul607.matches(AirwayIndex::MATCHALL));
        assert!(ul607.matches(AirwayIndex::MATCHAWY));
        assert!(!AirwayIndex::DCT.matches(AirwayIndex::MATCHAWY));
        assert!(AirwayIndex::DCT.matches(AirwayIndex::MATCHDCTAWY));
        assert!(!ul607.matches(AirwayIndex::MATCHNONE));
        assert!(ul607.matches(ul607));
        assert!(!ul607.matches(AirwayIndex::DCT));
    }

    #[test]
    fn sentinel_render_names() {
        let table = AirwayTable::new();
        assert_eq!(table.name(AirwayIndex::DCT), "DCT");
        assert_eq!(table.name(AirwayIndex::SID), "SID");
        assert_eq!(table.name(AirwayIndex::MATCHAWY), "[MATCHAWY]");
    }
}

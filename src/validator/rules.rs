// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Validator response line grammar (spec.md §4.I): one regex per known
//! error code, each producing a [`MutationRecipe`] the repair loop
//! applies to the working graph.
//!
//! The code list and the shape of each mutation are grounded in a real
//! CFMU validator's response grammar: disconnect-vertex, kill-segment,
//! downgrade-to-DCT, restrict-to-airway, and the cruise-ladder-shrink
//! codes each have a distinct real-world counterpart this module
//! mirrors under names that describe what they do rather than their
//! original mnemonics.

use once_cell::sync::Lazy;
use regex::Regex;

/// One forbidden-crossing altitude band cited by a response line.
#[derive(Clone, Debug)]
pub struct AltitudeBand {
    pub ident: String,
    pub altmin_ft: Option<i32>,
    pub altmax_ft: Option<i32>,
}

/// What a matched response line asks the repair loop to do to the
/// working graph (spec.md §4.I).
#[derive(Clone, Debug)]
pub enum MutationRecipe {
    /// Disconnect a vertex entirely (all in/out edges, every level).
    DisconnectVertex(String),
    /// Kill the DCT segment between two idents, both directions.
    KillDctSegment(String, String),
    /// Disconnect a vertex, then fall back to converting a named airway
    /// through it to DCT if one was cited.
    DisconnectWithAirwayFallback(String, Option<String>),
    /// Kill SID/STAR solution edges into/out of a terminal vertex and
    /// remember the segment as durably forbidden.
    KillProcedureAndRemember(String),
    /// Restrict traffic through a vertex to arrivals/departures on the
    /// named airway only (discard every other in/out edge).
    RestrictToAirway { vertex: String, airway: String, outgoing: bool },
    /// Convert every edge of a named airway, anywhere in the graph, to
    /// DCT.
    DowngradeAirwayEverywhere(String),
    /// Convert the DCT edge between two idents to the cited airway.
    UpgradeDctToAirway { from: String, to: String, airway: String },
    /// Kill edges through a point within an altitude band.
    KillCrossing(AltitudeBand),
    /// The proposed cruise level is incompatible with performance;
    /// shrink the cruise ladder to the highest level actually used on
    /// the current candidate route.
    ShrinkCruiseLadder,
    /// Line could not be matched to any known mutation; the repair
    /// loop should fall back to its path-probe cursor.
    Unrecognized,
}

fn band(altmin: Option<&str>, altmax: Option<&str>) -> (Option<i32>, Option<i32>) {
    (
        altmin.and_then(|s| s.parse::<i32>().ok()).map(|fl| fl * 100),
        altmax.and_then(|s| s.parse::<i32>().ok()).map(|fl| fl * 100),
    )
}

static IGNORE: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["^PROF188:", "^PROF189:", "^PROF190:"]
        .iter()
        .map(|p| Regex::new(p).expect("static ignore pattern"))
        .collect()
});

static ROUTE49: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE49: THE POINT (\S+) IS UNKNOWN IN THE CONTEXT OF THE ROUTE").expect("static pattern")
});
static ROUTE52: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROUTE52: THE DCT SEGMENT (\S+)\.\.(\S+) IS FORBIDDEN").expect("static pattern"));
static ROUTE130: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROUTE130: UNKNOWN DESIGNATOR (\S+)").expect("static pattern"));
static ROUTE134: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE134: STAR AT (\S+) NOT VALID FOR THIS ROUTE").expect("static pattern")
});
static ROUTE135: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE135: SID AT (\S+) NOT VALID FOR THIS ROUTE").expect("static pattern")
});
static ROUTE139: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE139: (\S+) IS PRECEDED BY (\S+) WHICH IS NOT ONE OF ITS POINTS").expect("static pattern")
});
static ROUTE140: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE140: (\S+) IS FOLLOWED BY (\S+) WHICH IS NOT ONE OF ITS POINTS").expect("static pattern")
});
static ROUTE165: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROUTE165: THE DCT SEGMENT (\S+)\.\.(\S+)").expect("static pattern"));
static ROUTE168: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROUTE168: INVALID DCT (\S+)\.\.(\S+)").expect("static pattern"));
static ROUTE171: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROUTE171: AIRWAY (\S+) IS NOT AVAILABLE").expect("static pattern"));
static ROUTE172: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE172: MULTIPLE ROUTES BETWEEN (\S+) AND (\S+)\. (\S+) IS SUGGESTED").expect("static pattern")
});
static ROUTE179: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ROUTE179: CRUISING FLIGHT LEVEL INVALID OR INCOMPATIBLE WITH AIRCRAFT PERFORMANCE")
        .expect("static pattern")
});
static PROF_CROSSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PROF(?:50|193|194|195b?|197|198|199|201b?|204[bcde]?|205[bc]?|206): (\S+)(?: BETWEEN FL(\d+) AND FL(\d+))?")
        .expect("static pattern")
});
static EFPM228: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^EFPM228: (\S+) TO (\S+) NOT ALLOWED").expect("static pattern"));
static FAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^FAIL").expect("static pattern"));

/// Classify one validator response line. Returns `None` for lines the
/// grammar recognises as benign noise (spec.md §4.I's ignore-list);
/// `Some(Unrecognized)` for anything else unmatched.
#[must_use]
pub fn classify(line: &str) -> Option<MutationRecipe> {
    let line = line.trim();
    if IGNORE.iter().any(|re| re.is_match(line)) {
        return None;
    }
    if let Some(c) = ROUTE49.captures(line) {
        return Some(MutationRecipe::DisconnectVertex(c[1].to_string()));
    }
    if let Some(c) = ROUTE52.captures(line) {
        return Some(MutationRecipe::KillDctSegment(c[1].to_string(), c[2].to_string()));
    }
    if let Some(c) = ROUTE130.captures(line) {
        return Some(MutationRecipe::DisconnectWithAirwayFallback(c[1].to_string(), None));
    }
    if let Some(c) = ROUTE134.captures(line) {
        return Some(MutationRecipe::KillProcedureAndRemember(c[1].to_string()));
    }
    if let Some(c) = ROUTE135.captures(line) {
        return Some(MutationRecipe::KillProcedureAndRemember(c[1].to_string()));
    }
    if let Some(c) = ROUTE139.captures(line) {
        return Some(MutationRecipe::RestrictToAirway {
            vertex: c[2].to_string(),
            airway: c[1].to_string(),
            outgoing: true,
        });
    }
    if let Some(c) = ROUTE140.captures(line) {
        return Some(MutationRecipe::RestrictToAirway {
            vertex: c[2].to_string(),
            airway: c[1].to_string(),
            outgoing: false,
        });
    }
    if let Some(c) = ROUTE165.captures(line) {
        return Some(MutationRecipe::KillDctSegment(c[1].to_string(), c[2].to_string()));
    }
    if let Some(c) = ROUTE168.captures(line) {
        return Some(MutationRecipe::KillDctSegment(c[1].to_string(), c[2].to_string()));
    }
    if let Some(c) = ROUTE171.captures(line) {
        return Some(MutationRecipe::DowngradeAirwayEverywhere(c[1].to_string()));
    }
    if let Some(c) = ROUTE172.captures(line) {
        return Some(MutationRecipe::UpgradeDctToAirway {
            from: c[1].to_string(),
            to: c[2].to_string(),
            airway: c[3].to_string(),
        });
    }
    if ROUTE179.is_match(line) {
        return Some(MutationRecipe::ShrinkCruiseLadder);
    }
    if let Some(c) = PROF_CROSSING.captures(line) {
        let (altmin_ft, altmax_ft) = band(c.get(2).map(|m| m.as_str()), c.get(3).map(|m| m.as_str()));
        return Some(MutationRecipe::KillCrossing(AltitudeBand {
            ident: c[1].to_string(),
            altmin_ft,
            altmax_ft,
        }));
    }
    if let Some(c) = EFPM228.captures(line) {
        return Some(MutationRecipe::KillDctSegment(c[1].to_string(), c[2].to_string()));
    }
    if FAIL.is_match(line) {
        return Some(MutationRecipe::Unrecognized);
    }
    Some(MutationRecipe::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route49_disconnects_the_cited_point() {
        match classify("ROUTE49: THE POINT XIRDO IS UNKNOWN IN THE CONTEXT OF THE ROUTE").unwrap() {
            MutationRecipe::DisconnectVertex(ident) => assert_eq!(ident, "XIRDO"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn route52_kills_the_cited_dct_segment() {
        match classify("ROUTE52: THE DCT SEGMENT XIRDO..ARDEP IS FORBIDDEN").unwrap() {
            MutationRecipe::KillDctSegment(from, to) => {
                assert_eq!(from, "XIRDO");
                assert_eq!(to, "ARDEP");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn route130_disconnects_unknown_designator() {
        match classify("ROUTE130: UNKNOWN DESIGNATOR FOOBR").unwrap() {
            MutationRecipe::DisconnectWithAirwayFallback(ident, airway) => {
                assert_eq!(ident, "FOOBR");
                assert!(airway.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn route172_suggests_an_airway_upgrade() {
        match classify("ROUTE172: MULTIPLE ROUTES BETWEEN AAA AND BBB. N869 IS SUGGESTED").unwrap() {
            MutationRecipe::UpgradeDctToAirway { from, to, airway } => {
                assert_eq!(from, "AAA");
                assert_eq!(to, "BBB");
                assert_eq!(airway, "N869");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ignore_list_is_silenced() {
        assert!(classify("PROF188: 8.33 CARRIAGE NOT CONFIRMED").is_none());
    }

    #[test]
    fn route179_requests_ladder_shrink() {
        assert!(matches!(
            classify("ROUTE179: CRUISING FLIGHT LEVEL INVALID OR INCOMPATIBLE WITH AIRCRAFT PERFORMANCE"),
            Some(MutationRecipe::ShrinkCruiseLadder)
        ));
    }

    #[test]
    fn unmatched_line_falls_back_to_unrecognized() {
        assert!(matches!(classify("SOMETHING ELSE ENTIRELY"), Some(MutationRecipe::Unrecognized)));
    }
}

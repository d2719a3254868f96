// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The traffic-flow-restrictions engine — external collaborator
//! (spec.md §1, §6).

use crate::altitude::IntervalSet;
use crate::flightplan::FlightPlan;
use crate::geom::Point;
use crate::search::{MandatoryAlternative, SequenceStep};

/// Parameters for a single directed-or-bidirectional DCT check
/// (spec.md §6).
#[derive(Clone, Debug)]
pub struct DctParameters {
    pub id0: String,
    pub coord0: Point,
    pub id1: String,
    pub coord1: Point,
    pub altmin_ft: i32,
    pub altmax_ft: i32,
}

/// Result of a DCT check: permitted altitudes in each direction
/// (spec.md §4.D.4).
#[derive(Clone, Debug, Default)]
pub struct DctCheckResult {
    pub forward: IntervalSet,
    pub backward: IntervalSet,
}

/// Which family of rule fired (spec.md §6).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RuleCodeType {
    Forbidden,
    Closed,
    Mandatory,
}

/// A crossing condition a rule's alternative imposes: a named point and
/// an optional altitude band (spec.md §4.H feeds this into `get_altrange`).
#[derive(Clone, Debug)]
pub struct CrossingCondition {
    pub ident: String,
    pub altmin_ft: Option<i32>,
    pub altmax_ft: Option<i32>,
}

/// One alternative of a rule match: either a mandatory-sequence-style
/// ordered set of steps, or a single route-static segment.
#[derive(Clone, Debug)]
pub enum RuleAlternative {
    Sequence(Vec<SequenceStep>),
    RouteSegment { from_ident: String, to_ident: String },
}

/// One rule the validator's `check_fplan` matched against the
/// submitted route (spec.md §6).
#[derive(Clone, Debug)]
pub struct RuleMatch {
    pub code_type: RuleCodeType,
    pub is_dct: bool,
    pub is_unconditional: bool,
    pub is_routestatic: bool,
    pub is_mandatoryinbound: bool,
    pub alternatives: Vec<RuleAlternative>,
    pub crossing_conditions: Vec<CrossingCondition>,
    pub terminal_ident: Option<String>,
}

impl RuleMatch {
    /// Convert a mandatory rule's sequence alternatives into the
    /// planner's input shape (spec.md §4.H: "convert the alternatives
    /// to the mandatory-sequence planner's input format").
    #[must_use]
    pub fn as_mandatory_alternative(&self) -> Option<MandatoryAlternative> {
        if self.code_type != RuleCodeType::Mandatory {
            return None;
        }
        let sequences = self
            .alternatives
            .iter()
            .filter_map(|alt| match alt {
                RuleAlternative::Sequence(steps) => Some(crate::search::MandatorySequence {
                    steps: steps.clone(),
                }),
                RuleAlternative::RouteSegment { .. } => None,
            })
            .collect();
        Some(MandatoryAlternative { sequences })
    }
}

/// Report bundled from `check_fplan` (spec.md §6).
#[derive(Clone, Debug, Default)]
pub struct FplanCheckResult {
    pub rules: Vec<RuleMatch>,
    pub messages: Vec<String>,
}

/// Equipment/capability codes the TFR engine needs to evaluate
/// conditional rules (ICAO field 10/18 equivalents); opaque to the
/// core.
pub type Equipment = Vec<String>;

/// The traffic-flow-restrictions engine the core consults while
/// building the graph and while translating validator rule matches
/// (spec.md §1, §6).
pub trait TfrEngine {
    fn check_dct(&self, params: &DctParameters) -> DctCheckResult;

    fn check_fplan(&self, route: &FlightPlan, equipment: &Equipment) -> FplanCheckResult;

    /// Monotonic counter bumped whenever the engine's underlying rule
    /// set changes. The graph builder's DCT cache (spec.md §4.D.4) is
    /// keyed by this value so a stale generation forces a fresh
    /// `check_dct`, while repeated builds under an unchanged rule set
    /// reuse the cached result instead of re-querying the engine for
    /// every vertex pair.
    fn generation(&self) -> u64;
}

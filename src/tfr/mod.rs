// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Traffic-flow-restrictions engine boundary and rule translator
//! (spec.md §1, §4.D.4, §4.H).

pub mod engine;
pub mod translate;

pub use engine::{
    CrossingCondition, DctCheckResult, DctParameters, Equipment, FplanCheckResult, RuleAlternative,
    RuleCodeType, RuleMatch, TfrEngine,
};
pub use translate::{disconnect, downgrade_to_dct, translate_rule, TranslationOutcome};

// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Crate-wide error type.
//!
//! Follows the same shape as the teacher's `navdata::ParseError`: one
//! `snafu`-derived enum with context selectors, a `Backtrace` on
//! variants that are worth tracing, and `#[snafu(context(false))]` for
//! sources that should convert with a plain `?`.

use snafu::{Backtrace, Snafu};

use crate::graph::AirwayIndex;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("unknown identifier: {ident}"))]
    UnknownIdent { ident: String, backtrace: Backtrace },

    #[snafu(display(
        "vertex identifier {ident:?} is invalid: must be at least two characters and not purely numeric"
    ))]
    InvalidVertexIdent { ident: String, backtrace: Backtrace },

    #[snafu(display("no vertex found within tolerance of the requested SID/STAR fix {ident}"))]
    NoFixWithinTolerance { ident: String, backtrace: Backtrace },

    #[snafu(display("airway index {index:?} has no registered name"))]
    UnknownAirwayIndex {
        index: AirwayIndex,
        backtrace: Backtrace,
    },

    #[snafu(display("the cruise-level ladder is empty; a search requires at least one level"))]
    EmptyCruiseLadder { backtrace: Backtrace },

    #[snafu(display("departure or destination vertex was not set before the search ran"))]
    MissingTerminal { backtrace: Backtrace },

    #[snafu(display(
        "could not render the chosen route to a flight plan: {reason}"
    ))]
    FlightPlanRender { reason: String, backtrace: Backtrace },

    #[snafu(display("validator line could not be parsed: {line:?}"))]
    UnparseableValidatorLine { line: String },

    #[snafu(display("validator child process failed: {reason}"))]
    ValidatorProcess { reason: String, backtrace: Backtrace },

    #[snafu(display("database query failed: {reason}"))]
    Database { reason: String, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

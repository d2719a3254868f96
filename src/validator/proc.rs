// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The validator child process/socket — external collaborator (spec.md
//! §4.I, §5, §6).

use crate::error::Result;

/// A line-oriented child process or socket the repair loop drives: one
/// ICAO route string in, a block of response lines terminated by a
/// blank line out (spec.md §4.I).
pub trait ValidatorProcess {
    /// Send `icao_route` and collect response lines up to the empty
    /// terminator line.
    fn submit(&mut self, icao_route: &str) -> Result<Vec<String>>;

    /// Restart the underlying process after a timeout (spec.md §4.I's
    /// watchdog).
    fn restart(&mut self) -> Result<()>;
}

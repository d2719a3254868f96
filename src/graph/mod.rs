// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! The per-search layered routing graph (spec.md §3, §4.B, §4.C, §4.D).

mod airway_index;
mod builder;
mod edge;
mod lgraph;
mod vertex;

pub use airway_index::{AirwayIndex, AirwayTable};
pub use builder::GraphBuilder;
pub use edge::{Edge, SolutionMarker, INVALID_METRIC};
pub use lgraph::LGraph;
pub use vertex::Vertex;

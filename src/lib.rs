// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Route-search core for a European CFMU/EUROCONTROL IFR autorouter.
//!
//! This crate builds a per-flight layered routing graph from airway,
//! navaid, DCT and SID/STAR inputs, searches it with a multi-level
//! Dijkstra variant that honours mandatory crossing sequences, and
//! drives a k-shortest-path loop against an external flight-plan
//! validator, repairing the graph from the validator's responses until
//! a route is accepted.
//!
//! Databases, the aircraft performance model, the traffic-flow-restriction
//! engine, the validator process and the persistent intel store are all
//! external collaborators: this crate only defines the traits it needs
//! from them (see [`db`], [`perf`], [`tfr::engine`], [`validator::proc`]
//! and [`intel`]).

pub mod airspace;
pub mod altitude;
pub mod config;
pub mod db;
pub mod error;
pub mod flightplan;
pub mod geom;
pub mod graph;
pub mod groundclear;
pub mod intel;
pub mod perf;
pub mod search;
pub mod status;
pub mod tfr;
pub mod validator;

pub use config::SearchConfig;
pub use error::Error;
pub use status::StoppingStatus;

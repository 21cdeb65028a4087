// ChanLock: Verifying Deadlock Freedom of NoC Channel Dependency Graphs
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

#![deny(missing_docs)]

//! # ChanLock: Verifying Deadlock Freedom of NoC Channel Dependency Graphs
//! This is a library for checking liveness and deadlock freedom of
//! network-on-chip channel dependency graphs, and for synthesizing *escape*
//! channel sets which break potential deadlocks across several packet
//! classes sharing the same channels.
//!
//! ## Problem Statement
//! Given
//! - one dependency graph per packet class, each describing which channels a
//!   packet holding some channel may wait for next,
//! - the input (source) and output (sink) channels of each graph,
//!
//! decide whether every input can reach an output (liveness), whether the
//! union of all graphs admits a cyclic hold-and-wait configuration
//! (deadlock), and, if so, find a subset of channels which, designated as
//! always-progressing escapes, provably breaks every such cycle.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Graph`](graph)**: The channel dependency graph model, with the
//!   pointwise union used for cross-class reasoning, and the
//!   [parser](graph::parser) for the line-oriented graph file format.
//!
//! - **[`Smt`](smt)**: A narrow adapter over the SMT backend, exposing
//!   boolean variables with structured identities ([`VarKey`](smt::VarKey)),
//!   clause assertion, incremental solving and model extraction. Everything
//!   above this module is solver-agnostic propositional logic.
//!
//! - **[`Encodings`](encodings)**: The constraint builders. The
//!   [direct](encodings::direct) encodings decide liveness of a single graph
//!   and deadlock freedom of the union. The
//!   [extended](encodings::extended) encodings decide whether a candidate
//!   escape set leaves any cycle reachable, either assuming per-graph
//!   liveness (fixpoint variant) or by explicit hop unrolling (bounded-hop
//!   variant).
//!
//! - **[`Reachability`](reachability)**: Breadth-first analysis computing
//!   the hop bound for the bounded-hop encoding and detecting dead-end
//!   channels from which no output can be reached.
//!
//! - **[`Synthesis`](synthesis)**: The counterexample-guided synthesis loop.
//!   A [verifier](synthesis::EscapeVerifier) seam selects the extended
//!   encoding variant; the [`EscapeSynthesizer`](synthesis::EscapeSynthesizer)
//!   alternates candidate generation and verification until a verified
//!   escape set is found or the search space is exhausted.
//!
//! ## Usage
//!
//! ```
//! use chanlock::graph::DependencyGraph;
//! use chanlock::{verify_liveness, Error};
//!
//! fn main() -> Result<(), Error> {
//!     // a packet entering at channel 0 flows over channel 1 into channel 2
//!     let graph = DependencyGraph::new(
//!         "example",
//!         3,
//!         vec![0],
//!         vec![2],
//!         vec![(0, vec![1]), (1, vec![2])],
//!     )?;
//!
//!     assert!(verify_liveness(&graph)?.holds());
//!
//!     Ok(())
//! }
//! ```

// test modules
mod test;

pub mod encodings;
pub mod graph;
pub mod printer;
pub mod reachability;
pub mod smt;
pub mod synthesis;

mod check;
pub use check::{find_deadlock, synthesize_escape, verify_escape, verify_liveness, CheckResult};

mod error;
pub use error::Error;

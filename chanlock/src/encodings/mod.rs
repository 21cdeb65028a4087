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

//! # Constraint Encodings
//!
//! The builders that translate dependency graphs into propositional
//! constraint systems. Each builder is a small pure function emitting
//! clauses into a mutable [`SmtSession`](crate::smt::SmtSession); callers
//! compose them and interpret the `SAT`/`UNSAT` verdict.
//!
//! All encodings share the same reading of a model: a channel whose
//! variable is *active* (true) holds a packet that is stuck. A constraint
//! of the shape `active(i) ⇒ ⋁ active(receiver)` then states that a packet
//! can only be stuck on `i` if the channel it waits for is itself occupied
//! by a stuck packet.
//!
//! - [`direct`] decides liveness of one graph and deadlock freedom of the
//!   union graph.
//! - [`extended`] decides whether a candidate escape set leaves a cycle
//!   reachable, taking per-graph indirect dependencies into account.

pub mod direct;
pub mod extended;

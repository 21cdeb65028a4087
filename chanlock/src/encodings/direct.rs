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

//! # Direct Encodings
//!
//! The two single-layer constraint systems over the activation variables
//! $x_0 \dots x_{N-1}$ of one graph.

use crate::graph::DependencyGraph;
use crate::smt::{SmtSession, VarKey};

/// Emit the liveness constraint system for a single dependency graph.
///
/// Every non-terminal channel can only be active if one of its receivers is
/// active, all outputs are pinned inactive, and at least one input must be
/// active. A model therefore exhibits a set of channels, reachable from an
/// input, that never drains into an output: `SAT` means the liveness
/// property is **violated**, `UNSAT` means it holds.
pub fn assert_liveness(sess: &mut SmtSession, graph: &DependencyGraph) {
    for channel in graph.channels() {
        let receivers: Vec<VarKey> = graph.receivers(channel).map(VarKey::Channel).collect();
        if receivers.is_empty() {
            continue;
        }
        sess.assert_implies_any(VarKey::Channel(channel), &receivers);
    }
    for &output in graph.outputs() {
        sess.assert_not(VarKey::Channel(output));
    }
    let inputs: Vec<VarKey> = graph.inputs().iter().map(|&c| VarKey::Channel(c)).collect();
    sess.assert_any(&inputs);
}

/// Emit the deadlock search constraint system for the union graph.
///
/// Every non-terminal channel can only be active if one of its receivers is
/// active, terminals are pinned inactive, and at least one channel must be
/// active. Any model is a non-empty channel set in which everyone waits on
/// someone else in the set, i.e. a hold-and-wait cycle: `SAT` means a
/// deadlock is possible, `UNSAT` means the union is deadlock-free.
pub fn assert_deadlock(sess: &mut SmtSession, union: &DependencyGraph) {
    for channel in union.channels() {
        let receivers: Vec<VarKey> = union.receivers(channel).map(VarKey::Channel).collect();
        if receivers.is_empty() {
            sess.assert_not(VarKey::Channel(channel));
        } else {
            sess.assert_implies_any(VarKey::Channel(channel), &receivers);
        }
    }
    let all: Vec<VarKey> = union.channels().map(VarKey::Channel).collect();
    sess.assert_any(&all);
}

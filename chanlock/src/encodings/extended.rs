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

//! # Extended-Graph Encodings
//!
//! The constraint systems that decide whether a candidate escape set $E$
//! breaks every deadlock of the union graph. Next to the union-level
//! activation variables $x_i$, the extended graph carries per-graph
//! duplicated variables capturing *indirect* dependencies: a packet of one
//! class that left the escape channels still follows its own class's
//! dependency graph, and may re-enter a waiting relation many hops later.
//!
//! A union-level channel is only allowed to be active if it can pass the
//! blame on, either to an active union-level receiver or to an indirect
//! dependency of some class starting at the same channel. Channels outside
//! of $E$ are pinned inactive and at least one escape channel must be
//! active, so any model is a cycle that survives the escape selection:
//! `SAT` refutes the candidate, `UNSAT` validates it.
//!
//! Two variants exist. The fixpoint variant represents an indirect
//! dependency of unbounded length with one variable per (graph, channel)
//! pair; it is only sound when every graph is separately live. The
//! bounded-hop variant unrolls the indirect reachability relation up to the
//! hop bound of the [reachability analysis](crate::reachability), which
//! makes no liveness assumption: within that bound, an indirect dependency
//! either reaches an output or revisits a channel, so deeper unrolling
//! cannot reveal new cycles.

use crate::graph::{ChannelId, DependencyGraph};
use crate::smt::{SmtSession, VarKey};

use std::collections::BTreeSet;

/// Emit the fixpoint (liveness-assuming) counterexample system for the
/// candidate escape set.
pub fn assert_escape_counterexample(
    sess: &mut SmtSession,
    union: &DependencyGraph,
    graphs: &[DependencyGraph],
    escape: &BTreeSet<ChannelId>,
) {
    // union level: pass the blame to a union receiver or an indirect
    // dependency of some graph
    for channel in union.channels() {
        let receivers: Vec<ChannelId> = union.receivers(channel).collect();
        if receivers.is_empty() {
            sess.assert_not(VarKey::Channel(channel));
            continue;
        }
        let mut alternatives: Vec<VarKey> = receivers.into_iter().map(VarKey::Channel).collect();
        alternatives.extend((0..graphs.len()).map(|graph| VarKey::Duplicate { graph, channel }));
        sess.assert_implies_any(VarKey::Channel(channel), &alternatives);
    }

    // per graph: indirect dependencies follow that graph's own receivers,
    // either arriving at an active union channel or staying indirect
    for (graph_id, graph) in graphs.iter().enumerate() {
        for channel in union.channels() {
            let duplicate = VarKey::Duplicate { graph: graph_id, channel };
            let receivers: Vec<ChannelId> = graph.receivers(channel).collect();
            if receivers.is_empty() {
                sess.assert_not(duplicate);
                continue;
            }
            let mut alternatives: Vec<VarKey> = Vec::with_capacity(receivers.len() * 2);
            for receiver in receivers {
                alternatives.push(VarKey::Channel(receiver));
                alternatives.push(VarKey::Duplicate { graph: graph_id, channel: receiver });
            }
            sess.assert_implies_any(duplicate, &alternatives);
        }
    }

    assert_escape_activation(sess, union, escape);
}

/// Emit the bounded-hop counterexample system for the candidate escape set.
///
/// `max_hop` is the hop bound $H$; the duplicated variables carry a hop
/// index in $[0, H)$ and represent indirect reachability within a bounded
/// number of hops. With `max_hop == 0` no duplicated variables exist and
/// the system degenerates to the direct deadlock search restricted to the
/// escape channels.
pub fn assert_escape_counterexample_bounded(
    sess: &mut SmtSession,
    union: &DependencyGraph,
    graphs: &[DependencyGraph],
    escape: &BTreeSet<ChannelId>,
    max_hop: usize,
) {
    for channel in union.channels() {
        let receivers: Vec<ChannelId> = union.receivers(channel).collect();
        if receivers.is_empty() {
            sess.assert_not(VarKey::Channel(channel));
            continue;
        }
        let mut alternatives: Vec<VarKey> = receivers.into_iter().map(VarKey::Channel).collect();
        if max_hop > 0 {
            alternatives.extend(
                (0..graphs.len()).map(|graph| VarKey::Hop { graph, channel, hop: max_hop - 1 }),
            );
        }
        sess.assert_implies_any(VarKey::Channel(channel), &alternatives);
    }

    for (graph_id, graph) in graphs.iter().enumerate() {
        for channel in union.channels() {
            let receivers: Vec<ChannelId> = graph.receivers(channel).collect();
            if receivers.is_empty() {
                // dead ends stay inactive at every hop
                for hop in 0..max_hop {
                    sess.assert_not(VarKey::Hop { graph: graph_id, channel, hop });
                }
                continue;
            }
            if max_hop == 0 {
                continue;
            }
            // hop 0: one direct hop onto an active union channel
            let base: Vec<VarKey> = receivers.iter().map(|&r| VarKey::Channel(r)).collect();
            sess.assert_implies_any(VarKey::Hop { graph: graph_id, channel, hop: 0 }, &base);
            // hop k: either already reachable in k-1 hops, or one more hop
            for hop in 1..max_hop {
                let mut alternatives: Vec<VarKey> =
                    vec![VarKey::Hop { graph: graph_id, channel, hop: hop - 1 }];
                alternatives.extend(
                    receivers
                        .iter()
                        .map(|&receiver| VarKey::Hop { graph: graph_id, channel: receiver, hop: hop - 1 }),
                );
                sess.assert_implies_any(VarKey::Hop { graph: graph_id, channel, hop }, &alternatives);
                sess.assert_implies_any(
                    VarKey::Hop { graph: graph_id, channel, hop: hop - 1 },
                    &[VarKey::Hop { graph: graph_id, channel, hop }],
                );
            }
        }
    }

    assert_escape_activation(sess, union, escape);
}

/// Pin every channel outside of the escape set inactive and require at
/// least one escape channel to be active.
fn assert_escape_activation(
    sess: &mut SmtSession,
    union: &DependencyGraph,
    escape: &BTreeSet<ChannelId>,
) {
    for channel in union.channels() {
        if !escape.contains(&channel) {
            sess.assert_not(VarKey::Channel(channel));
        }
    }
    let active: Vec<VarKey> = escape.iter().map(|&c| VarKey::Channel(c)).collect();
    sess.assert_any(&active);
}

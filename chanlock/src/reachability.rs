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

//! # Reachability Analysis
//!
//! Breadth-first traversal of a single dependency graph from its inputs.
//! The analysis serves two purposes: it rejects graphs in which a packet
//! can reach a channel from which no output is reachable (a non-output
//! dead end), and it computes the hop bound $H$ used by the
//! [bounded-hop encoding](crate::encodings::extended). Within $H$ hops,
//! any indirect dependency either reaches an output or revisits a channel,
//! so unrolling deeper than $H$ cannot uncover new loops.

use crate::graph::{ChannelId, DependencyGraph};

use std::collections::{BTreeSet, VecDeque};

/// Result of the reachability analysis of one dependency graph
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HopBound {
    /// No dead end is reachable; the payload is the maximum breadth-first
    /// depth over all inputs (0 for a graph without inputs).
    Bounded(usize),
    /// A packet can get stuck: the payload holds the reachable channels
    /// that have no receivers and are not outputs.
    Unreachable(Vec<ChannelId>),
}

/// Traverse the graph from every input and compute the [`HopBound`].
pub fn max_hop(graph: &DependencyGraph) -> HopBound {
    let mut dead_ends: BTreeSet<ChannelId> = BTreeSet::new();
    let mut bound = 0;

    for &input in graph.inputs() {
        let mut distance = vec![usize::MAX; graph.num_channels()];
        let mut queue: VecDeque<ChannelId> = VecDeque::new();
        distance[input.index()] = 0;
        queue.push_back(input);
        while let Some(channel) = queue.pop_front() {
            let hops = distance[channel.index()];
            bound = bound.max(hops);
            if graph.is_terminal(channel) && !graph.outputs().contains(&channel) {
                dead_ends.insert(channel);
            }
            for receiver in graph.receivers(channel) {
                if distance[receiver.index()] == usize::MAX {
                    distance[receiver.index()] = hops + 1;
                    queue.push_back(receiver);
                }
            }
        }
    }

    if dead_ends.is_empty() {
        HopBound::Bounded(bound)
    } else {
        HopBound::Unreachable(dead_ends.into_iter().collect())
    }
}

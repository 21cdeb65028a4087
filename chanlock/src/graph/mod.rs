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

//! # Channel Dependency Graphs
//!
//! A dependency graph describes how one packet class may move between the
//! channels of a network-on-chip: if channel $j$ is a receiver of channel
//! $i$, then a packet holding $i$ may wait for $j$ next. Channels are plain
//! indices in $[0, N)$. Input channels are the sources where packets enter,
//! output channels are the sinks where they leave.
//!
//! Graphs are constructed once (usually by the [parser](crate::graph::parser))
//! and never mutated. Several graphs over a shared index space can be
//! combined with [`DependencyGraph::union`], which is the structure all
//! cross-class deadlock reasoning operates on.

pub mod parser;

use petgraph::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

type IndexType = u32;
/// Channel Identification (and index into the graph)
pub type ChannelId = NodeIndex<IndexType>;
/// The forward dependency relation of a single packet class
pub type ComGraph = DiGraph<(), (), IndexType>;

/// Error while building a dependency graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A channel index is outside of the graph's channel range
    #[error("Channel index {channel} is out of range for {num_channels} channels!")]
    ChannelOutOfRange {
        /// The offending channel index
        channel: usize,
        /// The number of channels of the graph
        num_channels: usize,
    },
    /// A channel is declared as both an input and an output
    #[error("Channel {0} appears in both the inputs and the outputs!")]
    InputOutputOverlap(usize),
}

/// # Channel Dependency Graph
///
/// One dependency graph per packet class, consisting of the channel count,
/// the input and output channel sets, and the forward dependency relation
/// `coms`. Receiver lists have set semantics: duplicated receivers collapse
/// into a single edge on construction.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    name: String,
    graph: ComGraph,
    inputs: BTreeSet<ChannelId>,
    outputs: BTreeSet<ChannelId>,
}

impl DependencyGraph {
    /// Build a new dependency graph and check its validity. `coms` is a
    /// sequence of `(sender, receivers)` entries; several entries for the
    /// same sender are merged. The check fails if any referenced channel
    /// index is not in `[0, num_channels)`, or if a channel appears in both
    /// `inputs` and `outputs`.
    pub fn new(
        name: impl Into<String>,
        num_channels: usize,
        inputs: Vec<usize>,
        outputs: Vec<usize>,
        coms: Vec<(usize, Vec<usize>)>,
    ) -> Result<Self, GraphError> {
        let check_range = |channel: usize| {
            if channel < num_channels {
                Ok(())
            } else {
                Err(GraphError::ChannelOutOfRange { channel, num_channels })
            }
        };

        let mut graph = ComGraph::with_capacity(num_channels, coms.len());
        for _ in 0..num_channels {
            graph.add_node(());
        }
        for (sender, receivers) in coms {
            check_range(sender)?;
            for receiver in receivers {
                check_range(receiver)?;
                graph.update_edge(ChannelId::new(sender), ChannelId::new(receiver), ());
            }
        }

        let mut input_set: BTreeSet<ChannelId> = BTreeSet::new();
        for input in inputs {
            check_range(input)?;
            input_set.insert(ChannelId::new(input));
        }
        let mut output_set: BTreeSet<ChannelId> = BTreeSet::new();
        for output in outputs {
            check_range(output)?;
            if input_set.contains(&ChannelId::new(output)) {
                return Err(GraphError::InputOutputOverlap(output));
            }
            output_set.insert(ChannelId::new(output));
        }

        Ok(Self { name: name.into(), graph, inputs: input_set, outputs: output_set })
    }

    /// Build the union of several dependency graphs: the channel count is
    /// the maximum over all graphs (smaller graphs are zero-extended), and
    /// the inputs, outputs and receiver sets are unioned pointwise.
    pub fn union(graphs: &[Self]) -> Self {
        let num_channels = graphs.iter().map(|g| g.num_channels()).max().unwrap_or(0);
        let mut graph = ComGraph::with_capacity(num_channels, 0);
        for _ in 0..num_channels {
            graph.add_node(());
        }
        let mut inputs: BTreeSet<ChannelId> = BTreeSet::new();
        let mut outputs: BTreeSet<ChannelId> = BTreeSet::new();
        for g in graphs {
            inputs.extend(g.inputs.iter().copied());
            outputs.extend(g.outputs.iter().copied());
            for sender in g.graph.node_indices() {
                for receiver in g.graph.neighbors(sender) {
                    graph.update_edge(sender, receiver, ());
                }
            }
        }
        Self { name: String::from("union"), graph, inputs, outputs }
    }

    /// Returns the name of the graph (used for diagnostics only)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of channels
    pub fn num_channels(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate over all channels of the graph
    pub fn channels(&self) -> impl Iterator<Item = ChannelId> {
        self.graph.node_indices()
    }

    /// Returns the set of input channels
    pub fn inputs(&self) -> &BTreeSet<ChannelId> {
        &self.inputs
    }

    /// Returns the set of output channels
    pub fn outputs(&self) -> &BTreeSet<ChannelId> {
        &self.outputs
    }

    /// Iterate over the receivers of the given channel. A channel outside of
    /// the graph's range has no receivers, which realizes zero-extension
    /// when several graphs of different size are encoded together.
    pub fn receivers(&self, channel: ChannelId) -> impl Iterator<Item = ChannelId> + '_ {
        self.graph.neighbors(channel)
    }

    /// Returns true if the given channel has no receivers
    pub fn is_terminal(&self, channel: ChannelId) -> bool {
        self.graph.neighbors(channel).next().is_none()
    }
}

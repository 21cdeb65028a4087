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

//! # Escape Set Synthesis
//!
//! Counterexample-guided synthesis of an escape channel set. The
//! [`EscapeSynthesizer`] keeps an *outer* problem whose models are escape
//! candidates that keep every input connected to an output in every graph.
//! Each candidate is handed to an [`EscapeVerifier`], which runs one of the
//! [extended encodings](crate::encodings::extended). A refuted candidate
//! comes back with a counterexample loop; excluding that loop from the
//! outer problem and re-solving eliminates at least one candidate per
//! iteration, so the loop terminates on the finite search space with
//! either a verified escape set or the definitive answer that none exists.
//!
//! The verifier is a trait seam so that both verification variants plug
//! into the same loop:
//!
//! - [`FixpointVerifier`] uses the liveness-assuming fixpoint encoding,
//! - [`BoundedHopVerifier`] computes the hop bound up front (rejecting
//!   graphs with reachable dead ends) and uses the bounded-hop encoding.

use crate::encodings::extended;
use crate::graph::{ChannelId, DependencyGraph};
use crate::printer;
use crate::reachability::{max_hop, HopBound};
use crate::smt::{SmtSession, SmtVerdict, VarKey};
use crate::Error;

use log::*;
use std::collections::BTreeSet;
use z3::{Config, Context};

/// Interface for the verification half of the synthesis loop
pub trait EscapeVerifier<'a>: Sized {
    /// Prepare a verifier for the given union graph and per-class graphs.
    /// The bounded-hop verifier runs the reachability analysis here and
    /// fails with [`Error::PacketUnreachable`] before any solver is
    /// created.
    fn new(union: &'a DependencyGraph, graphs: &'a [DependencyGraph]) -> Result<Self, Error>;

    /// Check one candidate escape set. Returns `None` if the candidate is
    /// verified, or the support set of a counterexample loop if it is
    /// refuted.
    fn verify(&self, escape: &BTreeSet<ChannelId>) -> Result<Option<Vec<ChannelId>>, Error>;
}

/// Verifier using the liveness-assuming fixpoint encoding
pub struct FixpointVerifier<'a> {
    union: &'a DependencyGraph,
    graphs: &'a [DependencyGraph],
}

impl<'a> EscapeVerifier<'a> for FixpointVerifier<'a> {
    fn new(union: &'a DependencyGraph, graphs: &'a [DependencyGraph]) -> Result<Self, Error> {
        Ok(Self { union, graphs })
    }

    fn verify(&self, escape: &BTreeSet<ChannelId>) -> Result<Option<Vec<ChannelId>>, Error> {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let mut sess = SmtSession::new(&ctx);
        extended::assert_escape_counterexample(&mut sess, self.union, self.graphs, escape);
        match sess.check()? {
            SmtVerdict::Unsat => Ok(None),
            SmtVerdict::Sat => Ok(Some(sess.active_channels()?)),
        }
    }
}

/// Verifier using the bounded-hop encoding
pub struct BoundedHopVerifier<'a> {
    union: &'a DependencyGraph,
    graphs: &'a [DependencyGraph],
    max_hop: usize,
}

impl<'a> EscapeVerifier<'a> for BoundedHopVerifier<'a> {
    fn new(union: &'a DependencyGraph, graphs: &'a [DependencyGraph]) -> Result<Self, Error> {
        let mut bound = 0;
        let mut dead_ends: BTreeSet<ChannelId> = BTreeSet::new();
        for graph in graphs {
            match max_hop(graph) {
                HopBound::Bounded(hops) => bound = bound.max(hops),
                HopBound::Unreachable(channels) => dead_ends.extend(channels),
            }
        }
        if !dead_ends.is_empty() {
            return Err(Error::PacketUnreachable(dead_ends.into_iter().collect()));
        }
        debug!("Hop bound for the extended encoding: {}", bound);
        Ok(Self { union, graphs, max_hop: bound })
    }

    fn verify(&self, escape: &BTreeSet<ChannelId>) -> Result<Option<Vec<ChannelId>>, Error> {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let mut sess = SmtSession::new(&ctx);
        extended::assert_escape_counterexample_bounded(
            &mut sess,
            self.union,
            self.graphs,
            escape,
            self.max_hop,
        );
        match sess.check()? {
            SmtVerdict::Unsat => Ok(None),
            SmtVerdict::Sat => Ok(Some(sess.active_channels()?)),
        }
    }
}

/// Shape of the outer candidate constraint for non-terminal channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OuterVariant {
    /// Every non-terminal channel needs one of its receivers among the
    /// candidates, in every graph.
    ReceiversOnly,
    /// As [`OuterVariant::ReceiversOnly`], but the channel itself also
    /// counts as a candidate.
    WithSender,
}

/// The states of the synthesis loop
enum SynthesisState {
    Propose,
    Verify(BTreeSet<ChannelId>),
    Refine(Vec<ChannelId>),
    DoneSuccess(BTreeSet<ChannelId>),
    DoneFailure,
}

/// # Counterexample-Guided Escape Synthesizer
///
/// Alternates between proposing an escape candidate from the outer problem
/// and verifying it with `V`. The outer solver session lives across
/// iterations; refinement only ever appends exclusion clauses to it.
pub struct EscapeSynthesizer<'a, V> {
    graphs: &'a [DependencyGraph],
    variant: OuterVariant,
    verifier: V,
}

impl<'a, V: EscapeVerifier<'a>> EscapeSynthesizer<'a, V> {
    /// Create the synthesizer and prepare the verifier.
    pub fn new(
        union: &'a DependencyGraph,
        graphs: &'a [DependencyGraph],
        variant: OuterVariant,
    ) -> Result<Self, Error> {
        let verifier = V::new(union, graphs)?;
        Ok(Self { graphs, variant, verifier })
    }

    /// Run the synthesis loop to completion. Returns the verified escape
    /// set, or [`Error::NoEscapeExists`] once every candidate is excluded.
    pub fn work(&mut self) -> Result<BTreeSet<ChannelId>, Error> {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let mut outer = SmtSession::new(&ctx);
        assert_outer_problem(&mut outer, self.graphs, self.variant);

        let mut iteration = 0;
        let mut state = SynthesisState::Propose;
        loop {
            state = match state {
                SynthesisState::Propose => {
                    iteration += 1;
                    match outer.check()? {
                        SmtVerdict::Unsat => SynthesisState::DoneFailure,
                        SmtVerdict::Sat => {
                            let escape: BTreeSet<ChannelId> =
                                outer.active_channels()?.into_iter().collect();
                            info!(
                                "Iteration {}: candidate escape set {{{}}}",
                                iteration,
                                printer::channel_set(&escape)
                            );
                            SynthesisState::Verify(escape)
                        }
                    }
                }
                SynthesisState::Verify(escape) => match self.verifier.verify(&escape)? {
                    None => SynthesisState::DoneSuccess(escape),
                    Some(cex_loop) => {
                        debug!("Counterexample loop: {}", printer::channel_list(&cex_loop));
                        SynthesisState::Refine(cex_loop)
                    }
                },
                SynthesisState::Refine(cex_loop) => {
                    let keys: Vec<VarKey> =
                        cex_loop.iter().map(|&channel| VarKey::Channel(channel)).collect();
                    outer.assert_not_all(&keys);
                    SynthesisState::Propose
                }
                SynthesisState::DoneSuccess(escape) => {
                    info!("Escape set verified after {} iteration(s)", iteration);
                    return Ok(escape);
                }
                SynthesisState::DoneFailure => {
                    warn!("All escape candidates are exhausted");
                    return Err(Error::NoEscapeExists);
                }
            };
        }
    }
}

/// Emit the outer synthesis problem: candidate constraints for every
/// non-terminal channel of every graph, and the per-graph duplicated
/// system requiring every input to reach an output through candidate
/// channels.
fn assert_outer_problem(sess: &mut SmtSession, graphs: &[DependencyGraph], variant: OuterVariant) {
    for graph in graphs {
        for channel in graph.channels() {
            let receivers: Vec<ChannelId> = graph.receivers(channel).collect();
            if receivers.is_empty() {
                continue;
            }
            let mut candidates: Vec<VarKey> = Vec::with_capacity(receivers.len() + 1);
            if variant == OuterVariant::WithSender {
                candidates.push(VarKey::Channel(channel));
            }
            candidates.extend(receivers.into_iter().map(VarKey::Channel));
            sess.assert_any(&candidates);
        }
    }

    for (graph_id, graph) in graphs.iter().enumerate() {
        for channel in graph.channels() {
            let duplicate = VarKey::Duplicate { graph: graph_id, channel };
            // a channel can only carry this graph's flow if it is selected
            sess.assert_implies_any(duplicate, &[VarKey::Channel(channel)]);
            let receivers: Vec<VarKey> = graph
                .receivers(channel)
                .map(|receiver| VarKey::Duplicate { graph: graph_id, channel: receiver })
                .collect();
            if !receivers.is_empty() {
                sess.assert_implies_any(duplicate, &receivers);
            } else if !graph.outputs().contains(&channel) {
                sess.assert_not(duplicate);
            }
        }
        for &input in graph.inputs() {
            sess.assert_true(VarKey::Duplicate { graph: graph_id, channel: input });
        }
    }
}

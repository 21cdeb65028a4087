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

//! # ChanLock
//! Wrapper functions for the individual verification and synthesis modes

use crate::encodings::direct;
use crate::graph::{ChannelId, DependencyGraph};
use crate::smt::{SmtSession, SmtVerdict};
use crate::synthesis::{EscapeSynthesizer, EscapeVerifier, OuterVariant};
use crate::Error;

use log::*;
use std::collections::BTreeSet;
use z3::{Config, Context};

/// Outcome of one property check. A violated property is a result, not an
/// error: the payload carries the witness channels, in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// The property holds
    Holds,
    /// The property is violated by the given channels
    Violated(Vec<ChannelId>),
}

impl CheckResult {
    /// Returns true if and only if the property holds
    pub fn holds(&self) -> bool {
        matches!(self, CheckResult::Holds)
    }
}

/// # Verify Liveness
///
/// Check that every input of the given dependency graph can reach an
/// output. On violation, the witness is a set of active channels reachable
/// from an input that never drains into an output.
pub fn verify_liveness(graph: &DependencyGraph) -> Result<CheckResult, Error> {
    info!("Checking the liveness property of {}", graph.name());
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let mut sess = SmtSession::new(&ctx);
    direct::assert_liveness(&mut sess, graph);
    match sess.check()? {
        SmtVerdict::Unsat => Ok(CheckResult::Holds),
        SmtVerdict::Sat => Ok(CheckResult::Violated(sess.active_channels()?)),
    }
}

/// # Search a Deadlock
///
/// Check the union of all dependency graphs for a hold-and-wait cycle,
/// assuming each graph is separately live. On violation, the witness is
/// the loop.
pub fn find_deadlock(union: &DependencyGraph) -> Result<CheckResult, Error> {
    info!("Searching a deadlock in the union of all graphs");
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let mut sess = SmtSession::new(&ctx);
    direct::assert_deadlock(&mut sess, union);
    match sess.check()? {
        SmtVerdict::Unsat => Ok(CheckResult::Holds),
        SmtVerdict::Sat => Ok(CheckResult::Violated(sess.active_channels()?)),
    }
}

/// # Verify an Escape Set
///
/// Check that the given escape set breaks every deadlock of the union
/// graph. The type argument selects the verification variant:
/// [`FixpointVerifier`](crate::synthesis::FixpointVerifier) assumes
/// per-graph liveness, while
/// [`BoundedHopVerifier`](crate::synthesis::BoundedHopVerifier) runs the
/// reachability analysis first and makes no such assumption.
pub fn verify_escape<'a, V: EscapeVerifier<'a>>(
    union: &'a DependencyGraph,
    graphs: &'a [DependencyGraph],
    escape: &BTreeSet<ChannelId>,
) -> Result<CheckResult, Error> {
    info!("Verifying an escape set of {} channel(s)", escape.len());
    let verifier = V::new(union, graphs)?;
    Ok(match verifier.verify(escape)? {
        None => CheckResult::Holds,
        Some(cex_loop) => CheckResult::Violated(cex_loop),
    })
}

/// # Synthesize an Escape Set
///
/// Run the counterexample-guided synthesis loop and return a verified
/// escape set, or [`Error::NoEscapeExists`] if none exists. The type
/// argument selects the verification variant, the [`OuterVariant`] the
/// shape of the candidate constraints.
///
/// ## Usage
///
/// ```
/// use chanlock::graph::DependencyGraph;
/// use chanlock::synthesis::{FixpointVerifier, OuterVariant};
/// use chanlock::{synthesize_escape, Error};
///
/// fn main() -> Result<(), Error> {
///     // two packet classes crossing the same two channels in opposite
///     // directions: the union has a cycle, one escape channel breaks it
///     let forward = DependencyGraph::new("forward", 2, vec![], vec![], vec![(0, vec![1])])?;
///     let backward = DependencyGraph::new("backward", 2, vec![], vec![], vec![(1, vec![0])])?;
///     let graphs = vec![forward, backward];
///     let union = DependencyGraph::union(&graphs);
///
///     let escape = synthesize_escape::<FixpointVerifier>(
///         &union,
///         &graphs,
///         OuterVariant::WithSender,
///     )?;
///     assert_eq!(escape.len(), 1);
///
///     Ok(())
/// }
/// ```
pub fn synthesize_escape<'a, V: EscapeVerifier<'a>>(
    union: &'a DependencyGraph,
    graphs: &'a [DependencyGraph],
    variant: OuterVariant,
) -> Result<BTreeSet<ChannelId>, Error> {
    info!("Synthesizing an escape set for {} dependency graph(s)", graphs.len());
    let mut synthesizer = EscapeSynthesizer::<V>::new(union, graphs, variant)?;
    match synthesizer.work() {
        Ok(escape) => {
            info!("Found a valid escape set!");
            Ok(escape)
        }
        Err(e) => {
            error!("Could not synthesize an escape set: {}", e);
            Err(e)
        }
    }
}

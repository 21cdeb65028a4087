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

use crate::encodings::extended;
use crate::graph::{ChannelId, DependencyGraph};
use crate::smt::{SmtSession, SmtVerdict};
use crate::synthesis::{BoundedHopVerifier, FixpointVerifier};
use crate::{verify_escape, CheckResult, Error};

use maplit::btreeset;
use std::collections::BTreeSet;
use z3::{Config, Context};

fn ch(index: usize) -> ChannelId {
    ChannelId::new(index)
}

/// Two packet classes crossing the same two channels in opposite
/// directions, without sources or sinks.
fn cross_graphs() -> Vec<DependencyGraph> {
    vec![
        DependencyGraph::new("forward", 2, vec![], vec![], vec![(0, vec![1])]).unwrap(),
        DependencyGraph::new("backward", 2, vec![], vec![], vec![(1, vec![0])]).unwrap(),
    ]
}

/// The same crossing, with each class flowing from its input to its output.
fn cross_graphs_with_flows() -> Vec<DependencyGraph> {
    vec![
        DependencyGraph::new("forward", 2, vec![0], vec![1], vec![(0, vec![1])]).unwrap(),
        DependencyGraph::new("backward", 2, vec![1], vec![0], vec![(1, vec![0])]).unwrap(),
    ]
}

#[test]
fn single_escape_channel_is_accepted() {
    let graphs = cross_graphs();
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(0)];
    assert_eq!(
        verify_escape::<FixpointVerifier>(&union, &graphs, &escape).unwrap(),
        CheckResult::Holds
    );
}

#[test]
fn full_escape_set_is_rejected_with_the_loop() {
    let graphs = cross_graphs();
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(0), ch(1)];
    match verify_escape::<FixpointVerifier>(&union, &graphs, &escape).unwrap() {
        CheckResult::Violated(cex_loop) => assert_eq!(cex_loop, vec![ch(0), ch(1)]),
        result => panic!("expected a counterexample, got {:?}", result),
    }
}

#[test]
fn accepted_escape_stays_accepted() {
    let graphs = cross_graphs();
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(1)];
    assert!(verify_escape::<FixpointVerifier>(&union, &graphs, &escape).unwrap().holds());
    assert!(verify_escape::<FixpointVerifier>(&union, &graphs, &escape).unwrap().holds());
}

#[test]
fn bounded_verifier_accepts_a_valid_escape() {
    let graphs = cross_graphs_with_flows();
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(0)];
    assert_eq!(
        verify_escape::<BoundedHopVerifier>(&union, &graphs, &escape).unwrap(),
        CheckResult::Holds
    );
}

#[test]
fn bounded_verifier_rejects_the_full_escape_set() {
    let graphs = cross_graphs_with_flows();
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(0), ch(1)];
    match verify_escape::<BoundedHopVerifier>(&union, &graphs, &escape).unwrap() {
        CheckResult::Violated(cex_loop) => assert_eq!(cex_loop, vec![ch(0), ch(1)]),
        result => panic!("expected a counterexample, got {:?}", result),
    }
}

#[test]
fn bounded_verifier_reports_dead_ends_before_solving() {
    let graphs =
        vec![DependencyGraph::new("dead_end", 2, vec![0], vec![], vec![(0, vec![1])]).unwrap()];
    let union = DependencyGraph::union(&graphs);
    let escape = btreeset![ch(0)];
    match verify_escape::<BoundedHopVerifier>(&union, &graphs, &escape) {
        Err(Error::PacketUnreachable(dead_ends)) => assert_eq!(dead_ends, vec![ch(1)]),
        result => panic!("expected a dead-end report, got {:?}", result),
    }
}

fn bounded_verdict(
    union: &DependencyGraph,
    graphs: &[DependencyGraph],
    escape: &BTreeSet<ChannelId>,
    max_hop: usize,
) -> SmtVerdict {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let mut sess = SmtSession::new(&ctx);
    extended::assert_escape_counterexample_bounded(&mut sess, union, graphs, escape, max_hop);
    sess.check().unwrap()
}

#[test]
fn deeper_unrolling_preserves_the_verdict() {
    let graphs = cross_graphs_with_flows();
    let union = DependencyGraph::union(&graphs);
    // the hop bound of these graphs is 1
    let valid = btreeset![ch(0)];
    let invalid = btreeset![ch(0), ch(1)];
    for deeper in &[2, 4] {
        assert_eq!(bounded_verdict(&union, &graphs, &valid, 1), SmtVerdict::Unsat);
        assert_eq!(bounded_verdict(&union, &graphs, &valid, *deeper), SmtVerdict::Unsat);
        assert_eq!(bounded_verdict(&union, &graphs, &invalid, 1), SmtVerdict::Sat);
        assert_eq!(bounded_verdict(&union, &graphs, &invalid, *deeper), SmtVerdict::Sat);
    }
}

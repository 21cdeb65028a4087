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

use crate::graph::{ChannelId, DependencyGraph};
use crate::{find_deadlock, verify_liveness, CheckResult};

fn ch(index: usize) -> ChannelId {
    ChannelId::new(index)
}

#[test]
fn liveness_holds_on_a_forwarding_chain() {
    let g = DependencyGraph::new("chain", 3, vec![0], vec![2], vec![(0, vec![1]), (1, vec![2])])
        .unwrap();
    assert_eq!(verify_liveness(&g).unwrap(), CheckResult::Holds);
}

#[test]
fn liveness_fails_on_a_self_loop() {
    let g = DependencyGraph::new("selfloop", 2, vec![0], vec![1], vec![(0, vec![0])]).unwrap();
    match verify_liveness(&g).unwrap() {
        CheckResult::Violated(path) => assert_eq!(path, vec![ch(0)]),
        result => panic!("expected a liveness violation, got {:?}", result),
    }
}

#[test]
fn deadlock_free_chain() {
    let g = DependencyGraph::new("chain", 3, vec![0], vec![2], vec![(0, vec![1]), (1, vec![2])])
        .unwrap();
    let union = DependencyGraph::union(&[g]);
    assert_eq!(find_deadlock(&union).unwrap(), CheckResult::Holds);
}

#[test]
fn deadlock_found_in_a_four_cycle() {
    let g = DependencyGraph::new(
        "cycle",
        4,
        vec![],
        vec![],
        vec![(0, vec![1]), (1, vec![2]), (2, vec![3]), (3, vec![0])],
    )
    .unwrap();
    let union = DependencyGraph::union(&[g]);
    match find_deadlock(&union).unwrap() {
        CheckResult::Violated(cex_loop) => {
            assert_eq!(cex_loop, vec![ch(0), ch(1), ch(2), ch(3)])
        }
        result => panic!("expected a deadlock, got {:?}", result),
    }
}

#[test]
fn deadlock_found_in_a_cross_graph_cycle() {
    let forward = DependencyGraph::new("forward", 2, vec![], vec![], vec![(0, vec![1])]).unwrap();
    let backward = DependencyGraph::new("backward", 2, vec![], vec![], vec![(1, vec![0])]).unwrap();
    let union = DependencyGraph::union(&[forward, backward]);
    match find_deadlock(&union).unwrap() {
        CheckResult::Violated(cex_loop) => assert_eq!(cex_loop, vec![ch(0), ch(1)]),
        result => panic!("expected a deadlock, got {:?}", result),
    }
}

#[test]
fn union_order_does_not_change_the_verdict() {
    let forward = DependencyGraph::new("forward", 2, vec![], vec![], vec![(0, vec![1])]).unwrap();
    let backward = DependencyGraph::new("backward", 2, vec![], vec![], vec![(1, vec![0])]).unwrap();
    let ab = DependencyGraph::union(&[forward.clone(), backward.clone()]);
    let ba = DependencyGraph::union(&[backward, forward]);
    assert_eq!(find_deadlock(&ab).unwrap(), find_deadlock(&ba).unwrap());
}

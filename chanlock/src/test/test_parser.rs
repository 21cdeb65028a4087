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

use crate::graph::parser::{parse_escape, parse_graph, ParseError};
use crate::graph::{ChannelId, GraphError};
use maplit::btreeset;

fn ch(index: usize) -> ChannelId {
    ChannelId::new(index)
}

#[test]
fn parse_simple_graph() {
    let content = "3\n0\n2\n0 1\n1 2\n";
    let g = parse_graph(content, "simple").unwrap();
    assert_eq!(g.name(), "simple");
    assert_eq!(g.num_channels(), 3);
    assert_eq!(g.inputs(), &btreeset![ch(0)]);
    assert_eq!(g.outputs(), &btreeset![ch(2)]);
    assert_eq!(g.receivers(ch(0)).collect::<Vec<_>>(), vec![ch(1)]);
    assert_eq!(g.receivers(ch(1)).collect::<Vec<_>>(), vec![ch(2)]);
    assert!(g.is_terminal(ch(2)));
}

#[test]
fn empty_header_lines_are_empty_sets() {
    let content = "2\n\n\n0 1\n";
    let g = parse_graph(content, "g").unwrap();
    assert!(g.inputs().is_empty());
    assert!(g.outputs().is_empty());
}

#[test]
fn short_lines_are_ignored() {
    let content = "2\n0\n1\n0 1\n1\n\n";
    let g = parse_graph(content, "g").unwrap();
    assert!(g.is_terminal(ch(1)));
}

#[test]
fn repeated_sender_lines_merge() {
    let content = "3\n\n\n0 1\n0 2\n";
    let g = parse_graph(content, "g").unwrap();
    let mut receivers: Vec<usize> = g.receivers(ch(0)).map(|c| c.index()).collect();
    receivers.sort_unstable();
    assert_eq!(receivers, vec![1, 2]);
}

#[test]
fn malformed_integer_is_an_error() {
    let content = "2\n0\n1\n0 x\n";
    assert!(matches!(parse_graph(content, "g"), Err(ParseError::InvalidInteger(_))));
}

#[test]
fn out_of_range_receiver_is_an_error() {
    let content = "2\n0\n1\n0 5\n";
    assert!(matches!(
        parse_graph(content, "g"),
        Err(ParseError::Graph(GraphError::ChannelOutOfRange { channel: 5, num_channels: 2 }))
    ));
}

#[test]
fn missing_header_is_an_error() {
    assert!(matches!(parse_graph("", "g"), Err(ParseError::MissingHeader(1))));
    assert!(matches!(parse_graph("3\n0\n", "g"), Err(ParseError::MissingHeader(3))));
}

#[test]
fn parse_escape_line() {
    assert_eq!(parse_escape("0 2\n", 3).unwrap(), btreeset![ch(0), ch(2)]);
    assert_eq!(parse_escape("2 0 2\n", 3).unwrap(), btreeset![ch(0), ch(2)]);
}

#[test]
fn out_of_range_escape_channel_is_an_error() {
    assert!(matches!(
        parse_escape("5\n", 3),
        Err(ParseError::Graph(GraphError::ChannelOutOfRange { channel: 5, num_channels: 3 }))
    ));
}

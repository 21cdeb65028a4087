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

//! Parses dependency graph files and escape set files
//!
//! The graph file format is line-oriented ASCII: the first line holds the
//! channel count, the second the input channel indices, the third the output
//! channel indices. Every following line starts with a sender index followed
//! by its receiver indices. Lines with fewer than two tokens are ignored,
//! several lines for the same sender are merged, and duplicated receivers
//! collapse (the receiver lists have set semantics).
//!
//! An escape set file holds the escape channel indices on its first line.

use super::{ChannelId, DependencyGraph, GraphError};

use std::collections::BTreeSet;
use std::fs::read_to_string;
use thiserror::Error;

/// Error while parsing a dependency graph file or an escape set file
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file cannot be read
    #[error("Cannot read the file: {0}")]
    Io(#[from] std::io::Error),
    /// A token is not a valid integer
    #[error("Invalid integer token: {0}")]
    InvalidInteger(#[from] std::num::ParseIntError),
    /// One of the header lines is missing
    #[error("Missing header line {0}")]
    MissingHeader(usize),
    /// The parsed structure is not a valid graph
    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

/// Parses the dependency graph file at the given path. The filename is used
/// as the graph name in diagnostics.
pub fn parse_graph_file(filename: impl AsRef<str>) -> Result<DependencyGraph, ParseError> {
    let content = read_to_string(filename.as_ref())?;
    parse_graph(&content, filename.as_ref())
}

/// Parses a dependency graph from its textual representation.
pub fn parse_graph(content: &str, name: impl Into<String>) -> Result<DependencyGraph, ParseError> {
    let mut lines = content.lines();
    let num_channels: usize = lines.next().ok_or(ParseError::MissingHeader(1))?.trim().parse()?;
    let inputs = parse_indices(lines.next().ok_or(ParseError::MissingHeader(2))?)?;
    let outputs = parse_indices(lines.next().ok_or(ParseError::MissingHeader(3))?)?;

    let mut coms: Vec<(usize, Vec<usize>)> = Vec::new();
    for line in lines {
        let indices = parse_indices(line)?;
        if indices.len() < 2 {
            continue;
        }
        coms.push((indices[0], indices[1..].to_vec()));
    }

    Ok(DependencyGraph::new(name, num_channels, inputs, outputs, coms)?)
}

/// Parses the escape set file at the given path. Only the first line is
/// interpreted; it holds the space-separated escape channel indices, all of
/// which must lie in `[0, num_channels)`.
pub fn parse_escape_file(
    filename: impl AsRef<str>,
    num_channels: usize,
) -> Result<BTreeSet<ChannelId>, ParseError> {
    let content = read_to_string(filename.as_ref())?;
    parse_escape(&content, num_channels)
}

/// Parses an escape set from its textual representation.
pub fn parse_escape(content: &str, num_channels: usize) -> Result<BTreeSet<ChannelId>, ParseError> {
    let line = content.lines().next().ok_or(ParseError::MissingHeader(1))?;
    let mut escape: BTreeSet<ChannelId> = BTreeSet::new();
    for channel in parse_indices(line)? {
        if channel >= num_channels {
            return Err(GraphError::ChannelOutOfRange { channel, num_channels }.into());
        }
        escape.insert(ChannelId::new(channel));
    }
    Ok(escape)
}

fn parse_indices(line: &str) -> Result<Vec<usize>, ParseError> {
    line.split_whitespace().map(|token| token.parse().map_err(ParseError::from)).collect()
}

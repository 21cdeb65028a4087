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

//! Module containing all error types

use crate::graph::parser::ParseError;
use crate::graph::{ChannelId, GraphError};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the graph model
    #[error("Graph Error: {0}")]
    Graph(#[from] GraphError),
    /// Error propagated from the graph file parser
    #[error("Parse Error: {0}")]
    Parse(#[from] ParseError),
    /// The SMT backend gave up on the problem. The encodings are purely
    /// propositional, so this only happens on backend failure.
    #[error("The SMT solver returned unknown!")]
    SolverUnknown,
    /// The SMT backend claimed satisfiability but did not produce a model
    #[error("The SMT solver did not produce a model!")]
    NoModel,
    /// The synthesis problem is infeasible: no escape set can break all
    /// cycles while keeping every input connected to an output.
    #[error("No valid escape set exists!")]
    NoEscapeExists,
    /// A packet can reach a channel from which no output is reachable. The
    /// payload holds the dead-end channels.
    #[error("A packet can reach a channel from which no output is reachable!")]
    PacketUnreachable(Vec<ChannelId>),
}

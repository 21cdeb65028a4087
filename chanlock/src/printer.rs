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

//! # Helper (printer) functions for channel sets
//! Module containing helper functions to get formatted strings for witness
//! paths, loops and escape sets.

use crate::graph::ChannelId;

use itertools::Itertools;
use std::collections::BTreeSet;

/// Returns the channel indices of a witness path or loop, space-separated.
pub fn channel_list(channels: &[ChannelId]) -> String {
    channels.iter().map(|channel| channel.index()).join(" ")
}

/// Returns the channel indices of a channel set, space-separated in
/// ascending order.
pub fn channel_set(channels: &BTreeSet<ChannelId>) -> String {
    channels.iter().map(|channel| channel.index()).join(" ")
}

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

use chanlock::graph::parser::{parse_escape_file, parse_graph_file};
use chanlock::graph::{ChannelId, DependencyGraph};
use chanlock::printer;
use chanlock::synthesis::{BoundedHopVerifier, FixpointVerifier, OuterVariant};
use chanlock::{find_deadlock, synthesize_escape, verify_escape, verify_liveness};
use chanlock::{CheckResult, Error};

use clap::Parser;
use log::*;

/// Verify liveness and deadlock freedom of network-on-chip channel
/// dependency graphs, and synthesize escape channel sets breaking potential
/// deadlocks. Each graph file describes the dependency graph of one packet
/// class; all deadlock reasoning runs on the union of the given graphs.
#[derive(Parser, Debug)]
#[clap(name = "chanlock")]
struct Arguments {
    /// Verify the liveness property of every dependency graph independently
    #[clap(short = 'a', long)]
    liveness: bool,
    /// Search a hold-and-wait loop in the union of all dependency graphs
    #[clap(short = 'b', long)]
    deadlock: bool,
    /// Verify the escape set in the given file (fixpoint encoding)
    #[clap(short = 'c', long, value_name = "FILE")]
    check_escape: Option<String>,
    /// Synthesize an escape set (fixpoint encoding)
    #[clap(short = 'd', long)]
    synthesize: bool,
    /// Verify the escape set in the given file (bounded-hop encoding)
    #[clap(short = 'e', long, value_name = "FILE")]
    check_escape_bounded: Option<String>,
    /// Synthesize an escape set (bounded-hop encoding)
    #[clap(short = 'f', long)]
    synthesize_bounded: bool,
    /// Dependency graph files, one per packet class
    #[clap(required = true, value_name = "GRAPH")]
    graph_files: Vec<String>,
}

fn main() {
    pretty_env_logger::init();
    let args = Arguments::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Run all requested modes. Returns `Ok(true)` if every requested property
/// holds, `Ok(false)` if some property is violated or synthesis is
/// infeasible. Dead-end reports from the bounded-hop modes count as clean
/// results.
fn run(args: &Arguments) -> Result<bool, Error> {
    let mut graphs: Vec<DependencyGraph> = Vec::with_capacity(args.graph_files.len());
    for file in &args.graph_files {
        graphs.push(parse_graph_file(file)?);
    }
    info!("Loaded {} dependency graph(s)", graphs.len());

    let mut all_hold = true;

    if args.liveness {
        for graph in &graphs {
            match verify_liveness(graph)? {
                CheckResult::Holds => println!("liveness property holds in {}", graph.name()),
                CheckResult::Violated(path) => {
                    println!("liveness property failed in {} with a path:", graph.name());
                    println!("{}", printer::channel_list(&path));
                    all_hold = false;
                }
            }
        }
    }

    let needs_union = args.deadlock
        || args.check_escape.is_some()
        || args.synthesize
        || args.check_escape_bounded.is_some()
        || args.synthesize_bounded;
    if !needs_union {
        return Ok(all_hold);
    }
    let union = DependencyGraph::union(&graphs);

    if args.deadlock {
        match find_deadlock(&union)? {
            CheckResult::Holds => println!("deadlock-free property holds"),
            CheckResult::Violated(cex_loop) => {
                println!("deadlock-free property failed with a loop:");
                println!("{}", printer::channel_list(&cex_loop));
                all_hold = false;
            }
        }
    }

    if let Some(file) = &args.check_escape {
        let escape = parse_escape_file(file, union.num_channels())?;
        match verify_escape::<FixpointVerifier>(&union, &graphs, &escape)? {
            CheckResult::Holds => println!("escape set verified"),
            CheckResult::Violated(cex_loop) => {
                println!("escape set rejected with a loop:");
                println!("{}", printer::channel_list(&cex_loop));
                all_hold = false;
            }
        }
    }

    if args.synthesize {
        match synthesize_escape::<FixpointVerifier>(&union, &graphs, OuterVariant::WithSender) {
            Ok(escape) => {
                println!("escape set synthesized:");
                println!("{}", printer::channel_set(&escape));
            }
            Err(Error::NoEscapeExists) => {
                println!("no valid escape set exists");
                all_hold = false;
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(file) = &args.check_escape_bounded {
        let escape = parse_escape_file(file, union.num_channels())?;
        match verify_escape::<BoundedHopVerifier>(&union, &graphs, &escape) {
            Ok(CheckResult::Holds) => println!("escape set verified"),
            Ok(CheckResult::Violated(cex_loop)) => {
                println!("escape set rejected with a loop:");
                println!("{}", printer::channel_list(&cex_loop));
                all_hold = false;
            }
            Err(Error::PacketUnreachable(dead_ends)) => report_unreachable(&dead_ends),
            Err(e) => return Err(e),
        }
    }

    if args.synthesize_bounded {
        match synthesize_escape::<BoundedHopVerifier>(&union, &graphs, OuterVariant::ReceiversOnly)
        {
            Ok(escape) => {
                println!("escape set synthesized:");
                println!("{}", printer::channel_set(&escape));
            }
            Err(Error::NoEscapeExists) => {
                println!("no valid escape set exists");
                all_hold = false;
            }
            Err(Error::PacketUnreachable(dead_ends)) => report_unreachable(&dead_ends),
            Err(e) => return Err(e),
        }
    }

    Ok(all_hold)
}

/// Report reachable dead-end channels. This aborts the affected mode, but
/// it is a clean result and does not change the exit code.
fn report_unreachable(dead_ends: &[ChannelId]) {
    println!("packet unreachable, dead-end channels:");
    println!("{}", printer::channel_list(dead_ends));
}

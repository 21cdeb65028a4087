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

//! # SMT Backend Adapter
//!
//! This module is the only place where the solver backend (z3) is visible.
//! Everything above it works with [`VarKey`], a structured identity for the
//! boolean variables of an encoding, and with [`SmtSession`], which offers
//! the narrow contract the encodings need: variable creation, assertion of
//! implication / disjunction / negation clauses, an incremental
//! [`check`](SmtSession::check), and model extraction on `SAT`.
//!
//! Assertions accumulate over the lifetime of a session. The synthesis loop
//! relies on this: it appends one exclusion clause per counterexample and
//! re-checks the same session, so the solver keeps everything it has learned
//! so far. Scoped assertion (`push`/`pop`) is never needed, since no clause
//! is ever retracted within one mode.

use crate::graph::ChannelId;
use crate::Error;

use std::collections::{BTreeMap, BTreeSet};
use z3::ast::Bool;
use z3::{Context, SatResult, Solver};

/// Structured identity of one boolean variable in an encoding. The z3-side
/// name is derived from the key, but only for diagnostics; all bookkeeping
/// goes through the key itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarKey {
    /// Union-level activation variable $x_i$: channel $i$ holds a stuck
    /// packet.
    Channel(ChannelId),
    /// Per-graph duplicated variable $d_{g,i}$: graph $g$ has an indirect
    /// dependency path starting at channel $i$.
    Duplicate {
        /// Index of the graph the duplicate belongs to
        graph: usize,
        /// The duplicated channel
        channel: ChannelId,
    },
    /// Per-graph, per-hop duplicated variable $d_{g,i,k}$: graph $g$ has an
    /// indirect dependency path of at most $k+1$ hops starting at channel
    /// $i$.
    Hop {
        /// Index of the graph the duplicate belongs to
        graph: usize,
        /// The duplicated channel
        channel: ChannelId,
        /// The hop index
        hop: usize,
    },
}

impl VarKey {
    fn smt_name(&self) -> String {
        match self {
            VarKey::Channel(channel) => format!("x{}", channel.index()),
            VarKey::Duplicate { graph, channel } => format!("x{}_{}", channel.index(), graph),
            VarKey::Hop { graph, channel, hop } => {
                format!("x{}_{}_{}", channel.index(), graph, hop)
            }
        }
    }
}

/// Outcome of a solver invocation. `UNKNOWN` never reaches the caller; it is
/// mapped to [`Error::SolverUnknown`] by [`SmtSession::check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmtVerdict {
    /// The asserted constraint system is satisfiable
    Sat,
    /// The asserted constraint system is unsatisfiable
    Unsat,
}

/// # SMT Session
///
/// One incremental solver instance together with the boolean variables
/// declared so far. Variables are created on first use; asserting a clause
/// over a key that was never mentioned before implicitly declares it.
pub struct SmtSession<'ctx> {
    ctx: &'ctx Context,
    solver: Solver<'ctx>,
    vars: BTreeMap<VarKey, Bool<'ctx>>,
}

impl<'ctx> SmtSession<'ctx> {
    /// Create a new session with an empty assertion stack.
    pub fn new(ctx: &'ctx Context) -> Self {
        Self { ctx, solver: Solver::new(ctx), vars: BTreeMap::new() }
    }

    fn var(&mut self, key: VarKey) -> Bool<'ctx> {
        if let Some(var) = self.vars.get(&key) {
            return var.clone();
        }
        let var = Bool::new_const(self.ctx, key.smt_name());
        self.vars.insert(key, var.clone());
        var
    }

    /// Assert `lhs ⇒ (rhs₁ ∨ rhs₂ ∨ …)`. With an empty right-hand side the
    /// disjunction is false, so the assertion pins `lhs` inactive.
    pub fn assert_implies_any(&mut self, lhs: VarKey, rhs: &[VarKey]) {
        let premise = self.var(lhs);
        let options: Vec<Bool<'ctx>> = rhs.iter().map(|&key| self.var(key)).collect();
        let refs: Vec<&Bool<'ctx>> = options.iter().collect();
        self.solver.assert(&premise.implies(&Bool::or(self.ctx, &refs)));
    }

    /// Assert the disjunction `key₁ ∨ key₂ ∨ …`.
    pub fn assert_any(&mut self, keys: &[VarKey]) {
        let options: Vec<Bool<'ctx>> = keys.iter().map(|&key| self.var(key)).collect();
        let refs: Vec<&Bool<'ctx>> = options.iter().collect();
        self.solver.assert(&Bool::or(self.ctx, &refs));
    }

    /// Assert that the given variable is true.
    pub fn assert_true(&mut self, key: VarKey) {
        let var = self.var(key);
        self.solver.assert(&var);
    }

    /// Assert that the given variable is false.
    pub fn assert_not(&mut self, key: VarKey) {
        let var = self.var(key);
        self.solver.assert(&var.not());
    }

    /// Assert the exclusion clause `¬(key₁ ∧ key₂ ∧ …)`.
    pub fn assert_not_all(&mut self, keys: &[VarKey]) {
        let parts: Vec<Bool<'ctx>> = keys.iter().map(|&key| self.var(key)).collect();
        let refs: Vec<&Bool<'ctx>> = parts.iter().collect();
        self.solver.assert(&Bool::and(self.ctx, &refs).not());
    }

    /// Solve the constraint system asserted so far.
    pub fn check(&mut self) -> Result<SmtVerdict, Error> {
        match self.solver.check() {
            SatResult::Sat => Ok(SmtVerdict::Sat),
            SatResult::Unsat => Ok(SmtVerdict::Unsat),
            SatResult::Unknown => Err(Error::SolverUnknown),
        }
    }

    /// Returns the set of variables that are true in the current model. A
    /// variable the model leaves uninterpreted counts as false, so don't-care
    /// variables never inflate a witness. Must only be called after
    /// [`check`](SmtSession::check) returned [`SmtVerdict::Sat`].
    pub fn solution(&self) -> Result<BTreeSet<VarKey>, Error> {
        let model = self.solver.get_model().ok_or(Error::NoModel)?;
        Ok(self
            .vars
            .iter()
            .filter(|(_, var)| {
                model.eval(*var, false).and_then(|value| value.as_bool()).unwrap_or(false)
            })
            .map(|(&key, _)| key)
            .collect())
    }

    /// Returns the union-level channels that are active in the current
    /// model, in ascending channel order.
    pub fn active_channels(&self) -> Result<Vec<ChannelId>, Error> {
        Ok(self
            .solution()?
            .into_iter()
            .filter_map(|key| match key {
                VarKey::Channel(channel) => Some(channel),
                _ => None,
            })
            .collect())
    }
}

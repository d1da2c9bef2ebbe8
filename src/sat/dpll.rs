use std::time::{Duration, Instant};

use crate::cnf::cnf::Cnf;
use crate::sat::assignment::Assignment;
use crate::sat::error::SolveError;
use crate::sat::formula::Formula;
use crate::sat::heuristic::{Brancher, Heuristic};
use crate::sat::simplify::{eliminate_pure_literals, propagate_units};
use crate::sat::verify::check_model;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    Sat(Assignment),
    Unsat,
}

impl SatResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatResult::Sat(_))
    }

    pub fn model(&self) -> Option<&Assignment> {
        match self {
            SatResult::Sat(m) => Some(m),
            SatResult::Unsat => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    /// Seed for the `random` heuristic; ignored by the others.
    pub seed: u64,
    /// Checked at the top of every recursive call.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: usize,
    pub conflicts: usize,
    /// Literals committed by unit propagation, decision units included.
    pub propagations: usize,
    pub pure_literals: usize,
    /// Deepest nesting of decisions reached.
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub result: SatResult,
    pub stats: SolverStats,
    pub elapsed: Duration,
}

pub fn solve(cnf: &Cnf) -> Result<SatResult, SolveError> {
    solve_with(cnf, &SolverConfig::default()).map(|out| out.result)
}

pub fn is_sat(cnf: &Cnf) -> Result<bool, SolveError> {
    Ok(solve(cnf)?.is_sat())
}

pub fn solve_model(cnf: &Cnf) -> Result<Option<Assignment>, SolveError> {
    match solve(cnf)? {
        SatResult::Sat(m) => Ok(Some(m)),
        SatResult::Unsat => Ok(None),
    }
}

/// Runs DPLL on `cnf` and verifies any model against every input clause
/// before returning it.
pub fn solve_with(cnf: &Cnf, config: &SolverConfig) -> Result<SolveOutcome, SolveError> {
    let start = Instant::now();
    let mut search = Search {
        brancher: Brancher::new(config.heuristic, config.seed),
        stats: SolverStats::default(),
        start,
        timeout: config.timeout,
    };
    let result = search.dpll(Formula::from_cnf(cnf), Assignment::new(), 0)?;
    if let SatResult::Sat(model) = &result {
        check_model(cnf, model)?;
    }
    let stats = search.stats;
    log::debug!(
        "{} with {}: decisions={} conflicts={} max_depth={}",
        if result.is_sat() { "sat" } else { "unsat" },
        config.heuristic,
        stats.decisions,
        stats.conflicts,
        stats.max_depth
    );
    Ok(SolveOutcome {
        result,
        stats,
        elapsed: start.elapsed(),
    })
}

struct Search {
    brancher: Brancher,
    stats: SolverStats,
    start: Instant,
    timeout: Option<Duration>,
}

impl Search {
    fn dpll(
        &mut self,
        formula: Formula,
        assignment: Assignment,
        depth: usize,
    ) -> Result<SatResult, SolveError> {
        self.check_deadline()?;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let committed = assignment.len();
        let (formula, assignment) = propagate_units(formula, assignment)?;
        self.stats.propagations += assignment.len() - committed;
        if formula.contains_empty_clause() {
            self.stats.conflicts += 1;
            log::debug!("conflict at depth {}", depth);
            return Ok(SatResult::Unsat);
        }

        let committed = assignment.len();
        let (formula, assignment) = eliminate_pure_literals(formula, assignment)?;
        self.stats.pure_literals += assignment.len() - committed;
        if formula.is_empty() {
            return Ok(SatResult::Sat(assignment));
        }

        let lit = self.brancher.pick(&formula)?;
        self.stats.decisions += 1;
        log::debug!("depth {}: decide {}", depth + 1, lit);

        let first = self.dpll(formula.clone().with_unit(lit), assignment.clone(), depth + 1)?;
        if first.is_sat() {
            return Ok(first);
        }
        log::debug!("depth {}: flip to {}", depth + 1, lit.neg());
        self.dpll(formula.with_unit(lit.neg()), assignment, depth + 1)
    }

    fn check_deadline(&self) -> Result<(), SolveError> {
        match self.timeout {
            Some(limit) if self.start.elapsed() > limit => Err(SolveError::DeadlineExceeded {
                elapsed_ms: self.start.elapsed().as_millis(),
            }),
            _ => Ok(()),
        }
    }
}

use std::collections::BTreeSet;

use crate::cnf::cnf::Lit;
use crate::sat::assignment::Assignment;
use crate::sat::error::SolveError;
use crate::sat::formula::Formula;

/// Unit propagation to fixpoint.
///
/// Takes the first unit clause in formula order, commits its literal,
/// drops the clauses it satisfies and strips its negation everywhere else,
/// then looks again. Stops early once a clause has been emptied: the
/// returned formula then reports [`Formula::contains_empty_clause`].
pub fn propagate_units(
    mut formula: Formula,
    mut assignment: Assignment,
) -> Result<(Formula, Assignment), SolveError> {
    while let Some(unit) = formula.first_unit() {
        assignment.insert(unit)?;
        formula.remove_clauses_where(|c| c.contains(&unit));
        let conflict = formula.strip_literal(unit.neg());
        log::trace!("propagated {} ({} clauses left)", unit, formula.len());
        if conflict {
            break;
        }
    }
    Ok((formula, assignment))
}

/// Pure-literal elimination to fixpoint.
///
/// Purity is recomputed from the occurrence counts after every round since
/// dropping clauses can make further literals pure.
pub fn eliminate_pure_literals(
    mut formula: Formula,
    mut assignment: Assignment,
) -> Result<(Formula, Assignment), SolveError> {
    loop {
        let pure = pure_literals(&formula);
        if pure.is_empty() {
            break;
        }
        for &lit in &pure {
            assignment.insert(lit)?;
        }
        formula.remove_clauses_where(|c| c.iter().any(|l| pure.contains(l)));
        log::trace!("eliminated {} pure literals", pure.len());
    }
    Ok((formula, assignment))
}

pub fn pure_literals(formula: &Formula) -> BTreeSet<Lit> {
    formula.literals().filter(|&l| formula.is_pure(l)).collect()
}

use crate::cnf::cnf::{Cnf, Lit};
use crate::sat::assignment::Assignment;
use crate::sat::error::SolveError;

/// Checks `model` against every clause of the original instance.
///
/// Simplification drops clauses once a committed literal satisfies them, so
/// the empty formula at a success leaf says nothing about the clauses that
/// were dropped along the way. This re-evaluates all of them. The cost is
/// bounded by the clauses, never by the header's variable count.
pub fn check_model(cnf: &Cnf, model: &Assignment) -> Result<(), SolveError> {
    for (index, clause) in cnf.clauses.iter().enumerate() {
        if !clause.iter().any(|&lit| model.contains(lit)) {
            return Err(SolveError::UnsatisfiedClause { index });
        }
    }
    Ok(())
}

/// Same check for a model given as a plain literal list, e.g. one read
/// back from a solution file. Both polarities of a variable are rejected.
pub fn check_literals(cnf: &Cnf, lits: &[Lit]) -> Result<(), SolveError> {
    let model = Assignment::from_lits(lits.iter().copied())?;
    check_model(cnf, &model)
}

use thiserror::Error;

/// Failures of a solve. Unsatisfiability is never one of these; it is
/// reported as [`crate::sat::dpll::SatResult::Unsat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invariant violated: branching heuristic invoked on an empty formula")]
    BranchOnEmptyFormula,
    #[error("invariant violated: branching heuristic invoked on a formula with an empty clause")]
    BranchOnEmptyClause,
    #[error("invariant violated: assignment would contain both {var} and -{var}")]
    ConflictingAssignment { var: u32 },
    #[error("invariant violated: model leaves clause #{index} of the input unsatisfied")]
    UnsatisfiedClause { index: usize },
    #[error("deadline exceeded after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u128 },
}

impl SolveError {
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, SolveError::DeadlineExceeded { .. })
    }
}

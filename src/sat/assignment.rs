use indexmap::IndexSet;

use crate::cnf::cnf::Lit;
use crate::sat::error::SolveError;

/// Partial truth assignment, kept in the order literals were committed.
///
/// Never holds both polarities of a variable: [`Assignment::insert`]
/// refuses the second one with [`SolveError::ConflictingAssignment`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    lits: IndexSet<Lit>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lits<I: IntoIterator<Item = Lit>>(lits: I) -> Result<Self, SolveError> {
        let mut out = Self::new();
        for lit in lits {
            out.insert(lit)?;
        }
        Ok(out)
    }

    /// Returns `Ok(false)` when `lit` was already present.
    pub fn insert(&mut self, lit: Lit) -> Result<bool, SolveError> {
        if self.lits.contains(&lit.neg()) {
            return Err(SolveError::ConflictingAssignment { var: lit.var });
        }
        Ok(self.lits.insert(lit))
    }

    pub fn contains(&self, lit: Lit) -> bool {
        self.lits.contains(&lit)
    }

    pub fn value(&self, var: u32) -> Option<bool> {
        if self.lits.contains(&Lit::new(var, true)) {
            Some(true)
        } else if self.lits.contains(&Lit::new(var, false)) {
            Some(false)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.lits.iter().copied()
    }

    /// Literals ordered by variable.
    pub fn sorted(&self) -> Vec<Lit> {
        let mut out = self.lits.iter().copied().collect::<Vec<_>>();
        out.sort_unstable();
        out
    }

    /// Total assignment over `1..=num_vars`; free variables become false.
    ///
    /// Pass the largest variable that occurs (`Cnf::max_var`), not the
    /// header count: the header is advisory and may be arbitrarily large.
    pub fn completed(&self, num_vars: u32) -> Assignment {
        let mut lits = IndexSet::with_capacity(num_vars as usize);
        for var in 1..=num_vars {
            let sign = self.value(var).unwrap_or(false);
            lits.insert(Lit::new(var, sign));
        }
        // assigned variables above the bound are kept as they are
        for lit in self.sorted() {
            if lit.var > num_vars {
                lits.insert(lit);
            }
        }
        Assignment { lits }
    }
}

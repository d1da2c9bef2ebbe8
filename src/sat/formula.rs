use std::collections::{BTreeMap, BTreeSet};

use crate::cnf::cnf::{Clause, Cnf, Lit};

/// The clause set a DPLL call is reducing.
///
/// Alongside the clauses it owns a literal -> occurrence count map and the
/// number of empty clauses. Every mutation goes through methods that keep
/// both in step, so a snapshot handed to a branch carries counts that match
/// its own clauses and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
    occurrences: BTreeMap<Lit, usize>,
    empty_clauses: usize,
}

impl Formula {
    pub fn new(clauses: Vec<Clause>) -> Self {
        let mut formula = Self {
            clauses: Vec::with_capacity(clauses.len()),
            occurrences: BTreeMap::new(),
            empty_clauses: 0,
        };
        for clause in clauses {
            formula.push_clause(clause);
        }
        formula
    }

    pub fn from_cnf(cnf: &Cnf) -> Self {
        Self::new(cnf.clauses.clone())
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn contains_empty_clause(&self) -> bool {
        self.empty_clauses > 0
    }

    /// Distinct literals currently appearing, in literal order.
    pub fn literals(&self) -> impl Iterator<Item = Lit> + '_ {
        self.occurrences.keys().copied()
    }

    pub fn variables(&self) -> BTreeSet<u32> {
        self.occurrences.keys().map(|l| l.var).collect()
    }

    pub fn occurrences(&self, lit: Lit) -> usize {
        self.occurrences.get(&lit).copied().unwrap_or(0)
    }

    /// Literal occurrence counts, ordered by literal.
    pub fn occurrence_counts(&self) -> impl Iterator<Item = (Lit, usize)> + '_ {
        self.occurrences.iter().map(|(&l, &n)| (l, n))
    }

    pub fn is_pure(&self, lit: Lit) -> bool {
        self.occurrences(lit) > 0 && self.occurrences(lit.neg()) == 0
    }

    /// Literal of the first unit clause in clause order.
    pub fn first_unit(&self) -> Option<Lit> {
        self.clauses
            .iter()
            .find(|c| c.len() == 1)
            .map(|c| c[0])
    }

    /// This formula with the unit clause `{lit}` appended.
    pub fn with_unit(mut self, lit: Lit) -> Self {
        self.push_clause(vec![lit]);
        self
    }

    pub fn push_clause(&mut self, clause: Clause) {
        if clause.is_empty() {
            self.empty_clauses += 1;
        }
        for &lit in &clause {
            *self.occurrences.entry(lit).or_insert(0) += 1;
        }
        self.clauses.push(clause);
    }

    /// Drops every clause for which `satisfied` holds, keeping clause order.
    /// Returns the number of clauses removed.
    pub fn remove_clauses_where<F>(&mut self, mut satisfied: F) -> usize
    where
        F: FnMut(&[Lit]) -> bool,
    {
        let before = self.clauses.len();
        let mut kept = Vec::with_capacity(before);
        for clause in std::mem::take(&mut self.clauses) {
            if satisfied(clause.as_slice()) {
                if clause.is_empty() {
                    self.empty_clauses -= 1;
                }
                for &lit in &clause {
                    self.decrement(lit);
                }
            } else {
                kept.push(clause);
            }
        }
        self.clauses = kept;
        before - self.clauses.len()
    }

    /// Removes every occurrence of `lit` from the remaining clauses.
    /// Returns `true` when this produced at least one empty clause.
    pub fn strip_literal(&mut self, lit: Lit) -> bool {
        let count = self.occurrences(lit);
        if count == 0 {
            return false;
        }
        let mut emptied = false;
        for clause in &mut self.clauses {
            let before = clause.len();
            clause.retain(|&l| l != lit);
            if clause.len() != before && clause.is_empty() {
                self.empty_clauses += 1;
                emptied = true;
            }
        }
        self.occurrences.remove(&lit);
        emptied
    }

    fn decrement(&mut self, lit: Lit) {
        if let Some(n) = self.occurrences.get_mut(&lit) {
            *n -= 1;
            if *n == 0 {
                self.occurrences.remove(&lit);
            }
        }
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cnf::cnf::Lit;
use crate::sat::error::SolveError;
use crate::sat::formula::Formula;

/// Decision-literal policy, chosen once per solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// First literal of the first clause.
    #[default]
    First,
    /// Uniform over the variables still present, positive polarity.
    Random,
    /// Most frequent signed literal (DLIS).
    MostFrequent,
    /// One-sided Jeroslow-Wang: literal maximizing the sum of 2^-|C|.
    JeroslowWangOne,
    /// Two-sided Jeroslow-Wang: best variable, then its better polarity.
    JeroslowWangTwo,
    /// Maximum occurrences in clauses of minimum size.
    Moms,
}

impl Heuristic {
    pub const ALL: [Heuristic; 6] = [
        Heuristic::First,
        Heuristic::Random,
        Heuristic::MostFrequent,
        Heuristic::JeroslowWangOne,
        Heuristic::JeroslowWangTwo,
        Heuristic::Moms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::First => "first",
            Heuristic::Random => "random",
            Heuristic::MostFrequent => "most-frequent",
            Heuristic::JeroslowWangOne => "jw-one",
            Heuristic::JeroslowWangTwo => "jw-two",
            Heuristic::Moms => "moms",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic '{0}', expected first|random|most-frequent|jw-one|jw-two|moms")]
pub struct UnknownHeuristic(pub String);

impl FromStr for Heuristic {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "static" => Ok(Heuristic::First),
            "random" => Ok(Heuristic::Random),
            "most-frequent" | "mfv" | "dlis" => Ok(Heuristic::MostFrequent),
            "jw-one" => Ok(Heuristic::JeroslowWangOne),
            "jw-two" => Ok(Heuristic::JeroslowWangTwo),
            "moms" => Ok(Heuristic::Moms),
            _ => Err(UnknownHeuristic(s.to_string())),
        }
    }
}

/// A heuristic bound to its random source.
#[derive(Debug, Clone)]
pub struct Brancher {
    heuristic: Heuristic,
    rng: ChaCha8Rng,
}

impl Brancher {
    pub fn new(heuristic: Heuristic, seed: u64) -> Self {
        Self {
            heuristic,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks the next decision literal.
    ///
    /// The formula must be non-empty and free of empty clauses; anything
    /// else is an invariant violation of the caller.
    pub fn pick(&mut self, formula: &Formula) -> Result<Lit, SolveError> {
        if formula.is_empty() {
            return Err(SolveError::BranchOnEmptyFormula);
        }
        if formula.contains_empty_clause() {
            return Err(SolveError::BranchOnEmptyClause);
        }
        let picked = match self.heuristic {
            Heuristic::First => formula.clauses().first().and_then(|c| c.first()).copied(),
            Heuristic::Random => {
                let vars = formula.variables().into_iter().collect::<Vec<_>>();
                if vars.is_empty() {
                    None
                } else {
                    let idx = self.rng.random_range(0..vars.len());
                    Some(Lit::new(vars[idx], true))
                }
            }
            Heuristic::MostFrequent => best_by(formula.occurrence_counts()),
            Heuristic::JeroslowWangOne => best_by(jw_scores(formula)),
            Heuristic::JeroslowWangTwo => jw_two(formula),
            Heuristic::Moms => best_by(moms_counts(formula)),
        };
        picked.ok_or(SolveError::BranchOnEmptyClause)
    }
}

/// Highest score wins; ties go to the smallest variable, then the positive
/// literal. Relies on `scores` arriving in literal order.
fn best_by<S, I>(scores: I) -> Option<Lit>
where
    S: PartialOrd,
    I: IntoIterator<Item = (Lit, S)>,
{
    let mut best: Option<(Lit, S)> = None;
    for (lit, score) in scores {
        let better = match &best {
            Some((_, top)) => score > *top,
            None => true,
        };
        if better {
            best = Some((lit, score));
        }
    }
    best.map(|(lit, _)| lit)
}

fn jw_weight(clause_len: usize) -> f64 {
    0.5f64.powi(clause_len.min(i32::MAX as usize) as i32)
}

fn jw_scores(formula: &Formula) -> BTreeMap<Lit, f64> {
    let mut scores = BTreeMap::new();
    for clause in formula.clauses() {
        let w = jw_weight(clause.len());
        for &lit in clause {
            *scores.entry(lit).or_insert(0.0) += w;
        }
    }
    scores
}

fn jw_two(formula: &Formula) -> Option<Lit> {
    let scores = jw_scores(formula);
    let mut by_var = BTreeMap::<u32, (f64, f64)>::new();
    for (lit, &score) in &scores {
        let entry = by_var.entry(lit.var).or_insert((0.0, 0.0));
        if lit.sign {
            entry.0 += score;
        } else {
            entry.1 += score;
        }
    }
    let mut best: Option<(u32, f64)> = None;
    for (&var, &(pos, neg)) in &by_var {
        let total = pos + neg;
        match best {
            Some((_, top)) if total <= top => {}
            _ => best = Some((var, total)),
        }
    }
    let (var, _) = best?;
    let (pos, neg) = by_var.get(&var).copied().unwrap_or_default();
    Some(Lit::new(var, pos >= neg))
}

fn moms_counts(formula: &Formula) -> BTreeMap<Lit, usize> {
    let mut counts = BTreeMap::new();
    let Some(min_len) = formula.clauses().iter().map(|c| c.len()).min() else {
        return counts;
    };
    for clause in formula.clauses().iter().filter(|c| c.len() == min_len) {
        for &lit in clause {
            *counts.entry(lit).or_insert(0usize) += 1;
        }
    }
    counts
}

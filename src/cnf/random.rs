use anyhow::{Result, bail};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::cnf::{Clause, Cnf, Lit};

/// Uniform random k-SAT: every clause draws `k` distinct variables and
/// independent polarities.
pub fn random_ksat(num_vars: u32, num_clauses: usize, k: usize, seed: u64) -> Result<Cnf> {
    check_shape(num_vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cnf = Cnf::new(num_vars);
    for _ in 0..num_clauses {
        cnf.add_clause(random_clause(&mut rng, num_vars, k));
    }
    Ok(cnf)
}

/// Random k-SAT with a hidden witness: clauses the witness falsifies are
/// redrawn, so the instance is satisfiable by construction.
/// `witness[v]` is the value of variable `v`; slot 0 is unused.
pub fn generate_planted(
    num_vars: u32,
    num_clauses: usize,
    k: usize,
    seed: u64,
) -> Result<(Cnf, Vec<bool>)> {
    check_shape(num_vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut witness = vec![false; num_vars as usize + 1];
    for v in witness.iter_mut().skip(1) {
        *v = rng.random::<bool>();
    }

    let mut cnf = Cnf::new(num_vars);
    while cnf.clauses.len() < num_clauses {
        let clause = random_clause(&mut rng, num_vars, k);
        if clause.iter().any(|l| witness[l.var as usize] == l.sign) {
            cnf.add_clause(clause);
        }
    }
    Ok((cnf, witness))
}

fn check_shape(num_vars: u32, k: usize) -> Result<()> {
    if k == 0 {
        bail!("clause width k must be >= 1");
    }
    if k > num_vars as usize {
        bail!("clause width k={} exceeds variable count {}", k, num_vars);
    }
    Ok(())
}

fn random_clause(rng: &mut ChaCha8Rng, num_vars: u32, k: usize) -> Clause {
    sample(rng, num_vars as usize, k)
        .into_iter()
        .map(|i| Lit::new(i as u32 + 1, rng.random::<bool>()))
        .collect()
}

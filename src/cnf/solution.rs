use std::path::Path;

use anyhow::{Context, Result, bail};

use super::cnf::Lit;
use crate::sat::assignment::Assignment;
use crate::sat::dpll::SatResult;

pub const SAT_LINE: &str = "s SATISFIABLE";
pub const UNSAT_LINE: &str = "s UNSATISFIABLE";

/// `s SATISFIABLE` plus one `v ... 0` line, or `s UNSATISFIABLE`.
pub fn format_solution(result: &SatResult) -> String {
    match result {
        SatResult::Sat(model) => format_model(model),
        SatResult::Unsat => format!("{}\n", UNSAT_LINE),
    }
}

pub fn format_model(model: &Assignment) -> String {
    let mut out = String::new();
    out.push_str(SAT_LINE);
    out.push_str("\nv");
    for lit in model.sorted() {
        out.push_str(&format!(" {}", lit));
    }
    out.push_str(" 0\n");
    out
}

/// Reads back what [`format_solution`] writes: `Some(lits)` for a
/// satisfiable answer, `None` for an unsatisfiable one.
pub fn parse_solution_str(s: &str) -> Result<Option<Vec<Lit>>> {
    let mut status = None::<bool>;
    let mut lits = Vec::new();
    let mut terminated = false;

    for (idx, line) in s.lines().enumerate() {
        let line_no = idx + 1;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }
        if let Some(rest) = clean.strip_prefix("s ") {
            if status.is_some() {
                bail!("line {}: second status line", line_no);
            }
            status = match rest.trim() {
                "SATISFIABLE" => Some(true),
                "UNSATISFIABLE" => Some(false),
                other => bail!("line {}: unknown status '{}'", line_no, other),
            };
            continue;
        }
        let Some(rest) = clean.strip_prefix('v') else {
            bail!("line {}: expected 's' or 'v' line", line_no);
        };
        if terminated {
            bail!("line {}: values after terminating 0", line_no);
        }
        for token in rest.split_whitespace() {
            let value = token
                .parse::<i64>()
                .with_context(|| format!("line {}: invalid literal '{}'", line_no, token))?;
            if value == 0 {
                terminated = true;
                break;
            }
            let lit = Lit::from_dimacs(value)
                .ok_or_else(|| anyhow::anyhow!("line {}: literal out of range", line_no))?;
            lits.push(lit);
        }
    }

    match status {
        Some(true) => Ok(Some(lits)),
        Some(false) if lits.is_empty() => Ok(None),
        Some(false) => bail!("unsatisfiable answer carries a model"),
        None => bail!("missing status line"),
    }
}

pub fn load_solution<P: AsRef<Path>>(path: P) -> Result<Option<Vec<Lit>>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_solution_str(&text)
}

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cnf::dimacs::load_cnf;
use crate::sat::dpll::{SatResult, SolverConfig, solve_with};
use crate::sat::error::SolveError;
use crate::sat::heuristic::Heuristic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub heuristic: Heuristic,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow {
    pub path: String,
    pub status: String,
    pub heuristic: String,
    pub result: String,
    pub verified: Option<bool>,
    pub wall_ms: Option<u128>,
    pub decisions: Option<usize>,
    pub conflicts: Option<usize>,
    pub max_depth: Option<usize>,
    pub cnf_vars: Option<u32>,
    pub cnf_clauses: Option<usize>,
}

impl BenchRow {
    pub fn csv_header() -> &'static str {
        "path,status,heuristic,result,verified,wall_ms,decisions,conflicts,max_depth,cnf_vars,cnf_clauses"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            esc_csv(&self.path),
            self.status,
            self.heuristic,
            self.result,
            opt(self.verified),
            opt(self.wall_ms),
            opt(self.decisions),
            opt(self.conflicts),
            opt(self.max_depth),
            opt(self.cnf_vars),
            opt(self.cnf_clauses),
        )
    }
}

/// Solves one file under a deadline. Never fails: problems end up in the
/// row's status.
pub fn run_one(path: &Path, cfg: BenchConfig, timeout: Duration) -> BenchRow {
    let start = Instant::now();
    let mut row = BenchRow {
        path: path.to_string_lossy().to_string(),
        status: "ok".to_string(),
        heuristic: cfg.heuristic.name().to_string(),
        result: String::new(),
        verified: None,
        wall_ms: None,
        decisions: None,
        conflicts: None,
        max_depth: None,
        cnf_vars: None,
        cnf_clauses: None,
    };

    let cnf = match load_cnf(path) {
        Ok(v) => v,
        Err(e) => {
            log::info!("{}: {}", row.path, e);
            row.status = "parse_error".to_string();
            row.wall_ms = Some(start.elapsed().as_millis());
            return row;
        }
    };
    row.cnf_vars = Some(cnf.num_vars);
    row.cnf_clauses = Some(cnf.clauses.len());

    let config = SolverConfig {
        heuristic: cfg.heuristic,
        seed: cfg.seed,
        timeout: Some(timeout),
    };
    match solve_with(&cnf, &config) {
        Ok(out) => {
            // a returned model has already passed the full-formula check
            match out.result {
                SatResult::Sat(_) => {
                    row.result = "sat".to_string();
                    row.verified = Some(true);
                }
                SatResult::Unsat => row.result = "unsat".to_string(),
            }
            row.decisions = Some(out.stats.decisions);
            row.conflicts = Some(out.stats.conflicts);
            row.max_depth = Some(out.stats.max_depth);
        }
        Err(SolveError::DeadlineExceeded { .. }) => {
            row.status = "timeout".to_string();
        }
        Err(e) => {
            log::warn!("{}: {}", row.path, e);
            row.status = "internal_error".to_string();
            row.verified = Some(false);
        }
    }
    row.wall_ms = Some(start.elapsed().as_millis());
    row
}

pub fn run_dataset(
    dir: &Path,
    cfg: BenchConfig,
    timeout: Duration,
    csv_path: &Path,
    progress: bool,
) -> std::io::Result<Vec<BenchRow>> {
    let paths = discover_paths(dir)?;
    let mut csv = File::create(csv_path)?;
    writeln!(csv, "{}", BenchRow::csv_header())?;
    csv.flush()?;

    let mut rows = Vec::new();
    for path in paths {
        let row = run_one(&path, cfg, timeout);
        if progress {
            log::info!(
                "path={} status={} result={} wall_ms={} decisions={}",
                row.path,
                row.status,
                row.result,
                row.wall_ms.unwrap_or_default(),
                row.decisions.unwrap_or_default()
            );
        }
        writeln!(csv, "{}", row.to_csv_line())?;
        csv.flush()?;
        rows.push(row);
    }

    Ok(rows)
}

fn discover_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_paths(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_paths(&p, out)?;
            continue;
        }
        if p.extension().and_then(|x| x.to_str()) == Some("cnf") {
            out.push(p);
        }
    }
    Ok(())
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn esc_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

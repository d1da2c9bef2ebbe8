use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use dpllsat::bench::{BenchConfig, run_dataset};
use dpllsat::cnf::dimacs::{load_cnf, to_dimacs};
use dpllsat::cnf::random::{generate_planted, random_ksat};
use dpllsat::cnf::solution::{format_model, format_solution, load_solution};
use dpllsat::sat::dpll::{SatResult, SolverConfig, solve_with};
use dpllsat::sat::heuristic::Heuristic;
use dpllsat::sat::verify::check_literals;

const EXIT_SAT: u8 = 10;
const EXIT_UNSAT: u8 = 20;

#[derive(Debug, Parser)]
#[command(name = "dpllsat")]
#[command(about = "DPLL solver for DIMACS CNF formulas")]
struct Cli {
    /// Log decisions and conflicts (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Solve {
        path: String,
        #[arg(long, default_value = "first")]
        heuristic: Heuristic,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, default_value_t = false)]
        full_model: bool,
        #[arg(long, default_value_t = false)]
        stats: bool,
    },
    Batch {
        #[arg(long)]
        dir: String,
        #[arg(long)]
        csv: String,
        #[arg(long, default_value = "first")]
        heuristic: Heuristic,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long = "timeout-ms", default_value_t = 30000)]
        timeout_ms: u64,
        #[arg(long, default_value_t = false)]
        progress: bool,
    },
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = false)]
        planted: bool,
        #[arg(long)]
        out: String,
    },
    Verify {
        #[arg(long)]
        cnf: String,
        #[arg(long)]
        solution: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Cmd::Solve {
            path,
            heuristic,
            seed,
            timeout_ms,
            output,
            full_model,
            stats,
        } => solve_cmd(
            &path,
            heuristic,
            seed,
            timeout_ms,
            output.as_deref(),
            full_model,
            stats,
        ),
        Cmd::Batch {
            dir,
            csv,
            heuristic,
            seed,
            timeout_ms,
            progress,
        } => {
            batch_cmd(&dir, &csv, heuristic, seed, timeout_ms, progress)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Gen {
            vars,
            clauses,
            k,
            seed,
            planted,
            out,
        } => {
            gen_cmd(vars, clauses, k, seed, planted, &out)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Verify { cnf, solution } => verify_cmd(&cnf, &solution),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn solve_cmd(
    path: &str,
    heuristic: Heuristic,
    seed: u64,
    timeout_ms: Option<u64>,
    output: Option<&str>,
    full_model: bool,
    stats: bool,
) -> Result<ExitCode> {
    let cnf = load_cnf(path).with_context(|| format!("cannot load {}", path))?;
    log::info!(
        "loaded {}: vars={} clauses={}",
        path,
        cnf.num_vars,
        cnf.clauses.len()
    );

    let config = SolverConfig {
        heuristic,
        seed,
        timeout: timeout_ms.map(Duration::from_millis),
    };
    let outcome = solve_with(&cnf, &config)?;

    let text = match &outcome.result {
        SatResult::Sat(model) if full_model => format_model(&model.completed(cnf.max_var())),
        other => format_solution(other),
    };
    match output {
        Some(out) => std::fs::write(out, &text).with_context(|| format!("cannot write {}", out))?,
        None => print!("{}", text),
    }
    if stats {
        let s = outcome.stats;
        println!(
            "c heuristic={} decisions={} conflicts={} propagations={} pure={} max_depth={} solve_ms={}",
            heuristic,
            s.decisions,
            s.conflicts,
            s.propagations,
            s.pure_literals,
            s.max_depth,
            outcome.elapsed.as_millis()
        );
    }

    Ok(match outcome.result {
        SatResult::Sat(_) => ExitCode::from(EXIT_SAT),
        SatResult::Unsat => ExitCode::from(EXIT_UNSAT),
    })
}

fn batch_cmd(
    dir: &str,
    csv: &str,
    heuristic: Heuristic,
    seed: u64,
    timeout_ms: u64,
    progress: bool,
) -> Result<()> {
    let cfg = BenchConfig {
        heuristic,
        seed,
    };
    let rows = run_dataset(
        &PathBuf::from(dir),
        cfg,
        Duration::from_millis(timeout_ms),
        &PathBuf::from(csv),
        progress,
    )?;
    let sat = rows.iter().filter(|r| r.result == "sat").count();
    let unsat = rows.iter().filter(|r| r.result == "unsat").count();
    println!(
        "rows={} sat={} unsat={} other={}",
        rows.len(),
        sat,
        unsat,
        rows.len() - sat - unsat
    );
    Ok(())
}

fn gen_cmd(vars: u32, clauses: usize, k: usize, seed: u64, planted: bool, out: &str) -> Result<()> {
    let cnf = if planted {
        generate_planted(vars, clauses, k, seed)?.0
    } else {
        random_ksat(vars, clauses, k, seed)?
    };
    std::fs::write(out, to_dimacs(&cnf))?;
    println!(
        "GEN: wrote {} | vars={} clauses={} k={} planted={}",
        out,
        cnf.num_vars,
        cnf.clauses.len(),
        k,
        planted
    );
    Ok(())
}

fn verify_cmd(cnf_path: &str, solution_path: &str) -> Result<ExitCode> {
    let cnf = load_cnf(cnf_path).with_context(|| format!("cannot load {}", cnf_path))?;
    let Some(lits) = load_solution(solution_path)? else {
        println!("VERIFY: solution claims UNSATISFIABLE, nothing to check");
        return Ok(ExitCode::from(EXIT_UNSAT));
    };
    if let Err(e) = check_literals(&cnf, &lits) {
        bail!("VERIFY: REJECT ({})", e);
    }
    println!("VERIFY: ACCEPT ({} literals)", lits.len());
    Ok(ExitCode::from(EXIT_SAT))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Cmd};
    use clap::Parser;
    use dpllsat::sat::heuristic::Heuristic;

    #[test]
    fn heuristic_flag_is_parsed_by_clap() {
        let cli = Cli::try_parse_from(["dpllsat", "solve", "f.cnf", "--heuristic", "dlis"])
            .expect("valid arguments");
        match cli.command {
            Cmd::Solve { heuristic, .. } => assert_eq!(heuristic, Heuristic::MostFrequent),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["dpllsat", "batch", "--dir", "d", "--csv", "o.csv"])
            .expect("valid arguments");
        match cli.command {
            Cmd::Batch { heuristic, .. } => assert_eq!(heuristic, Heuristic::First),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_heuristic_is_a_usage_error() {
        let err = Cli::try_parse_from(["dpllsat", "solve", "f.cnf", "--heuristic", "vsids"])
            .expect_err("bad heuristic");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("vsids"));
    }
}

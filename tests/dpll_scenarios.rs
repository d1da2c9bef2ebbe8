use std::time::Duration;

use dpllsat::cnf::cnf::{Cnf, Lit};
use dpllsat::cnf::dimacs::parse_dimacs_str;
use dpllsat::cnf::random::random_ksat;
use dpllsat::sat::dpll::{SatResult, SolverConfig, is_sat, solve, solve_model, solve_with};
use dpllsat::sat::error::SolveError;
use dpllsat::sat::heuristic::Heuristic;
use dpllsat::sat::verify::check_model;

fn lit(x: i64) -> Lit {
    Lit::from_dimacs(x).expect("nonzero literal")
}

fn cnf(src: &str) -> Cnf {
    parse_dimacs_str(src).expect("parse")
}

fn config(heuristic: Heuristic) -> SolverConfig {
    SolverConfig {
        heuristic,
        seed: 7,
        timeout: None,
    }
}

fn run(src: &str, heuristic: Heuristic) -> SatResult {
    solve_with(&cnf(src), &config(heuristic))
        .expect("solve")
        .result
}

const PIGEONHOLE_3_2: &str = "\
p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0
-1 -5 0
-3 -5 0
-2 -4 0
-2 -6 0
-4 -6 0
";

#[test]
fn empty_formula_is_satisfiable() {
    let result = solve(&Cnf::new(0)).expect("solve");
    assert!(result.is_sat());
}

#[test]
fn empty_clause_is_unsatisfiable() {
    for h in Heuristic::ALL {
        assert_eq!(run("1 2 0\n0\n", h), SatResult::Unsat);
    }
}

#[test]
fn direct_unit_contradiction() {
    for h in Heuristic::ALL {
        assert_eq!(run("1 0\n-1 0\n", h), SatResult::Unsat);
    }
}

#[test]
fn propagation_forces_both_literals() {
    for h in Heuristic::ALL {
        let result = run("1 2 0\n-1 0\n", h);
        let model = result.model().expect("sat");
        assert!(model.contains(lit(-1)));
        assert!(model.contains(lit(2)));
    }
}

#[test]
fn single_unit_clause_needs_no_decision() {
    let out = solve_with(&cnf("1 0\n"), &config(Heuristic::First)).expect("solve");
    let model = out.result.model().expect("sat");
    assert_eq!(model.sorted(), vec![lit(1)]);
    assert_eq!(out.stats.decisions, 0);
}

#[test]
fn all_four_two_variable_clauses_are_unsatisfiable() {
    let src = "1 2 0\n-1 2 0\n1 -2 0\n-1 -2 0\n";
    for h in Heuristic::ALL {
        let out = solve_with(&cnf(src), &config(h)).expect("solve");
        assert_eq!(out.result, SatResult::Unsat);
        // one decision, and each polarity dies in propagation
        assert_eq!(out.stats.decisions, 1);
        assert_eq!(out.stats.conflicts, 2);
        assert_eq!(out.stats.max_depth, 1);
    }
}

#[test]
fn single_wide_clause_is_solved_by_pure_literals() {
    let out = solve_with(&cnf("1 2 3 0\n"), &config(Heuristic::First)).expect("solve");
    let model = out.result.model().expect("sat");
    assert!(model.contains(lit(1)));
    assert_eq!(out.stats.decisions, 0);
    assert_eq!(out.stats.pure_literals, 3);
}

#[test]
fn pigeonhole_is_unsatisfiable_for_every_policy() {
    for h in Heuristic::ALL {
        assert_eq!(run(PIGEONHOLE_3_2, h), SatResult::Unsat, "heuristic {}", h);
    }
}

#[test]
fn forced_units_appear_in_every_model() {
    let src = "1 0\n-1 2 0\n-2 3 0\n3 4 5 0\n-4 -5 0\n4 -3 5 0\n";
    for h in Heuristic::ALL {
        let result = run(src, h);
        let model = result.model().expect("sat");
        for x in [1, 2, 3] {
            assert!(model.contains(lit(x)), "heuristic {} lost {}", h, x);
        }
    }
}

#[test]
fn models_satisfy_the_original_clauses() {
    for seed in 0..10u64 {
        let instance = random_ksat(12, 40, 3, seed).expect("generate");
        for h in Heuristic::ALL {
            let out = solve_with(&instance, &config(h)).expect("solve");
            if let SatResult::Sat(model) = &out.result {
                assert_eq!(check_model(&instance, model), Ok(()));
            }
        }
    }
}

#[test]
fn all_policies_agree_on_the_verdict() {
    for seed in 0..12u64 {
        let instance = random_ksat(10, 43, 3, seed).expect("generate");
        let verdicts = Heuristic::ALL
            .iter()
            .map(|&h| solve_with(&instance, &config(h)).expect("solve").result.is_sat())
            .collect::<Vec<_>>();
        assert!(verdicts.iter().all(|&v| v == verdicts[0]), "seed {}", seed);
    }
}

#[test]
fn repeated_solves_are_identical() {
    let instance = random_ksat(15, 60, 3, 99).expect("generate");
    let a = solve_with(&instance, &config(Heuristic::First)).expect("solve");
    let b = solve_with(&instance, &config(Heuristic::First)).expect("solve");
    assert_eq!(a.result, b.result);
    assert_eq!(a.stats, b.stats);
    if let (SatResult::Sat(ma), SatResult::Sat(mb)) = (&a.result, &b.result) {
        assert_eq!(ma.iter().collect::<Vec<_>>(), mb.iter().collect::<Vec<_>>());
    }

    let r1 = solve_with(&instance, &config(Heuristic::Random)).expect("solve");
    let r2 = solve_with(&instance, &config(Heuristic::Random)).expect("solve");
    assert_eq!(r1.result, r2.result);
    assert_eq!(r1.stats, r2.stats);
}

#[test]
fn depth_never_exceeds_variable_count() {
    for seed in 0..10u64 {
        let instance = random_ksat(14, 60, 3, seed).expect("generate");
        let vars = instance.variables().len();
        for h in Heuristic::ALL {
            let out = solve_with(&instance, &config(h)).expect("solve");
            assert!(out.stats.max_depth <= vars);
            assert!(out.stats.decisions >= out.stats.max_depth);
        }
    }
    let out = solve_with(&cnf(PIGEONHOLE_3_2), &config(Heuristic::First)).expect("solve");
    assert!(out.stats.max_depth <= 6);
}

#[test]
fn convenience_wrappers_match() {
    let sat = cnf("1 -2 0\n2 0\n");
    assert_eq!(is_sat(&sat), Ok(true));
    let model = solve_model(&sat).expect("solve").expect("sat");
    assert!(model.contains(lit(1)) && model.contains(lit(2)));
    assert_eq!(solve_model(&cnf("1 0\n-1 0\n")), Ok(None));
}

#[test]
fn zero_deadline_is_reported_not_mistaken_for_unsat() {
    let cfg = SolverConfig {
        heuristic: Heuristic::First,
        seed: 0,
        timeout: Some(Duration::ZERO),
    };
    let err = solve_with(&cnf(PIGEONHOLE_3_2), &cfg).expect_err("deadline");
    assert!(matches!(err, SolveError::DeadlineExceeded { .. }));
    assert!(!err.is_invariant_violation());
}

#[test]
fn oversized_header_does_not_size_the_work() {
    let instance = cnf("p cnf 4000000000 1\n1 0\n");
    assert_eq!(instance.num_vars, 4_000_000_000);
    assert_eq!(instance.max_var(), 1);

    let result = solve(&instance).expect("solve");
    let model = result.model().expect("sat");
    assert_eq!(model.sorted(), vec![lit(1)]);
    assert_eq!(check_model(&instance, model), Ok(()));

    let full = model.completed(instance.max_var());
    assert_eq!(full.sorted(), vec![lit(1)]);
}

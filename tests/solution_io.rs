use dpllsat::cnf::cnf::Lit;
use dpllsat::cnf::dimacs::parse_dimacs_str;
use dpllsat::cnf::solution::{format_solution, parse_solution_str};
use dpllsat::sat::dpll::{SatResult, solve};
use dpllsat::sat::verify::check_literals;

#[test]
fn satisfiable_answer_lists_sorted_literals() {
    let cnf = parse_dimacs_str("p cnf 3 2\n3 0\n-1 -3 0\n").expect("parse");
    let result = solve(&cnf).expect("solve");
    let text = format_solution(&result);
    assert_eq!(text, "s SATISFIABLE\nv -1 3 0\n");

    let lits = parse_solution_str(&text).expect("parse").expect("sat");
    assert_eq!(lits, vec![Lit::new(1, false), Lit::new(3, true)]);
    assert_eq!(check_literals(&cnf, &lits), Ok(()));
}

#[test]
fn unsatisfiable_answer_has_no_model() {
    let text = format_solution(&SatResult::Unsat);
    assert_eq!(text, "s UNSATISFIABLE\n");
    assert_eq!(parse_solution_str(&text).expect("parse"), None);
}

#[test]
fn value_lines_may_be_split() {
    let text = "c solver output\ns SATISFIABLE\nv 1 -2\nv 3 0\n";
    let lits = parse_solution_str(text).expect("parse").expect("sat");
    assert_eq!(lits.len(), 3);
}

#[test]
fn malformed_answers_are_rejected() {
    assert!(parse_solution_str("v 1 0\n").is_err());
    assert!(parse_solution_str("s MAYBE\n").is_err());
    assert!(parse_solution_str("s SATISFIABLE\nv 1 q 0\n").is_err());
    assert!(parse_solution_str("s UNSATISFIABLE\nv 1 0\n").is_err());
}

#[test]
fn verifier_rejects_wrong_or_inconsistent_models() {
    let cnf = parse_dimacs_str("1 2 0\n-1 0\n").expect("parse");
    let wrong = vec![Lit::new(1, false), Lit::new(2, false)];
    assert!(check_literals(&cnf, &wrong).is_err());
    let both = vec![Lit::new(1, true), Lit::new(1, false), Lit::new(2, true)];
    assert!(check_literals(&cnf, &both).is_err());
}

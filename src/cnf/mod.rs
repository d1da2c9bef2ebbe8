pub mod cnf;
pub mod dimacs;
pub mod random;
pub mod solution;

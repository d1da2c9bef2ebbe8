pub mod assignment;
pub mod dpll;
pub mod error;
pub mod formula;
pub mod heuristic;
pub mod simplify;
pub mod verify;

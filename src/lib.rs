pub mod bench;
pub mod cnf;
pub mod sat;

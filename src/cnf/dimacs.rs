use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use super::cnf::{Cnf, Lit};

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: malformed problem line '{text}', expected 'p cnf <vars> <clauses>'")]
    InvalidHeader { line: usize, text: String },
    #[error("line {line}: second problem line")]
    DuplicateHeader { line: usize },
    #[error("line {line}: invalid literal '{token}'")]
    InvalidToken { line: usize, token: String },
    #[error("line {line}: clause is missing its terminating 0")]
    MissingTerminator { line: usize },
    #[error("line {line}: unexpected '{token}' after terminating 0")]
    TrailingToken { line: usize, token: String },
}

/// The advisory `p cnf` counts, when a header was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub num_vars: u32,
    pub num_clauses: usize,
}

pub fn load_cnf<P: AsRef<Path>>(path: P) -> Result<Cnf, DimacsError> {
    let file = File::open(path.as_ref())?;
    parse_dimacs_reader(BufReader::new(file))
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf, DimacsError> {
    parse_dimacs_reader(io::Cursor::new(s.as_bytes()))
}

pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf, DimacsError> {
    let mut header = None::<Header>;
    let mut cnf = Cnf::new(0);

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }
        // SATLIB files close the clause section with '%'
        if clean.starts_with('%') {
            break;
        }
        if clean.starts_with('p') {
            if header.is_some() {
                return Err(DimacsError::DuplicateHeader { line: line_no });
            }
            let parsed = parse_header(clean).ok_or_else(|| DimacsError::InvalidHeader {
                line: line_no,
                text: clean.to_string(),
            })?;
            cnf.num_vars = cnf.num_vars.max(parsed.num_vars);
            header = Some(parsed);
            continue;
        }
        cnf.add_clause(parse_clause(clean, line_no)?);
    }

    if let Some(h) = header {
        if h.num_clauses != cnf.clauses.len() {
            log::warn!(
                "problem line declares {} clauses, found {}",
                h.num_clauses,
                cnf.clauses.len()
            );
        }
        if cnf.max_var() > h.num_vars {
            log::warn!(
                "problem line declares {} variables, literals reach {}",
                h.num_vars,
                cnf.max_var()
            );
        }
    }
    Ok(cnf)
}

fn parse_header(line: &str) -> Option<Header> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "p" || parts.next()? != "cnf" {
        return None;
    }
    let num_vars = parts.next()?.parse::<u32>().ok()?;
    let num_clauses = parts.next()?.parse::<usize>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Header {
        num_vars,
        num_clauses,
    })
}

/// One clause per line, closed by `0`. A line holding only `0` is the
/// empty clause, which makes the whole instance unsatisfiable.
fn parse_clause(line: &str, line_no: usize) -> Result<Vec<Lit>, DimacsError> {
    let mut clause = Vec::new();
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        let value = token
            .parse::<i64>()
            .map_err(|_| DimacsError::InvalidToken {
                line: line_no,
                token: token.to_string(),
            })?;
        if value == 0 {
            if let Some(extra) = tokens.next() {
                return Err(DimacsError::TrailingToken {
                    line: line_no,
                    token: extra.to_string(),
                });
            }
            return Ok(clause);
        }
        let lit = Lit::from_dimacs(value).ok_or_else(|| DimacsError::InvalidToken {
            line: line_no,
            token: token.to_string(),
        })?;
        clause.push(lit);
    }
    Err(DimacsError::MissingTerminator { line: line_no })
}

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_clause, parse_header, Header};

    #[test]
    fn header_needs_exactly_four_fields() {
        assert_eq!(
            parse_header("p cnf 3 2"),
            Some(Header {
                num_vars: 3,
                num_clauses: 2
            })
        );
        assert_eq!(parse_header("p cnf 3"), None);
        assert_eq!(parse_header("p cnf 3 2 1"), None);
        assert_eq!(parse_header("p wcnf 3 2"), None);
        assert_eq!(parse_header("p cnf x 2"), None);
    }

    #[test]
    fn clause_keeps_literal_order() {
        let clause = match parse_clause("3  -1\t2 0", 1) {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        let ints = clause.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>();
        assert_eq!(ints, vec![3, -1, 2]);
    }

    #[test]
    fn bare_terminator_is_the_empty_clause() {
        assert!(matches!(parse_clause("0", 4), Ok(c) if c.is_empty()));
    }
}

//! Line classification for FASTA36 `-m 0` reports.
//!
//! Every report line is tagged as one of the record-boundary or statistics
//! lines below, or as a [`LineKind::Body`] line whose meaning depends on where
//! the state machine currently is. Captured fields borrow from the input line.
//!
//! The recognised shapes are:
//!
//! ```text
//!   1>>>Q1 - 100 aa                                          query title
//! >>S1 some description                          (120 aa)    subject title
//! >--                                                        continuation
//!  initn: 250 init1: 250 opt: 260  Z-score: 300.1  bits: 55.3 E(1): 1e-10
//! Smith-Waterman score: 200; 95.0% identity (98.0% similar) in 50 aa overlap (1-50:10-59)
//! ```
//!
//! The tags are mutually exclusive: query titles start with an index followed
//! by `>>>`, subject titles start with `>>`, the continuation marker is the
//! whole line, and score/detail lines never start with `>`.
//!
//! ### Example
//! ```rust
//! use fasta36_tabular::{LineClassifier, LineKind};
//! let c = LineClassifier::new().unwrap();
//! match c.classify("  1>>>Q1 - 100 aa") {
//!     LineKind::QueryTitle { id, len } => assert_eq!((id, len), ("Q1", "100")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
use regex::Regex;

use crate::common::Fasta36Error;

/// Residue unit suffix printed after sequence lengths (`na`, `nt`, `aa`).
const UNIT: &str = "(?:na|nt|aa)";

/// A classified report line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `<index>>>><id> - <length> <unit>`.
    QueryTitle { id: &'a str, len: &'a str },
    /// `>><id> ... (<length> <unit>)`.
    SubjectTitle { id: &'a str, len: &'a str },
    /// `>--`: another local alignment against the current subject.
    Continuation,
    /// `... bits: <bit_score> E(<n>): <evalue>`.
    Score { bit_score: &'a str, evalue: &'a str },
    /// `... score: <n>; <p_ident>% identity (<p_sim>% similar) in <len> <unit> overlap (<qs>-<qe>:<ss>-<se>)`.
    Detail(Detail<'a>),
    /// Anything else.
    Body(&'a str),
}

/// Fields captured from an alignment detail line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detail<'a> {
    pub p_ident: &'a str,
    pub p_sim: &'a str,
    pub aln_len: &'a str,
    pub q_start: &'a str,
    pub q_end: &'a str,
    pub s_start: &'a str,
    pub s_end: &'a str,
}

/// Compiled line patterns.
#[derive(Clone, Debug)]
pub struct LineClassifier {
    query_title: Regex,
    subject_title: Regex,
    score: Regex,
    detail: Regex,
}

impl LineClassifier {
    /// Compile the report line patterns.
    pub fn new() -> Result<Self, Fasta36Error> {
        Ok(Self {
            query_title: Regex::new(&format!(r"^\s*\d+>>>(\S+) - (\d+) {UNIT}\s*$"))?,
            subject_title: Regex::new(&format!(r"^>>(\S+)(?:\s.*)?\((\d+) {UNIT}\)\s*$"))?,
            score: Regex::new(r"\bbits: (\S+) E\(\d+\): (\S+)\s*$")?,
            detail: Regex::new(&format!(
                r"\bscore: \d+; ([\d.]+)% identity \(([\d.]+)% similar\) in (\d+) {UNIT} overlap \((\d+)-(\d+):(\d+)-(\d+)\)\s*$"
            ))?,
        })
    }

    /// Tag one line (without its line terminator). First match wins.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(c) = self.query_title.captures(line) {
            return LineKind::QueryTitle { id: group(&c, 1), len: group(&c, 2) };
        }
        if let Some(c) = self.subject_title.captures(line) {
            return LineKind::SubjectTitle { id: group(&c, 1), len: group(&c, 2) };
        }
        if line == ">--" {
            return LineKind::Continuation;
        }
        if let Some(c) = self.score.captures(line) {
            return LineKind::Score { bit_score: group(&c, 1), evalue: group(&c, 2) };
        }
        if let Some(c) = self.detail.captures(line) {
            return LineKind::Detail(Detail {
                p_ident: group(&c, 1),
                p_sim: group(&c, 2),
                aln_len: group(&c, 3),
                q_start: group(&c, 4),
                q_end: group(&c, 5),
                s_start: group(&c, 6),
                s_end: group(&c, 7),
            });
        }
        LineKind::Body(line)
    }
}

fn group<'a>(c: &regex::Captures<'a>, i: usize) -> &'a str {
    c.get(i).map_or("", |m| m.as_str())
}

//! Shared pieces used by every stage of the converter: the crate error type,
//! the gap symbol and the tabular column layout.
//!
//! ## Errors
//! All library operations return [`Fasta36Error`]. I/O and CSV failures are
//! wrapped as-is; the remaining variants describe reconstruction problems
//! found while walking a report. `MalformedBody` and `IncompleteRecord` are
//! only produced under [`Tolerance::Strict`](crate::Tolerance).
//!

/// Errors that can be returned while converting a `-m 0` report.
#[derive(thiserror::Error, Debug)]
pub enum Fasta36Error {
    /// Reading the report or writing the table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The tabular writer failed.
    #[error("table writer error: {0}")]
    Csv(#[from] csv::Error),
    /// One of the built-in line patterns did not compile.
    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// The three reconstructed strings of a record ended up with different lengths.
    #[error("line {line}: aligned strings differ in length for {query} vs {subject} (q_aln={q_aln}, s_aln={s_aln}, m_aln={m_aln})")]
    LengthMismatch { line: usize, query: String, subject: String, q_aln: usize, s_aln: usize, m_aln: usize },
    /// A query body line carried no residue column.
    #[error("line {line}: query body line has no residue column")]
    MalformedBody { line: usize },
    /// A record with a declared subject never reached its alignment body,
    /// or reached it without any aligned residues.
    #[error("line {line}: incomplete alignment record for {query} vs {subject}")]
    IncompleteRecord { line: usize, query: String, subject: String },
}

/// Gap placeholder inside aligned sequences.
pub const GAP: char = '-';

/// Column names of the output table, in emission order.
///
/// The first name carries the `#` comment marker so the header can be skipped
/// by tools reading the table as data.
pub const COLUMNS: [&str; 19] = [
    "#query", "subject", "p_ident", "aln_len", "mismatches", "gap_opens",
    "q_start", "q_end", "s_start", "s_end", "evalue", "bit_score",
    "p_sim", "gaps", "q_len", "s_len", "m_aln", "q_aln", "s_aln",
];

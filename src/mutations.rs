//! Mutation counts derived from a pair of aligned sequences.
//!
//! ### Example
//! ```rust
//! use fasta36_tabular::count_mutations;
//! let m = count_mutations("MKTAY-YLLP", "MKTAYSYLLP");
//! assert_eq!((m.mismatches, m.gaps, m.gap_opens), (0, 1, 1));
//! ```
use crate::common::GAP;

/// Mismatches, gaps and gap openings between two aligned sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationCounts {
    /// Columns where both residues are present and differ.
    pub mismatches: usize,
    /// Gap symbols in both sequences.
    pub gaps: usize,
    /// Runs of gaps in both sequences.
    pub gap_opens: usize,
}

/// Count mutations between two aligned sequences of equal length.
///
/// A gap run opens where `-` follows a word character or `*` (stop codon),
/// or at the very first column. Gap columns are never mismatches, and
/// residues are compared case-sensitively as printed by the aligner.
pub fn count_mutations(q_aln: &str, s_aln: &str) -> MutationCounts {
    let gaps = gap_count(q_aln) + gap_count(s_aln);
    let gap_opens = gap_opens(q_aln) + gap_opens(s_aln);
    let mismatches = q_aln.chars().zip(s_aln.chars())
        .filter(|&(x, y)| x != GAP && y != GAP && x != y)
        .count();
    MutationCounts { mismatches, gaps, gap_opens }
}

fn gap_count(s: &str) -> usize {
    s.chars().filter(|&c| c == GAP).count()
}

fn gap_opens(s: &str) -> usize {
    let mut opens = usize::from(s.starts_with(GAP));
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c == GAP && prev.is_some_and(opens_gap) { opens += 1; }
        prev = Some(c);
    }
    opens
}

/// Characters after which a `-` starts a new gap run.
fn opens_gap(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '*'
}

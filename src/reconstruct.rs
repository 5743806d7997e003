//! Re-assembly of the wrapped alignment display.
//!
//! FASTA36 prints each alignment in fixed-width segments of up to three
//! lines: the query residues labelled with the (truncated) query id, an
//! unlabelled line of match symbols, and the subject residues labelled with
//! the subject id. Coordinate rulers above and below are unlabelled too.
//!
//! ```text
//!                10
//! Q1     MKTAY-YLLP
//!        :::: .::::
//! S1     MKTAYSYLLP
//!               20
//! ```
//!
//! The residue column of the query line is located once per segment and the
//! same column span is then cut out of the match line and the subject line.
//!
use std::ops::Range;

use crate::common::Fasta36Error;
use crate::record::Record;

/// Label width the alignment tool uses when it truncates ids.
pub const LABEL_PREFIX: usize = 4;

/// How a body line's label is compared to a query or subject id.
///
/// Labels are truncated by the alignment tool, so ids sharing a prefix make
/// query and subject lines indistinguishable under [`IdMatcher::Prefix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdMatcher {
    /// The first `n` characters of the line equal the first `n` characters
    /// of the id (only the id's own characters when it is shorter).
    Prefix(usize),
    /// The line's first whitespace token equals the id or is a non-empty
    /// prefix of it (truncated label). Falls back to `Prefix(4)` when the
    /// line starts with whitespace.
    FullLabel,
}

impl Default for IdMatcher {
    fn default() -> Self { IdMatcher::Prefix(LABEL_PREFIX) }
}

impl IdMatcher {
    /// True if `line` is labelled with `id`. An empty id never matches.
    pub fn matches(&self, line: &str, id: &str) -> bool {
        if id.is_empty() { return false; }
        match *self {
            IdMatcher::Prefix(n) => prefix_eq(line, id, n),
            IdMatcher::FullLabel => {
                match line.split_whitespace().next() {
                    Some(label) if !line.starts_with(char::is_whitespace) => id.starts_with(label),
                    _ => prefix_eq(line, id, LABEL_PREFIX),
                }
            }
        }
    }
}

fn prefix_eq(line: &str, id: &str, n: usize) -> bool {
    let n = n.min(id.chars().count());
    n > 0 && line.chars().take(n).eq(id.chars().take(n))
}

/// Column span (byte offsets) of the second whitespace-delimited token of a
/// labelled body line, i.e. the residue text after the label.
///
/// Returns `None` unless the line is exactly `label<ws>residues[<ws>]`.
pub fn residue_span(line: &str) -> Option<Range<usize>> {
    let label_end = line.find(char::is_whitespace)?;
    if label_end == 0 { return None; }
    let rest = &line[label_end..];
    let start = label_end + (rest.len() - rest.trim_start().len());
    let tail = &line[start..];
    if tail.is_empty() { return None; }
    let end = start + tail.find(char::is_whitespace).unwrap_or(tail.len());
    if !line[end..].trim().is_empty() { return None; }
    Some(start..end)
}

/// Text of `line` in `span`, clipped to the line.
fn column_text<'a>(line: &'a str, span: &Range<usize>) -> &'a str {
    let end = span.end.min(line.len());
    line.get(span.start.min(end)..end).unwrap_or("")
}

/// What a body line turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyLine {
    Query,
    Pattern,
    Subject,
    /// Ruler, blank line or anything outside a segment.
    Ignored,
    /// Query-labelled line without a residue column.
    Malformed,
}

/// Per-alignment reconstruction state.
#[derive(Clone, Debug, Default)]
pub struct Reconstructor {
    matcher: IdMatcher,
    span: Option<Range<usize>>,
    pattern_pending: bool,
}

impl Reconstructor {
    pub fn new(matcher: IdMatcher) -> Self {
        Self { matcher, span: None, pattern_pending: false }
    }

    /// Forget the current segment (new alignment).
    pub fn reset(&mut self) {
        self.span = None;
        self.pattern_pending = false;
    }

    /// Route one body line into the record's aligned strings.
    pub fn push_line(&mut self, line: &str, rec: &mut Record) -> BodyLine {
        if self.matcher.matches(line, &rec.query) {
            let Some(span) = residue_span(line) else { return BodyLine::Malformed };
            rec.q_aln.push_str(&line[span.clone()]);
            self.span = Some(span);
            self.pattern_pending = true;
            return BodyLine::Query;
        }
        if !self.pattern_pending { return BodyLine::Ignored; }
        let Some(span) = self.span.as_ref() else { return BodyLine::Ignored };
        if self.matcher.matches(line, &rec.subject) {
            rec.s_aln.push_str(column_text(line, span));
            self.pattern_pending = false;
            BodyLine::Subject
        } else {
            let text = column_text(line, span);
            rec.m_aln.push_str(text);
            // trailing blanks of the match line are often trimmed
            let short = span.len().saturating_sub(text.len());
            rec.m_aln.extend(std::iter::repeat(' ').take(short));
            BodyLine::Pattern
        }
    }

    /// Like [`push_line`](Self::push_line) but a malformed query line is an error.
    pub fn push_line_strict(&mut self, line: &str, line_no: usize, rec: &mut Record) -> Result<BodyLine, Fasta36Error> {
        match self.push_line(line, rec) {
            BodyLine::Malformed => Err(Fasta36Error::MalformedBody { line: line_no }),
            kind => Ok(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(q: &str, s: &str) -> Record {
        let mut r = Record::default();
        r.start_query(q, "100");
        r.start_subject(s, "120");
        r
    }

    #[test]
    fn span_of_residue_column() {
        assert_eq!(residue_span("Q1     MKTAY-YLLP"), Some(7..17));
        assert_eq!(residue_span("sp|P09 MKTAYIAKQR   "), Some(7..17));
        assert_eq!(residue_span("       :::: .::::"), None);
        assert_eq!(residue_span("Q1"), None);
        assert_eq!(residue_span("Q1     "), None);
        assert_eq!(residue_span("Q1     MKT AY"), None);
    }

    #[test]
    fn prefix_matcher() {
        let m = IdMatcher::Prefix(4);
        assert!(m.matches("sp|P09 MKTAY", "sp|P09123|ABC"));
        assert!(m.matches("Q1     MKTAY", "Q1"));
        assert!(!m.matches("       ::::", "Q1"));
        assert!(!m.matches("S1     MKTAY", "Q1"));
        assert!(!m.matches("anything", ""));
        // shared prefixes are indistinguishable
        assert!(m.matches("ABCD_2 MKTAY", "ABCD_1"));
    }

    #[test]
    fn full_label_matcher() {
        let m = IdMatcher::FullLabel;
        assert!(m.matches("ABCD_1 MKTAY", "ABCD_1"));
        assert!(!m.matches("ABCD_2 MKTAY", "ABCD_1"));
        // truncated label
        assert!(m.matches("XM_048 MKTAY", "XM_048752055.1"));
        assert!(!m.matches("       ::::", "Q1"));
    }

    #[test]
    fn one_segment() {
        let mut r = record("Q1", "S1");
        let mut rc = Reconstructor::default();
        assert_eq!(rc.push_line("               10", &mut r), BodyLine::Ignored);
        assert_eq!(rc.push_line("Q1     MKTAY-YLLP", &mut r), BodyLine::Query);
        assert_eq!(rc.push_line("       :::: .::::", &mut r), BodyLine::Pattern);
        assert_eq!(rc.push_line("S1     MKTAYSYLLP", &mut r), BodyLine::Subject);
        assert_eq!(rc.push_line("              20", &mut r), BodyLine::Ignored);
        assert_eq!(r.q_aln, "MKTAY-YLLP");
        assert_eq!(r.m_aln, ":::: .::::");
        assert_eq!(r.s_aln, "MKTAYSYLLP");
    }

    #[test]
    fn wrapped_segments_concatenate() {
        let mut r = record("Q1", "S1");
        let mut rc = Reconstructor::default();
        for line in [
            "Q1     MKTA", "       ::::", "S1     MKTA", "",
            "Q1     YLLP", "       :.  ", "S1     YMGP",
        ] {
            rc.push_line(line, &mut r);
        }
        assert_eq!(r.q_aln, "MKTAYLLP");
        assert_eq!(r.m_aln, ":::::.  ");
        assert_eq!(r.s_aln, "MKTAYMGP");
        assert!(r.is_consistent());
    }

    #[test]
    fn trimmed_pattern_is_padded() {
        let mut r = record("Q1", "S1");
        let mut rc = Reconstructor::default();
        rc.push_line("Q1     ACGT", &mut r);
        rc.push_line("       ::", &mut r);
        rc.push_line("S1     ACTA", &mut r);
        assert_eq!(r.m_aln, "::  ");
        assert!(r.is_consistent());
    }

    #[test]
    fn subject_line_without_query_is_ignored() {
        let mut r = record("Q1", "S1");
        let mut rc = Reconstructor::default();
        assert_eq!(rc.push_line("S1     MKTAYSYLLP", &mut r), BodyLine::Ignored);
        assert!(r.s_aln.is_empty());
    }

    #[test]
    fn malformed_query_line() {
        let mut r = record("Q1", "S1");
        let mut rc = Reconstructor::default();
        assert_eq!(rc.push_line("Q1", &mut r), BodyLine::Malformed);
        assert!(matches!(rc.push_line_strict("Q1", 7, &mut r), Err(Fasta36Error::MalformedBody { line: 7 })));
    }
}

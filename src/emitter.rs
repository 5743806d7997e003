//! Tabular output (`-m 8`-like, plus match pattern and aligned sequences).
//!
//! Fields are written verbatim: no quoting, tab delimiter, `\n` terminator.
use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::common::{Fasta36Error, COLUMNS};
use crate::mutations::count_mutations;
use crate::record::Record;

/// Writes the header once, then one row per completed record.
pub struct RecordWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap `out` and write the header line.
    pub fn new(out: W) -> Result<Self, Fasta36Error> {
        let mut inner = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);
        inner.write_record(COLUMNS)?;
        Ok(Self { inner, rows: 0 })
    }

    /// Serialize a completed record. `line` is the report line that closed it
    /// and is only used for error reporting.
    pub fn write(&mut self, rec: &Record, line: usize) -> Result<(), Fasta36Error> {
        if !rec.is_consistent() {
            return Err(Fasta36Error::LengthMismatch {
                line,
                query: rec.query.clone(),
                subject: rec.subject.clone(),
                q_aln: rec.q_aln.chars().count(),
                s_aln: rec.s_aln.chars().count(),
                m_aln: rec.m_aln.chars().count(),
            });
        }
        let m = count_mutations(&rec.q_aln, &rec.s_aln);
        let (mismatches, gap_opens, gaps) = (m.mismatches.to_string(), m.gap_opens.to_string(), m.gaps.to_string());
        let fields: [&str; 19] = [
            &rec.query, &rec.subject, &rec.p_ident, &rec.aln_len, &mismatches, &gap_opens,
            &rec.q_start, &rec.q_end, &rec.s_start, &rec.s_end, &rec.evalue, &rec.bit_score,
            &rec.p_sim, &gaps, &rec.q_len, &rec.s_len, &rec.m_aln, &rec.q_aln, &rec.s_aln,
        ];
        self.inner.write_record(fields)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn rows(&self) -> usize { self.rows }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, Fasta36Error> {
        self.inner.into_inner().map_err(|e| Fasta36Error::Io(e.into_error()))
    }
}

//! The block state machine driving a conversion.
//!
//! A report is walked line by line. Each line is classified, then applied to
//! the single in-flight [`Record`] according to the current [`BlockState`]:
//!
//! | state       | line                | effect                                      | next        |
//! |-------------|---------------------|---------------------------------------------|-------------|
//! | any         | query title         | flush; new query                            | QuerySeen   |
//! | any         | subject title       | flush; new subject                          | SubjectSeen |
//! | Aligned     | `>--`               | flush; same subject, fresh statistics       | SubjectSeen |
//! | SubjectSeen | score line          | bit score, e-value                          | SubjectSeen |
//! | SubjectSeen | detail line         | identity, similarity, length, coordinates   | Aligned     |
//! | Aligned     | anything else       | alignment body                              | Aligned     |
//!
//! Everything else is ignored. A flush writes the record only when the
//! machine was `Aligned`; otherwise the record is dropped, silently under
//! [`Tolerance::Lenient`] and as an error under [`Tolerance::Strict`] when a
//! subject had been declared.
//!
//! ### Example
//! ```rust
//! use fasta36_tabular::{convert, ConvertOptions};
//! let report = "  1>>>Q1 - 100 aa\n\
//! >>S1 demo subject (120 aa)\n \
//! initn: 250 init1: 250 opt: 260  Z-score: 300.1  bits: 55.3 E(1): 1e-10\n\
//! Smith-Waterman score: 200; 95.0% identity (98.0% similar) in 50 aa overlap (1-50:10-59)\n\
//! \n\
//! Q1     MKTAY-YLLP\n       :::: .::::\nS1     MKTAYSYLLP\n";
//! let mut out: Vec<u8> = Vec::new();
//! let summary = convert(report.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();
//! assert_eq!(summary.records, 1);
//! ```
//!
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, trace};

use crate::classify::{LineClassifier, LineKind};
use crate::common::Fasta36Error;
use crate::emitter::RecordWriter;
use crate::reconstruct::{BodyLine, IdMatcher, Reconstructor};
use crate::record::Record;

/// How incomplete data is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tolerance {
    /// Drop incomplete records and malformed body lines without complaint.
    #[default]
    Lenient,
    /// Report incomplete records, empty alignments and malformed body lines as errors.
    Strict,
}

/// Options for a conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvertOptions {
    pub tolerance: Tolerance,
    /// Comparator deciding whether a body line belongs to the query or subject.
    pub id_matcher: IdMatcher,
}

/// Position inside one alignment record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockState {
    #[default]
    Init,
    QuerySeen,
    SubjectSeen,
    Aligned,
}

/// Counters reported at the end of a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Lines read from the report.
    pub lines: usize,
    /// Rows written to the table.
    pub records: usize,
    /// Records with a subject that never reached their alignment body.
    pub dropped: usize,
}

/// Streaming converter from report lines to table rows.
pub struct Converter<W: Write> {
    classifier: LineClassifier,
    tolerance: Tolerance,
    state: BlockState,
    record: Record,
    body: Reconstructor,
    out: RecordWriter<W>,
    line_no: usize,
    dropped: usize,
}

impl<W: Write> Converter<W> {
    /// Create a converter writing to `out`; the header is written immediately.
    pub fn new(out: W, options: &ConvertOptions) -> Result<Self, Fasta36Error> {
        Ok(Self {
            classifier: LineClassifier::new()?,
            tolerance: options.tolerance,
            state: BlockState::Init,
            record: Record::default(),
            body: Reconstructor::new(options.id_matcher),
            out: RecordWriter::new(out)?,
            line_no: 0,
            dropped: 0,
        })
    }

    pub fn state(&self) -> BlockState { self.state }

    /// The record currently being assembled.
    pub fn record(&self) -> &Record { &self.record }

    /// Apply one report line (without its terminator).
    pub fn process_line(&mut self, line: &str) -> Result<(), Fasta36Error> {
        self.line_no += 1;
        match (self.state, self.classifier.classify(line)) {
            (_, LineKind::QueryTitle { id, len }) => {
                self.flush()?;
                self.record.start_query(id, len);
                self.body.reset();
                self.state = BlockState::QuerySeen;
            }
            (_, LineKind::SubjectTitle { id, len }) => {
                self.flush()?;
                self.record.start_subject(id, len);
                self.body.reset();
                self.state = BlockState::SubjectSeen;
            }
            (BlockState::Aligned, LineKind::Continuation) => {
                self.flush()?;
                self.record.clear_alignment();
                self.body.reset();
                self.state = BlockState::SubjectSeen;
            }
            (BlockState::SubjectSeen, LineKind::Score { bit_score, evalue }) => {
                set(&mut self.record.bit_score, bit_score);
                set(&mut self.record.evalue, evalue);
            }
            (BlockState::SubjectSeen, LineKind::Detail(d)) => {
                let r = &mut self.record;
                set(&mut r.p_ident, d.p_ident);
                set(&mut r.p_sim, d.p_sim);
                set(&mut r.aln_len, d.aln_len);
                set(&mut r.q_start, d.q_start);
                set(&mut r.q_end, d.q_end);
                set(&mut r.s_start, d.s_start);
                set(&mut r.s_end, d.s_end);
                self.state = BlockState::Aligned;
            }
            // score/detail shapes cannot occur inside a body; treat them as body text
            (BlockState::Aligned, _) => {
                let kind = match self.tolerance {
                    Tolerance::Lenient => self.body.push_line(line, &mut self.record),
                    Tolerance::Strict => self.body.push_line_strict(line, self.line_no, &mut self.record)?,
                };
                if kind == BodyLine::Malformed {
                    debug!("line {}: query body line without residues ignored", self.line_no);
                }
                trace!("line {}: {:?}", self.line_no, kind);
            }
            _ => {}
        }
        Ok(())
    }

    /// Flush the last record and the output. Returns the conversion counters.
    pub fn finish(mut self) -> Result<ConversionSummary, Fasta36Error> {
        self.flush()?;
        let summary = ConversionSummary { lines: self.line_no, records: self.out.rows(), dropped: self.dropped };
        self.out.into_inner()?.flush()?;
        Ok(summary)
    }

    /// Emit the in-flight record if it is complete, otherwise drop it.
    fn flush(&mut self) -> Result<(), Fasta36Error> {
        let strict = self.tolerance == Tolerance::Strict;
        match self.state {
            BlockState::Aligned => {
                if strict && self.record.q_aln.is_empty() {
                    return Err(self.incomplete());
                }
                self.out.write(&self.record, self.line_no)?;
                debug!("line {}: wrote {} vs {} ({} columns)",
                    self.line_no, self.record.query, self.record.subject, self.record.q_aln.len());
            }
            BlockState::SubjectSeen => {
                if strict { return Err(self.incomplete()); }
                self.dropped += 1;
                debug!("line {}: dropped incomplete {} vs {}", self.line_no, self.record.query, self.record.subject);
            }
            BlockState::Init | BlockState::QuerySeen => {}
        }
        Ok(())
    }

    fn incomplete(&self) -> Fasta36Error {
        Fasta36Error::IncompleteRecord {
            line: self.line_no,
            query: self.record.query.clone(),
            subject: self.record.subject.clone(),
        }
    }
}

fn set(field: &mut String, value: &str) {
    field.clear();
    field.push_str(value);
}

/// Convert a whole report read from `input`, writing the table to `output`.
pub fn convert<R: BufRead, W: Write>(input: R, output: W, options: &ConvertOptions) -> Result<ConversionSummary, Fasta36Error> {
    let mut conv = Converter::new(output, options)?;
    for line in input.lines() {
        conv.process_line(&line?)?;
    }
    conv.finish()
}

/// Convert the report at `input` into a table at `output`.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConversionSummary, Fasta36Error> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    convert(reader, writer, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORE: &str = " initn: 250 init1: 250 opt: 260  Z-score: 300.1  bits: 55.3 E(1): 1e-10";
    const DETAIL: &str = "Smith-Waterman score: 200; 95.0% identity (98.0% similar) in 50 aa overlap (1-50:10-59)";

    fn run(lines: &[&str], options: ConvertOptions) -> Result<(String, ConversionSummary), Fasta36Error> {
        let mut out = Vec::new();
        let summary = convert(lines.join("\n").as_bytes(), &mut out, &options)?;
        Ok((String::from_utf8(out).unwrap(), summary))
    }

    fn rows(out: &str) -> Vec<Vec<String>> {
        out.lines().skip(1).map(|l| l.split('\t').map(str::to_string).collect()).collect()
    }

    #[test]
    fn transitions() {
        let mut c = Converter::new(Vec::<u8>::new(), &ConvertOptions::default()).unwrap();
        assert_eq!(c.state(), BlockState::Init);
        c.process_line(SCORE).unwrap();
        assert_eq!(c.state(), BlockState::Init);
        c.process_line("  1>>>Q1 - 100 aa").unwrap();
        assert_eq!(c.state(), BlockState::QuerySeen);
        c.process_line(DETAIL).unwrap();
        assert_eq!(c.state(), BlockState::QuerySeen);
        c.process_line(">--").unwrap();
        assert_eq!(c.state(), BlockState::QuerySeen);
        c.process_line(">>S1 subject (120 aa)").unwrap();
        assert_eq!(c.state(), BlockState::SubjectSeen);
        c.process_line(SCORE).unwrap();
        assert_eq!(c.record().bit_score, "55.3");
        c.process_line(DETAIL).unwrap();
        assert_eq!(c.state(), BlockState::Aligned);
        assert_eq!(c.record().q_start, "1");
        c.process_line(">--").unwrap();
        assert_eq!(c.state(), BlockState::SubjectSeen);
        assert_eq!(c.record().subject, "S1");
        assert!(c.record().p_ident.is_empty());
    }

    #[test]
    fn scenario_row() {
        let (out, summary) = run(&[
            "  1>>>Q1 - 100 aa",
            ">>S1 subject (120 aa)",
            SCORE,
            DETAIL,
            "",
            "               10",
            "Q1     MKTAY-YLLP",
            "       :::: .::::",
            "S1     MKTAYSYLLP",
            "                   20",
        ], ConvertOptions::default()).unwrap();
        assert_eq!(summary, ConversionSummary { lines: 10, records: 1, dropped: 0 });
        let r = &rows(&out)[0];
        assert_eq!(r[0], "Q1");
        assert_eq!(r[1], "S1");
        assert_eq!(r[2], "95.0");
        assert_eq!(r[3], "50");
        assert_eq!(r[4], "0");
        assert_eq!(r[5], "1");
        assert_eq!(r[13], "1");
        assert_eq!(r[14], "100");
        assert_eq!(r[15], "120");
        assert_eq!(r[16..], [":::: .::::", "MKTAY-YLLP", "MKTAYSYLLP"]);
    }

    #[test]
    fn query_without_hits_produces_nothing() {
        let (out, summary) = run(&[
            "  1>>>Q0 - 80 aa",
            "!! No sequences with E() < 10",
            "  2>>>Q1 - 100 aa",
            ">>S1 subject (120 aa)", SCORE, DETAIL,
            "Q1     MKTA", "       ::::", "S1     MKTA",
        ], ConvertOptions::default()).unwrap();
        let rows = rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Q1");
        assert_eq!(summary.dropped, 0);
    }

    #[test]
    fn continuation_starts_independent_record() {
        let (out, _) = run(&[
            "  1>>>Q1 - 100 aa",
            ">>S1 subject (120 aa)", SCORE, DETAIL,
            "Q1     MKTA", "       ::::", "S1     MKTA",
            ">--",
            " initn: 40 init1: 40 opt: 45  Z-score: 60.2  bits: 20.1 E(1): 0.5",
            "Smith-Waterman score: 45; 50.0% identity (75.0% similar) in 4 aa overlap (60-63:90-92)",
            "Q1     GW-P", "       :  :", "S1     GYAP",
        ], ConvertOptions::default()).unwrap();
        let rows = rows(&out);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[1][1].as_str(), rows[1][15].as_str()), ("S1", "120"));
        assert_eq!(rows[1][2], "50.0");
        assert_eq!(rows[1][11], "20.1");
        assert_eq!(rows[1][17], "GW-P");
        assert_eq!(rows[1][4], "1");
        assert_eq!(rows[0][17], "MKTA");
    }

    #[test]
    fn subject_without_detail_is_dropped() {
        let lines = [
            "  1>>>Q1 - 100 aa",
            ">>S1 subject (120 aa)", SCORE,
            ">>S2 other (90 aa)", SCORE, DETAIL,
            "Q1     MKTA", "       ::::", "S2     MKTA",
        ];
        let (out, summary) = run(&lines, ConvertOptions::default()).unwrap();
        assert_eq!(summary.dropped, 1);
        assert_eq!(rows(&out)[0][1], "S2");

        let strict = ConvertOptions { tolerance: Tolerance::Strict, ..Default::default() };
        let err = run(&lines, strict).unwrap_err();
        assert!(matches!(err, Fasta36Error::IncompleteRecord { line: 4, ref subject, .. } if subject == "S1"));
    }

    #[test]
    fn strict_rejects_empty_body_and_malformed_lines() {
        let strict = ConvertOptions { tolerance: Tolerance::Strict, ..Default::default() };
        let empty = ["  1>>>Q1 - 100 aa", ">>S1 subject (120 aa)", SCORE, DETAIL];
        assert!(matches!(run(&empty, strict), Err(Fasta36Error::IncompleteRecord { .. })));
        // lenient keeps the row with empty aligned strings
        let (out, _) = run(&empty, ConvertOptions::default()).unwrap();
        assert_eq!(rows(&out)[0][17], "");

        let malformed = ["  1>>>Q1 - 100 aa", ">>S1 subject (120 aa)", SCORE, DETAIL, "Q1"];
        assert!(matches!(run(&malformed, strict), Err(Fasta36Error::MalformedBody { line: 5 })));
    }

    #[test]
    fn empty_input_writes_header() {
        let (out, summary) = run(&[], ConvertOptions::default()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("#query\t"));
        assert_eq!(summary.records, 0);
    }

    #[test]
    fn deterministic() {
        let lines = [
            "  1>>>Q1 - 100 aa", ">>S1 subject (120 aa)", SCORE, DETAIL,
            "Q1     MKTAY-YLLP", "       :::: .::::", "S1     MKTAYSYLLP",
        ];
        let a = run(&lines, ConvertOptions::default()).unwrap().0;
        let b = run(&lines, ConvertOptions::default()).unwrap().0;
        assert_eq!(a, b);
    }
}

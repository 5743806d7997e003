//! # fasta36-tabular
//!
//! Convert the pairwise alignment report written by the FASTA36 programs
//! (`fasta36`, `ssearch36`, `glsearch36`, ... run with `-m 0`) into a table
//! with one row per alignment, similar to `-m 8`, extended with the full
//! aligned query and subject sequences and the match pattern between them.
//!
//! ## Pipeline
//! Each report line goes through:
//! 1. [`LineClassifier`]: tags titles, the `>--` continuation marker, score
//!    and detail lines; everything else is body text.
//! 2. [`Converter`]: a four-state machine ([`BlockState`]) owning the single
//!    in-flight [`Record`].
//! 3. [`Reconstructor`]: re-assembles the wrapped alignment display into the
//!    query, subject and match strings.
//! 4. [`RecordWriter`]: writes the row, computing [`MutationCounts`] with
//!    [`count_mutations`] just before serialization.
//!
//! Records that never reach their alignment body are dropped (see
//! [`Tolerance`]).
//!
//! ## Output columns
//! `query subject p_ident aln_len mismatches gap_opens q_start q_end s_start
//! s_end evalue bit_score p_sim gaps q_len s_len m_aln q_aln s_aln`, tab
//! separated, after a `#`-prefixed header line.
//!
//! ### Example
//! ```rust,no_run
//! use std::path::Path;
//! use fasta36_tabular::{convert_file, ConvertOptions};
//! let summary = convert_file(Path::new("hits.m0"), Path::new("hits.tsv"), &ConvertOptions::default()).unwrap();
//! println!("{} alignments", summary.records);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod classify;
pub mod common;
pub mod emitter;
pub mod machine;
pub mod mutations;
pub mod reconstruct;
pub mod record;

pub use classify::{Detail, LineClassifier, LineKind};
pub use common::{Fasta36Error, COLUMNS, GAP};
pub use emitter::RecordWriter;
pub use machine::{convert, convert_file, BlockState, ConversionSummary, ConvertOptions, Converter, Tolerance};
pub use mutations::{count_mutations, MutationCounts};
pub use reconstruct::{residue_span, BodyLine, IdMatcher, Reconstructor, LABEL_PREFIX};
pub use record::Record;

//! The in-flight alignment record.
//!
//! Statistics are kept as the text printed by the alignment tool; only the
//! mutation counts are derived (see [`count_mutations`](crate::count_mutations)).

/// One query/subject alignment as it is being assembled from the report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Query identifier from the query title line.
    pub query: String,
    /// Query length in residues, as printed.
    pub q_len: String,
    /// Subject identifier from the subject title line.
    pub subject: String,
    /// Subject length in residues, as printed.
    pub s_len: String,
    /// Bit score from the score line.
    pub bit_score: String,
    /// E-value from the score line.
    pub evalue: String,
    /// Percent identity from the detail line.
    pub p_ident: String,
    /// Percent similarity from the detail line.
    pub p_sim: String,
    /// Overlap length from the detail line.
    pub aln_len: String,
    pub q_start: String,
    pub q_end: String,
    pub s_start: String,
    pub s_end: String,
    /// Query residues including gaps, re-assembled from the wrapped body.
    pub q_aln: String,
    /// Subject residues including gaps.
    pub s_aln: String,
    /// Match symbols (`:`, `.` or space) copied from the body.
    pub m_aln: String,
}

impl Record {
    /// Start a new query: everything from the previous query is forgotten.
    pub fn start_query(&mut self, id: &str, len: &str) {
        *self = Record::default();
        self.query.push_str(id);
        self.q_len.push_str(len);
    }

    /// Declare the subject of the next alignment, keeping the query.
    pub fn start_subject(&mut self, id: &str, len: &str) {
        self.subject.clear();
        self.subject.push_str(id);
        self.s_len.clear();
        self.s_len.push_str(len);
        self.clear_alignment();
    }

    /// Reset per-alignment statistics and reconstruction buffers.
    /// Query and subject identity are retained.
    pub fn clear_alignment(&mut self) {
        for f in [
            &mut self.bit_score, &mut self.evalue, &mut self.p_ident, &mut self.p_sim,
            &mut self.aln_len, &mut self.q_start, &mut self.q_end, &mut self.s_start,
            &mut self.s_end, &mut self.q_aln, &mut self.s_aln, &mut self.m_aln,
        ] {
            f.clear();
        }
    }

    /// True when the three reconstructed strings have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.q_aln.chars().count();
        n == self.s_aln.chars().count() && n == self.m_aln.chars().count()
    }
}

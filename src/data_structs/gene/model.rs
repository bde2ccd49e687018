use anyhow::ensure;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::intervals::{
    intron_intervals_from_exons,
    merge_exons,
    merge_intervals,
};
use super::transcript::Transcript;
use crate::data_structs::coords::{
    Contig,
    GenomicPosition,
};
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    GkSmallStr,
    Interval,
    PosType,
};
use crate::getter_fn;

/// A gene with its transcripts.
///
/// Exon and intron views are computed on demand from the transcripts; the
/// gene caches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    gene_stable_id: GkSmallStr,
    name:           String,
    contig:         Contig,
    biotype:        String,
    transcripts:    Vec<Transcript>,
}

impl Gene {
    pub fn new(
        gene_stable_id: GkSmallStr,
        name: String,
        contig: Contig,
        biotype: String,
    ) -> Self {
        Self {
            gene_stable_id,
            name,
            contig,
            biotype,
            transcripts: Vec::new(),
        }
    }

    /// Adds a transcript. It has to reference this gene and lie on the same
    /// sequence.
    pub fn add_transcript(
        &mut self,
        transcript: Transcript,
    ) -> anyhow::Result<()> {
        ensure!(
            transcript.gene_stable_id() == &self.gene_stable_id,
            "Transcript {} belongs to gene {}, not {}",
            transcript.transcript_stable_id(),
            transcript.gene_stable_id(),
            self.gene_stable_id
        );
        ensure!(
            transcript.chr() == self.chr(),
            "Transcript {} is on {}, gene {} is on {}",
            transcript.transcript_stable_id(),
            transcript.chr(),
            self.gene_stable_id,
            self.chr()
        );
        self.transcripts.push(transcript);
        Ok(())
    }

    pub fn with_transcripts(
        mut self,
        transcripts: Vec<Transcript>,
    ) -> anyhow::Result<Self> {
        for transcript in transcripts {
            self.add_transcript(transcript)?;
        }
        Ok(self)
    }

    getter_fn!(gene_stable_id, GkSmallStr);

    getter_fn!(name, String);

    getter_fn!(biotype, String);

    getter_fn!(contig, Contig);

    getter_fn!(transcripts, Vec<Transcript>);

    pub fn chr(&self) -> &GkSmallStr {
        self.contig.seqname()
    }

    pub fn start(&self) -> PosType {
        self.contig.start()
    }

    pub fn stop(&self) -> PosType {
        self.contig.end()
    }

    pub fn strand(&self) -> Strand {
        self.contig.strand()
    }

    pub fn len(&self) -> PosType {
        self.contig.length()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transcription start site: `start` on the forward strand, `stop`
    /// otherwise.
    pub fn tss(&self) -> PosType {
        if self.strand().is_forward() {
            self.start()
        }
        else {
            self.stop()
        }
    }

    /// Transcription end site: `stop` on the forward strand, `start`
    /// otherwise.
    pub fn tes(&self) -> PosType {
        if self.strand().is_forward() {
            self.stop()
        }
        else {
            self.start()
        }
    }

    pub fn tss_position(&self) -> GenomicPosition {
        GenomicPosition::new(self.chr().clone(), self.tss())
    }

    /// Window around the TSS reaching `upstream` bases against the
    /// direction of transcription and `downstream` bases along it.
    pub fn promoter(
        &self,
        upstream: PosType,
        downstream: PosType,
    ) -> Contig {
        let tss = self.tss();
        let (start, end) = if self.strand().is_forward() {
            (tss.saturating_sub(upstream), tss.saturating_add(downstream))
        }
        else {
            (tss.saturating_sub(downstream), tss.saturating_add(upstream))
        };
        Contig::new(self.chr().clone(), start, end, self.strand())
    }

    pub fn transcript(
        &self,
        transcript_stable_id: &str,
    ) -> Option<&Transcript> {
        self.transcripts
            .iter()
            .find(|t| t.transcript_stable_id().as_str() == transcript_stable_id)
    }

    /// Regions of the gene covered by no exon of any transcript.
    pub fn introns(&self) -> anyhow::Result<Vec<Interval>> {
        let introns = intron_intervals_from_exons(
            &self.pooled_exons(|_| true),
            self.start(),
            self.stop(),
            true,
        )
        .map_err(|e| {
            e.context(format!(
                "Gene {} has exons outside its bounds",
                self.gene_stable_id
            ))
        })?;
        Ok(merge_intervals(introns))
    }

    /// Introns of one transcript, bounded by this gene.
    pub fn introns_of(
        &self,
        transcript: &Transcript,
    ) -> anyhow::Result<Vec<Interval>> {
        transcript.introns_within(self.start(), self.stop())
    }

    /// Exons of all transcripts, merged where they overlap.
    pub fn exons_merged(&self) -> Vec<Interval> {
        merge_exons(self.pooled_exons(|_| true))
    }

    /// Exons of all transcripts, sorted but not merged.
    pub fn exons_overlapping(&self) -> Vec<Interval> {
        self.pooled_exons(|_| true)
            .into_iter()
            .sorted_unstable()
            .collect()
    }

    /// Like [`Gene::exons_merged`], only protein coding transcripts. The
    /// biotype is checked per transcript, so non-coding genes may still
    /// have coding isoforms.
    pub fn exons_protein_coding_merged(&self) -> Vec<Interval> {
        merge_exons(self.pooled_exons(Transcript::is_protein_coding))
    }

    pub fn exons_protein_coding_overlapping(&self) -> Vec<Interval> {
        self.pooled_exons(Transcript::is_protein_coding)
            .into_iter()
            .sorted_unstable()
            .collect()
    }

    fn pooled_exons<F: Fn(&Transcript) -> bool>(
        &self,
        selector: F,
    ) -> Vec<Interval> {
        self.transcripts
            .iter()
            .filter(|&t| selector(t))
            .flat_map(|t| t.exons().iter().copied())
            .collect()
    }
}

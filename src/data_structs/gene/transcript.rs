use anyhow::{
    bail,
    ensure,
};
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::intervals::intron_intervals_from_exons;
use crate::data_structs::coords::Contig;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    GkSmallStr,
    Interval,
    PosType,
};
use crate::getter_fn;

pub const PROTEIN_CODING: &str = "protein_coding";

/// A single transcript and its exons, kept in genomic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    transcript_stable_id: GkSmallStr,
    gene_stable_id:       GkSmallStr,
    name:                 String,
    contig:               Contig,
    biotype:              String,
    exons:                Vec<Interval>,
    exon_stable_ids:      Vec<GkSmallStr>,
}

impl Transcript {
    pub fn new(
        transcript_stable_id: GkSmallStr,
        gene_stable_id: GkSmallStr,
        name: String,
        contig: Contig,
        biotype: String,
    ) -> Self {
        Self {
            transcript_stable_id,
            gene_stable_id,
            name,
            contig,
            biotype,
            exons: Vec::new(),
            exon_stable_ids: Vec::new(),
        }
    }

    /// Attaches exons. `exon_stable_ids` is either empty or parallel to
    /// `exons`. Exons are reordered by position, ids follow them.
    pub fn with_exons(
        mut self,
        exons: Vec<Interval>,
        exon_stable_ids: Vec<GkSmallStr>,
    ) -> anyhow::Result<Self> {
        ensure!(
            exon_stable_ids.is_empty() || exon_stable_ids.len() == exons.len(),
            "Transcript {}: {} exon ids for {} exons",
            self.transcript_stable_id,
            exon_stable_ids.len(),
            exons.len()
        );
        if let Some((start, stop)) = exons
            .iter()
            .find(|(start, stop)| stop < start)
        {
            bail!(
                "Transcript {}: inverted exon ({start}, {stop})",
                self.transcript_stable_id
            )
        }

        if exon_stable_ids.is_empty() {
            self.exons = exons.into_iter().sorted_unstable().collect();
            self.exon_stable_ids.clear();
        }
        else {
            let (exons, ids): (Vec<_>, Vec<_>) = exons
                .into_iter()
                .zip(exon_stable_ids)
                .sorted_by_key(|(exon, _)| *exon)
                .unzip();
            self.exons = exons;
            self.exon_stable_ids = ids;
        }
        Ok(self)
    }

    getter_fn!(transcript_stable_id, GkSmallStr);

    getter_fn!(gene_stable_id, GkSmallStr);

    getter_fn!(name, String);

    getter_fn!(biotype, String);

    getter_fn!(contig, Contig);

    getter_fn!(exons, Vec<Interval>);

    getter_fn!(exon_stable_ids, Vec<GkSmallStr>);

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

    pub fn exons_tuples(&self) -> Vec<Interval> {
        self.exons.clone()
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    /// Sum of exon lengths.
    pub fn spliced_length(&self) -> PosType {
        self.exons
            .iter()
            .map(|(start, stop)| stop - start)
            .sum()
    }

    pub fn is_protein_coding(&self) -> bool {
        self.biotype == PROTEIN_CODING
    }

    /// Introns in genomic order: everything inside
    /// `[gene_start, gene_stop)` that is not one of this transcript's exons.
    ///
    /// The bounds are the owning gene's, so a gene reaching past the
    /// transcript's outer exons contributes leading and trailing introns.
    pub fn introns_within(
        &self,
        gene_start: PosType,
        gene_stop: PosType,
    ) -> anyhow::Result<Vec<Interval>> {
        intron_intervals_from_exons(&self.exons, gene_start, gene_stop, false)
            .map_err(|e| {
                e.context(format!(
                    "Transcript {} has invalid exons",
                    self.transcript_stable_id
                ))
            })
    }
}

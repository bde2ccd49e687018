//! Gene models assembled from an [`AnnotStore`].

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use polars::prelude::*;
use rayon::prelude::*;

use super::annotation::{
    AnnotStore,
    GffEntry,
};
use super::coords::{
    Contig,
    ContigIntervalMap,
};
use super::gene::{
    Gene,
    Transcript,
    PROTEIN_CODING,
};
use super::typedef::{
    GkSmallStr,
    Interval,
    PosType,
};
use crate::io::gff::{
    AnnotFormat,
    GffReader,
    GENE_ID_PREFIX,
    TRANSCRIPT_ID_PREFIX,
};
use crate::utils::THREAD_POOL;

pub const GENE_TYPES: [&str; 3] = ["gene", "ncRNA_gene", "pseudogene"];
/// Children of a gene that are never transcripts.
const NON_TRANSCRIPT_TYPES: [&str; 9] = [
    "exon",
    "CDS",
    "five_prime_UTR",
    "three_prime_UTR",
    "UTR",
    "start_codon",
    "stop_codon",
    "upstream",
    "downstream",
];
const EXON_TYPE: &str = "exon";

const GENE_BIOTYPE_KEYS: [&str; 3] = ["biotype", "gene_biotype", "gene_type"];
const TRANSCRIPT_BIOTYPE_KEYS: [&str; 3] =
    ["biotype", "transcript_biotype", "transcript_type"];
const GENE_NAME_KEYS: [&str; 1] = ["gene_name"];
const TRANSCRIPT_NAME_KEYS: [&str; 1] = ["transcript_name"];

/// Stable id of an entry: an explicit `*_id` attribute wins, otherwise the
/// `ID` without its Ensembl style type prefix.
fn stable_id(
    entry: &GffEntry,
    key: &str,
    prefix: &str,
) -> GkSmallStr {
    entry
        .attributes
        .get_other(key)
        .map(GkSmallStr::from)
        .unwrap_or_else(|| {
            GkSmallStr::from(entry.id.strip_prefix(prefix).unwrap_or(&entry.id))
        })
}

fn entry_name(
    entry: &GffEntry,
    keys: &[&str],
    fallback: &GkSmallStr,
) -> String {
    entry
        .attributes
        .get_other_any(keys)
        .or_else(|| entry.attributes.first_name())
        .map(String::from)
        .unwrap_or_else(|| fallback.to_string())
}

/// All genes of an annotation with lookups by stable id and by position.
pub struct GeneModelStore {
    genes:            Vec<Gene>,
    gene_index:       HashMap<GkSmallStr, usize>,
    transcript_index: HashMap<GkSmallStr, (usize, usize)>,
    imap:             ContigIntervalMap<usize>,
}

impl GeneModelStore {
    /// Reads a GFF3/GTF file and builds gene models from it.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<AnnotFormat>,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let store = GffReader::from_path(path, format)?
            .read_store()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_annot_store(&store)
    }

    /// Builds genes from `gene`-like features, transcripts from their
    /// children and exons from the transcripts' `exon` children.
    pub fn from_annot_store(store: &AnnotStore) -> anyhow::Result<Self> {
        let genes = store
            .iter_sorted()
            .filter(|e| GENE_TYPES.contains(&e.feature_type.as_str()))
            .map(|entry| Self::build_gene(store, entry))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let models = Self::from_genes(genes);
        info!(
            "Built {} gene models with {} transcripts",
            models.len(),
            models.n_transcripts()
        );
        Ok(models)
    }

    /// Indexes already assembled genes. Of genes sharing an id only the
    /// first is kept.
    pub fn from_genes(mut genes: Vec<Gene>) -> Self {
        let mut seen = hashbrown::HashSet::new();
        genes.retain(|gene| {
            let first = seen.insert(gene.gene_stable_id().clone());
            if !first {
                warn!(
                    "Gene {} defined more than once, keeping the first",
                    gene.gene_stable_id()
                );
            }
            first
        });
        genes.sort_by(|a, b| {
            (a.chr(), a.start(), a.stop(), a.gene_stable_id())
                .cmp(&(b.chr(), b.start(), b.stop(), b.gene_stable_id()))
        });

        let mut gene_index = HashMap::with_capacity(genes.len());
        let mut transcript_index = HashMap::new();
        for (gene_idx, gene) in genes.iter().enumerate() {
            gene_index.insert(gene.gene_stable_id().clone(), gene_idx);
            for (tr_idx, transcript) in gene.transcripts().iter().enumerate() {
                if transcript_index.contains_key(transcript.transcript_stable_id()) {
                    warn!(
                        "Transcript id {} is used by more than one gene, \
                         keeping the first",
                        transcript.transcript_stable_id()
                    );
                    continue;
                }
                transcript_index.insert(
                    transcript.transcript_stable_id().clone(),
                    (gene_idx, tr_idx),
                );
            }
        }
        let imap = genes
            .iter()
            .enumerate()
            .map(|(idx, gene)| (gene.contig().clone(), idx))
            .collect();

        Self {
            genes,
            gene_index,
            transcript_index,
            imap,
        }
    }

    fn build_gene(
        store: &AnnotStore,
        entry: &GffEntry,
    ) -> anyhow::Result<Gene> {
        let gene_stable_id = stable_id(entry, "gene_id", GENE_ID_PREFIX);
        let name = entry_name(entry, &GENE_NAME_KEYS, &gene_stable_id);
        let biotype = entry
            .attributes
            .get_other_any(&GENE_BIOTYPE_KEYS)
            .unwrap_or(entry.feature_type.as_str())
            .to_string();
        let mut gene = Gene::new(gene_stable_id.clone(), name, entry.contig.clone(), biotype);

        for child in children_of(store, entry)
            .filter(|c| !NON_TRANSCRIPT_TYPES.contains(&c.feature_type.as_str()))
        {
            let transcript = Self::build_transcript(store, child, &gene_stable_id)?;
            gene.add_transcript(transcript)
                .with_context(|| format!("Invalid transcript in gene {}", gene_stable_id))?;
        }
        if gene.transcripts().is_empty() {
            debug!("Gene {} has no transcripts", gene_stable_id);
        }
        Ok(gene)
    }

    fn build_transcript(
        store: &AnnotStore,
        entry: &GffEntry,
        gene_stable_id: &GkSmallStr,
    ) -> anyhow::Result<Transcript> {
        let transcript_stable_id =
            stable_id(entry, "transcript_id", TRANSCRIPT_ID_PREFIX);
        let name = entry_name(entry, &TRANSCRIPT_NAME_KEYS, &transcript_stable_id);
        let biotype = match entry
            .attributes
            .get_other_any(&TRANSCRIPT_BIOTYPE_KEYS)
        {
            Some(biotype) => biotype.to_string(),
            None if entry.feature_type == "mRNA" => PROTEIN_CODING.to_string(),
            None => entry.feature_type.clone(),
        };

        let (exons, exon_ids): (Vec<Interval>, Vec<GkSmallStr>) = children_of(store, entry)
            .filter(|c| c.feature_type == EXON_TYPE)
            .map(|exon| {
                let exon_id = exon
                    .attributes
                    .get_other("exon_id")
                    .map(GkSmallStr::from)
                    .unwrap_or_else(|| exon.id.clone());
                (exon.contig.bounds(), exon_id)
            })
            .unzip();

        Transcript::new(
            transcript_stable_id,
            gene_stable_id.clone(),
            name,
            entry.contig.clone(),
            biotype,
        )
        .with_exons(exons, exon_ids)
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Transcripts over all genes, duplicated ids included.
    pub fn n_transcripts(&self) -> usize {
        self.genes
            .iter()
            .map(|gene| gene.transcripts().len())
            .sum()
    }

    pub fn get_gene(
        &self,
        gene_stable_id: &str,
    ) -> Option<&Gene> {
        self.gene_index
            .get(&GkSmallStr::from(gene_stable_id))
            .map(|idx| &self.genes[*idx])
    }

    pub fn get_transcript(
        &self,
        transcript_stable_id: &str,
    ) -> Option<&Transcript> {
        self.transcript_index
            .get(&GkSmallStr::from(transcript_stable_id))
            .map(|(gene_idx, tr_idx)| &self.genes[*gene_idx].transcripts()[*tr_idx])
    }

    /// Gene owning a transcript.
    pub fn gene_of(
        &self,
        transcript: &Transcript,
    ) -> Option<&Gene> {
        self.get_gene(transcript.gene_stable_id())
    }

    /// Genes overlapping `contig` on either strand, in genomic order.
    pub fn genes_overlapping(
        &self,
        contig: &Contig,
    ) -> Vec<&Gene> {
        self.imap
            .find(contig)
            .into_iter()
            .sorted()
            .map(|idx| &self.genes[*idx])
            .collect()
    }

    /// Introns of every gene, computed on the crate thread pool.
    pub fn gene_introns(&self) -> anyhow::Result<Vec<(&Gene, Vec<Interval>)>> {
        THREAD_POOL.install(|| {
            self.genes
                .par_iter()
                .map(|gene| gene.introns().map(|introns| (gene, introns)))
                .collect()
        })
    }

    /// Introns of every transcript, bounded by their gene.
    pub fn transcript_introns(
        &self,
    ) -> anyhow::Result<Vec<(&Gene, &Transcript, Vec<Interval>)>> {
        THREAD_POOL.install(|| {
            self.genes
                .par_iter()
                .flat_map_iter(|gene| {
                    gene.transcripts().iter().map(move |transcript| {
                        gene.introns_of(transcript)
                            .map(|introns| (gene, transcript, introns))
                    })
                })
                .collect()
        })
    }

    /// Promoter windows of all genes.
    pub fn promoters(
        &self,
        upstream: PosType,
        downstream: PosType,
    ) -> Vec<(&Gene, Contig)> {
        self.genes
            .iter()
            .map(|gene| (gene, gene.promoter(upstream, downstream)))
            .collect()
    }

    /// One row per gene, including TSS/TES and the transcript count.
    pub fn genes_frame(&self) -> PolarsResult<DataFrame> {
        let genes = &self.genes;
        df!(
            "gene_stable_id" => genes.iter().map(|g| g.gene_stable_id().to_string()).collect_vec(),
            "name" => genes.iter().map(|g| g.name().clone()).collect_vec(),
            "chr" => genes.iter().map(|g| g.chr().to_string()).collect_vec(),
            "start" => genes.iter().map(Gene::start).collect_vec(),
            "stop" => genes.iter().map(Gene::stop).collect_vec(),
            "strand" => genes.iter().map(|g| g.strand().as_int()).collect_vec(),
            "biotype" => genes.iter().map(|g| g.biotype().clone()).collect_vec(),
            "tss" => genes.iter().map(Gene::tss).collect_vec(),
            "tes" => genes.iter().map(Gene::tes).collect_vec(),
            "transcript_count" => genes.iter().map(|g| g.transcripts().len() as u32).collect_vec()
        )
    }

    /// One row per transcript.
    pub fn transcripts_frame(&self) -> PolarsResult<DataFrame> {
        let transcripts = self
            .genes
            .iter()
            .flat_map(|g| g.transcripts().iter())
            .collect_vec();
        df!(
            "transcript_stable_id" => transcripts.iter().map(|t| t.transcript_stable_id().to_string()).collect_vec(),
            "gene_stable_id" => transcripts.iter().map(|t| t.gene_stable_id().to_string()).collect_vec(),
            "name" => transcripts.iter().map(|t| t.name().clone()).collect_vec(),
            "chr" => transcripts.iter().map(|t| t.chr().to_string()).collect_vec(),
            "start" => transcripts.iter().map(|t| t.start()).collect_vec(),
            "stop" => transcripts.iter().map(|t| t.stop()).collect_vec(),
            "strand" => transcripts.iter().map(|t| t.strand().as_int()).collect_vec(),
            "biotype" => transcripts.iter().map(|t| t.biotype().clone()).collect_vec(),
            "exon_count" => transcripts.iter().map(|t| t.exon_count() as u32).collect_vec(),
            "spliced_length" => transcripts.iter().map(|t| t.spliced_length()).collect_vec()
        )
    }

    /// Writes [`GeneModelStore::genes_frame`] as a tab separated table.
    pub fn write_genes_tsv<W: Write>(
        &self,
        sink: W,
    ) -> anyhow::Result<()> {
        let mut df = self.genes_frame()?;
        CsvWriter::new(sink)
            .include_header(true)
            .with_separator(b'\t')
            .finish(&mut df)?;
        Ok(())
    }

    /// Writes every gene with its transcripts and exons as one JSON object
    /// per line.
    pub fn write_genes_json<W: Write>(
        &self,
        mut sink: W,
    ) -> anyhow::Result<usize> {
        for gene in self.genes.iter() {
            serde_json::to_writer(&mut sink, gene)?;
            sink.write_all(b"\n")?;
        }
        sink.flush()?;
        Ok(self.genes.len())
    }
}

/// Children of `entry` in genomic order.
fn children_of<'a>(
    store: &'a AnnotStore,
    entry: &GffEntry,
) -> impl Iterator<Item = &'a GffEntry> {
    store
        .get_children(&entry.id)
        .into_iter()
        .flatten()
        .filter_map(|id| store.get(id))
        .sorted_by_key(|c| (c.contig.start(), c.contig.end()))
}

use std::io::Write;

use clap::{
    Args,
    ValueEnum,
};
use genomekit::prelude::*;
use itertools::Itertools;
use log::info;

use crate::utils::{
    AnnotArgs,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ExonMode {
    /// Exons of all isoforms merged where they overlap.
    Merged,
    /// Every exon of every isoform.
    Overlapping,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ExonsArgs {
    #[clap(flatten)]
    annot: AnnotArgs,

    #[arg(short, long, value_enum, default_value_t = ExonMode::Merged)]
    mode: ExonMode,

    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Only use transcripts with protein_coding biotype."
    )]
    protein_coding: bool,
}

impl ExonsArgs {
    fn exons_of(
        &self,
        gene: &Gene,
    ) -> Vec<Interval> {
        match (self.mode, self.protein_coding) {
            (ExonMode::Merged, false) => gene.exons_merged(),
            (ExonMode::Merged, true) => gene.exons_protein_coding_merged(),
            (ExonMode::Overlapping, false) => gene.exons_overlapping(),
            (ExonMode::Overlapping, true) => gene.exons_protein_coding_overlapping(),
        }
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let models = self.annot.load_models(utils)?;
        let regions = intervals_to_regions(
            models
                .genes()
                .iter()
                .map(|gene| (gene.contig(), gene.gene_stable_id(), self.exons_of(gene)))
                .collect_vec(),
        );

        let mut sink = self.annot.sink()?;
        let written = write_bed(&mut sink, regions)?;
        sink.flush()?;
        info!("Wrote {} exons", written);
        Ok(())
    }
}

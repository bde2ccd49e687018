use std::io::Write;

use clap::{
    Args,
    ValueEnum,
};
use genomekit::prelude::*;
use log::info;

use crate::utils::{
    AnnotArgs,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum GenesOutput {
    /// BED6, one line per gene named by its stable id.
    Bed,
    /// Gene table with TSS/TES and transcript counts.
    Tsv,
    /// One JSON object per gene, transcripts and exons included.
    Json,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct GenesArgs {
    #[clap(flatten)]
    annot: AnnotArgs,

    #[arg(
        short = 'T',
        long = "type",
        value_enum,
        default_value_t = GenesOutput::Bed,
        help = "Output type."
    )]
    output_type: GenesOutput,
}

impl GenesArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let models = self.annot.load_models(utils)?;
        let mut sink = self.annot.sink()?;

        match self.output_type {
            GenesOutput::Bed => {
                let written = write_bed(
                    &mut sink,
                    models
                        .genes()
                        .iter()
                        .map(|gene| (gene.contig().clone(), gene.gene_stable_id().to_string())),
                )?;
                info!("Wrote {} genes", written);
            },
            GenesOutput::Tsv => models.write_genes_tsv(&mut sink)?,
            GenesOutput::Json => {
                let written = models.write_genes_json(&mut sink)?;
                info!("Wrote {} genes", written);
            },
        }
        sink.flush()?;
        Ok(())
    }
}

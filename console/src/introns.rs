use std::io::Write;

use clap::Args;
use genomekit::prelude::*;
use log::info;

use crate::utils::{
    AnnotArgs,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct IntronsArgs {
    #[clap(flatten)]
    annot: AnnotArgs,

    #[arg(
        long,
        default_value_t = false,
        help = "Report introns of every transcript instead of gene level introns."
    )]
    per_transcript: bool,
}

impl IntronsArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let models = self.annot.load_models(utils)?;

        let regions = if self.per_transcript {
            intervals_to_regions(
                models
                    .transcript_introns()?
                    .into_iter()
                    .map(|(_, transcript, introns)| {
                        (transcript.contig(), transcript.transcript_stable_id(), introns)
                    }),
            )
        }
        else {
            intervals_to_regions(
                models
                    .gene_introns()?
                    .into_iter()
                    .map(|(gene, introns)| (gene.contig(), gene.gene_stable_id(), introns)),
            )
        };

        let mut sink = self.annot.sink()?;
        let written = write_bed(&mut sink, regions)?;
        sink.flush()?;
        info!("Wrote {} introns", written);
        Ok(())
    }
}

use std::io::Write;

use clap::Args;
use genomekit::prelude::*;
use log::info;

use crate::utils::{
    AnnotArgs,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct PromotersArgs {
    #[clap(flatten)]
    annot: AnnotArgs,

    #[arg(
        short,
        long,
        default_value_t = 1000,
        help = "Bases upstream of the TSS."
    )]
    upstream: PosType,

    #[arg(
        short,
        long,
        default_value_t = 500,
        help = "Bases downstream of the TSS."
    )]
    downstream: PosType,
}

impl PromotersArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let models = self.annot.load_models(utils)?;
        let promoters = models
            .promoters(self.upstream, self.downstream)
            .into_iter()
            .map(|(gene, promoter)| (promoter, gene.gene_stable_id().to_string()));

        let mut sink = self.annot.sink()?;
        let written = write_bed(&mut sink, promoters)?;
        sink.flush()?;
        info!("Wrote {} promoters", written);
        Ok(())
    }
}

mod exons;
mod genes;
mod introns;
mod promoters;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use exons::ExonsArgs;
use genes::GenesArgs;
use introns::IntronsArgs;
use promoters::PromotersArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,

    #[clap(flatten)]
    utils: UtilsArgs,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Gene records as BED, TSV or JSON lines.
    Genes(GenesArgs),
    /// Merged or per-isoform exons as BED.
    Exons(ExonsArgs),
    /// Gene or transcript introns as BED.
    Introns(IntronsArgs),
    /// Strand-aware promoter windows around each TSS as BED.
    Promoters(PromotersArgs),
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);
    let utils = cli.utils;
    utils.setup()?;

    match cli.command {
        MainMenu::Genes(args) => args.run(&utils)?,
        MainMenu::Exons(args) => args.run(&utils)?,
        MainMenu::Introns(args) => args.run(&utils)?,
        MainMenu::Promoters(args) => args.run(&utils)?,
    }
    Ok(())
}

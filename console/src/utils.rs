use std::fs::File;
use std::io::{
    stdout,
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use anyhow::bail;
use clap::{
    Args,
    ValueEnum,
};
use console::style;
use genomekit::prelude::*;
use genomekit::utils::NUM_THREADS_ENV;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::{
    info,
    LevelFilter,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 't',
        long,
        global = true,
        help_heading = "UTILS",
        help = "Number of worker threads. All available cores when unset."
    )]
    pub threads: Option<usize>,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help_heading = "UTILS",
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)."
    )]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        default_value_t = false,
        help_heading = "UTILS",
        help = "Display a progress spinner."
    )]
    pub progress: bool,
}

impl UtilsArgs {
    /// Configures logging and the worker thread count. Has to run before
    /// the first parallel operation.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .try_init()?;

        if let Some(threads) = self.threads {
            if threads == 0 {
                bail!("Number of threads must be positive")
            }
            std::env::set_var(NUM_THREADS_ENV, threads.to_string());
            std::env::set_var("POLARS_MAX_THREADS", threads.to_string());
        }
        info!("Using {} threads", genomekit::utils::n_threads());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliAnnotFormat {
    Gff,
    Gtf,
}

impl From<CliAnnotFormat> for AnnotFormat {
    fn from(value: CliAnnotFormat) -> Self {
        match value {
            CliAnnotFormat::Gff => AnnotFormat::Gff,
            CliAnnotFormat::Gtf => AnnotFormat::Gtf,
        }
    }
}

/// Input and output shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct AnnotArgs {
    #[arg(required = true, help = "Path to a GFF3 or GTF annotation file")]
    pub annotation: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        help = "Annotation format. Guessed from the file extension when unset."
    )]
    pub format: Option<CliAnnotFormat>,

    #[arg(short, long, help = "Output path. Standard output when unset.")]
    pub output: Option<PathBuf>,
}

impl AnnotArgs {
    /// Reads gene models from the annotation, showing a spinner meanwhile.
    pub fn load_models(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<GeneModelStore> {
        validate_input(&self.annotation)?;
        let spinner = init_spinner(utils.progress)?;
        spinner.set_message(format!("Reading {}", self.annotation.display()));

        let models =
            GeneModelStore::from_path(&self.annotation, self.format.map(AnnotFormat::from))?;

        spinner.finish_with_message(format!(
            "Read {} genes, {} transcripts",
            models.len(),
            models.n_transcripts()
        ));
        Ok(models)
    }

    pub fn sink(&self) -> anyhow::Result<Box<dyn Write>> {
        match self.output.as_ref() {
            Some(path) => {
                validate_output(path)?;
                Ok(Box::new(BufWriter::new(File::create(path)?)))
            },
            None => Ok(Box::new(BufWriter::new(stdout().lock()))),
        }
    }
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("Path {} does not exist", style(path.display()).red())
    }
    if !path.is_file() {
        bail!("Path {} is not a file", style(path.display()).red())
    }
    Ok(())
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!("Output path {} is a directory", style(path.display()).red())
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            bail!(
                "Output directory {} does not exist",
                style(parent.display()).red()
            )
        }
    }
    Ok(())
}

pub(crate) fn init_spinner(visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} [{elapsed_precise}] {msg}")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

//! # genomekit
//!
//! `genomekit` provides gene models and the interval arithmetic around
//! them: merging exons of overlapping isoforms, computing the introns of a
//! gene or of a single transcript, TSS/TES and promoter windows, all on
//! top of annotations read from GFF3 or GTF files.
//!
//! ## Key Features
//!
//! * **Gene models**: [`Gene`] and [`Transcript`] with exon views (merged,
//!   overlapping, protein coding only) and introns.
//! * **Annotation IO**: a streaming GFF3/GTF reader ([`GffReader`]) that
//!   fills an [`AnnotStore`] with parent/child links resolved, and BED
//!   output through `bio-rs`.
//! * **Lookups**: [`GeneModelStore`] indexes genes by stable id and by
//!   position (rust-lapper interval trees per chromosome).
//! * **Tables**: gene and transcript tables as Polars `DataFrame`s.
//!
//! All coordinates are 0-based and half-open.
//!
//! The number of worker threads can be configured with the
//! `GENOMEKIT_NUM_THREADS` environment variable.
//!
//! ## Usage
//!
//! ```no_run
//! use genomekit::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let models = GeneModelStore::from_path("genes.gff3", None)?;
//!     let gene = models.get_gene("ENSG00000139618").expect("gene present");
//!
//!     println!("TSS of {} at {}", gene.name(), gene.tss_position());
//!     for (start, stop) in gene.introns()? {
//!         println!("intron {}-{}", start, stop);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Interval helpers
//!
//! ```
//! use genomekit::prelude::*;
//!
//! let merged = merge_exons(vec![(10, 20), (15, 30), (30, 40)]);
//! assert_eq!(merged, vec![(10, 30), (30, 40)]);
//!
//! let introns = intron_intervals_from_exons(&merged, 0, 50, false).unwrap();
//! assert_eq!(introns, vec![(0, 10), (40, 50)]);
//! ```

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var(utils::NUM_THREADS_ENV) {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod data_structs;
pub mod io;
pub mod prelude;
pub mod utils;

pub use crate::data_structs::annotation::{
    AnnotStore,
    GffEntry,
};
pub use crate::data_structs::gene::{
    Gene,
    Transcript,
};
pub use crate::data_structs::genome::GeneModelStore;
pub use crate::io::GffReader;

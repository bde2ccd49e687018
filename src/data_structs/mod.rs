//! Core data structures of the crate.
//!
//! - [`coords`]: genomic coordinates ([`Contig`](coords::Contig),
//!   [`GenomicPosition`](coords::GenomicPosition)) and the per-sequence
//!   interval index [`ContigIntervalMap`](coords::ContigIntervalMap).
//! - [`annotation`]: GFF3/GTF features ([`GffEntry`](annotation::GffEntry))
//!   and the parent/child aware [`AnnotStore`](annotation::AnnotStore).
//! - [`gene`]: [`Gene`](gene::Gene) and [`Transcript`](gene::Transcript)
//!   models with exon merging and intron computation.
//! - [`genome`]: [`GeneModelStore`](genome::GeneModelStore), all gene
//!   models of an annotation with id and position lookups.
//! - [`typedef`]: type aliases for positions, intervals and ids.

pub mod annotation;
pub mod coords;
pub mod enums;
pub mod gene;
pub mod genome;
pub mod typedef;

pub use enums::Strand;

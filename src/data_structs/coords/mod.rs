//! Genomic coordinates.
//!
//! - [`GenomicPosition`]: a single point on a genome, a sequence name plus a
//!   position.
//! - [`Contig`]: a region given by a sequence name, a start, an end and a
//!   strand. Coordinates are 0-based and half-open.
//! - [`ContigIntervalMap`]: per-sequence interval index used for overlap
//!   queries.

mod contig;
mod gpos;
mod interval_map;

pub use contig::Contig;
pub use gpos::GenomicPosition;
pub use interval_map::ContigIntervalMap;

#[cfg(test)]
mod tests;

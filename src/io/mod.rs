//! Annotation input (GFF3/GTF) and interval output (BED).

pub mod bed;
pub mod gff;

pub use bed::{
    intervals_to_regions,
    write_bed,
};
pub use gff::{
    AnnotFormat,
    GffReader,
};

//! Annotation features read from GFF3, GTF or BED and the store that links
//! them through their `Parent` relations.

mod annot_store;
mod gff_entry;

pub use annot_store::AnnotStore;
pub use gff_entry::{
    GffEntry,
    GffEntryAttributes,
    RawGffEntry,
};

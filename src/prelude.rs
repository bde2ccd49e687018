pub use crate::data_structs::annotation::{
    AnnotStore,
    GffEntry,
    GffEntryAttributes,
    RawGffEntry,
};
pub use crate::data_structs::coords::{
    Contig,
    ContigIntervalMap,
    GenomicPosition,
};
pub use crate::data_structs::gene::intervals::{
    intron_intervals_from_exons,
    merge_exons,
    merge_intervals,
    split_bounds,
};
pub use crate::data_structs::gene::{
    Gene,
    Transcript,
    PROTEIN_CODING,
};
pub use crate::data_structs::genome::GeneModelStore;
pub use crate::data_structs::typedef::{
    GkSmallStr,
    Interval,
    PosType,
};
pub use crate::data_structs::Strand;
pub use crate::io::{
    intervals_to_regions,
    write_bed,
    AnnotFormat,
    GffReader,
};

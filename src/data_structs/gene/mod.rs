//! Gene and transcript models together with the exon/intron interval
//! arithmetic they rely on.

pub mod intervals;
mod model;
mod transcript;

pub use model::Gene;
pub use transcript::{
    Transcript,
    PROTEIN_CODING,
};

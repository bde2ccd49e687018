use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    GkSmallStr,
    PosType,
};

/// A single base on a sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GenomicPosition {
    seqname:  GkSmallStr,
    position: PosType,
}

impl GenomicPosition {
    pub fn new(
        seqname: GkSmallStr,
        position: PosType,
    ) -> Self {
        Self { seqname, position }
    }

    pub fn seqname(&self) -> &GkSmallStr {
        &self.seqname
    }

    pub fn position(&self) -> PosType {
        self.position
    }

    /// Signed distance from `self` to `other`, `None` across sequences.
    pub fn distance_to(
        &self,
        other: &Self,
    ) -> Option<i64> {
        (self.seqname == other.seqname)
            .then(|| other.position as i64 - self.position as i64)
    }
}

impl PartialOrd for GenomicPosition {
    /// Positions on different sequences are not comparable.
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<std::cmp::Ordering> {
        (self.seqname == other.seqname).then(|| self.position.cmp(&other.position))
    }
}

impl Display for GenomicPosition {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}", self.seqname, self.position)
    }
}

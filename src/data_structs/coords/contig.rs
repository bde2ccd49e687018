use std::fmt::Display;

use anyhow::bail;
use serde::{
    Deserialize,
    Serialize,
};

use super::GenomicPosition;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    GkSmallStr,
    Interval,
    PosType,
};

/// A stranded region `[start, end)` on one sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contig {
    seqname: GkSmallStr,
    start:   PosType,
    end:     PosType,
    strand:  Strand,
}

impl Contig {
    /// # Panics
    ///
    /// If `start` is greater than `end`.
    pub fn new(
        seqname: GkSmallStr,
        start: PosType,
        end: PosType,
        strand: Strand,
    ) -> Self {
        assert!(
            start <= end,
            "Inverted interval on {}: start {} > end {}",
            seqname,
            start,
            end
        );
        Self {
            seqname,
            start,
            end,
            strand,
        }
    }

    /// Fallible version of [`Contig::new`].
    pub fn try_new(
        seqname: GkSmallStr,
        start: PosType,
        end: PosType,
        strand: Strand,
    ) -> anyhow::Result<Self> {
        if start > end {
            bail!(
                "Inverted interval on {}: start {} > end {}",
                seqname,
                start,
                end
            )
        }
        Ok(Self {
            seqname,
            start,
            end,
            strand,
        })
    }

    pub fn start(&self) -> PosType {
        self.start
    }

    pub fn end(&self) -> PosType {
        self.end
    }

    pub fn start_gpos(&self) -> GenomicPosition {
        GenomicPosition::new(self.seqname.clone(), self.start)
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn seqname(&self) -> &GkSmallStr {
        &self.seqname
    }

    pub fn length(&self) -> PosType {
        self.end - self.start
    }

    /// Bounds as a plain interval tuple.
    pub fn bounds(&self) -> Interval {
        (self.start, self.end)
    }

    /// Moves `start` left by `length`, stopping at 0. Strand is not
    /// considered.
    pub fn extend_upstream(
        &mut self,
        length: PosType,
    ) {
        self.start = self.start.saturating_sub(length);
    }

    pub fn extend_downstream(
        &mut self,
        length: PosType,
    ) {
        self.end = self.end.saturating_add(length);
    }

    /// `true` when this region lies inside `other`.
    pub fn is_in(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname == other.seqname
            && self.start >= other.start
            && self.end <= other.end
    }

    /// Checks if the two contigs share at least one base. Strand is ignored.
    pub fn intersects(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname == other.seqname
            && self.start < other.end
            && other.start < self.end
    }
}

impl TryFrom<&bio::io::bed::Record> for Contig {
    type Error = anyhow::Error;

    fn try_from(value: &bio::io::bed::Record) -> Result<Self, Self::Error> {
        let start = PosType::try_from(value.start())?;
        let end = PosType::try_from(value.end())?;
        Self::try_new(
            value.chrom().into(),
            start,
            end,
            value
                .strand()
                .map(Strand::from)
                .unwrap_or_default(),
        )
    }
}

impl From<&Contig> for bio::io::bed::Record {
    fn from(value: &Contig) -> Self {
        let mut record = bio::io::bed::Record::new();
        record.set_chrom(value.seqname.as_str());
        record.set_start(value.start as u64);
        record.set_end(value.end as u64);
        record
    }
}

impl PartialOrd for Contig {
    /// Orders disjoint regions of one sequence. Equal regions compare as
    /// equal; other overlapping regions and regions on different sequences
    /// are incomparable.
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<std::cmp::Ordering> {
        if self == other {
            return Some(std::cmp::Ordering::Equal);
        }
        if self.seqname != other.seqname || self.bounds() == other.bounds() {
            return None;
        }
        if self.start >= other.end {
            return Some(std::cmp::Ordering::Greater);
        }
        if self.end <= other.start {
            return Some(std::cmp::Ordering::Less);
        }
        None
    }
}

impl Eq for Contig {}

impl PartialEq for Contig {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname == other.seqname
            && self.start == other.start
            && self.end == other.end
            && self.strand == other.strand
    }
}

impl Display for Contig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{} ({})",
            self.seqname, self.start, self.end, self.strand
        )
    }
}

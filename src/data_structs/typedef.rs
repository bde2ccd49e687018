use smallstr::SmallString;

pub const SMALLSTR_SIZE: usize = 24;
/// Inline string used for sequence names and stable ids.
pub type GkSmallStr = SmallString<[u8; SMALLSTR_SIZE]>;
/// Genomic coordinate, 0-based.
pub type PosType = u32;
/// Half-open `[start, stop)` interval on a single sequence.
pub type Interval = (PosType, PosType);

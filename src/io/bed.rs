use std::io::Write;

use anyhow::Context;

use crate::data_structs::coords::Contig;
use crate::data_structs::typedef::{
    GkSmallStr,
    Interval,
};

/// Writes named regions as BED6 (score column set to 0).
pub fn write_bed<W, I, N>(
    sink: W,
    regions: I,
) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (Contig, N)>,
    N: AsRef<str>, {
    let mut writer = bio::io::bed::Writer::new(sink);
    let mut written = 0;
    for (contig, name) in regions {
        let mut record = bio::io::bed::Record::from(&contig);
        record.set_name(name.as_ref());
        record.set_score("0");
        record.push_aux(&contig.strand().to_string());
        writer
            .write(&record)
            .with_context(|| format!("Failed to write BED record for {}", contig))?;
        written += 1;
    }
    Ok(written)
}

/// Expands per-feature interval lists into BED regions named
/// `<feature>_<index>` on the feature's sequence and strand.
pub fn intervals_to_regions<'a, I>(features: I) -> Vec<(Contig, String)>
where
    I: IntoIterator<Item = (&'a Contig, &'a GkSmallStr, Vec<Interval>)>, {
    features
        .into_iter()
        .flat_map(|(contig, id, intervals)| {
            intervals
                .into_iter()
                .enumerate()
                .map(move |(idx, (start, stop))| {
                    (
                        Contig::new(contig.seqname().clone(), start, stop, contig.strand()),
                        format!("{}_{}", id, idx + 1),
                    )
                })
        })
        .collect()
}

//! Exon and intron interval arithmetic on a single sequence and strand.
//!
//! All intervals are half-open `(start, stop)` tuples.

use anyhow::bail;
use itertools::Itertools;

use crate::data_structs::typedef::{
    Interval,
    PosType,
};

/// Sorts exons and merges the ones that strictly overlap.
///
/// Book-ended exons (`start == previous stop`) are kept apart, so the
/// boundary between two adjacent exons survives the merge.
pub fn merge_exons(mut exons: Vec<Interval>) -> Vec<Interval> {
    exons.sort_unstable();
    let mut merged: Vec<Interval> = Vec::with_capacity(exons.len());
    for (start, stop) in exons {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(stop),
            _ => merged.push((start, stop)),
        }
    }
    merged
}

/// Sorts intervals and merges the ones that overlap or touch.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_unstable();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for (start, stop) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(stop),
            _ => merged.push((start, stop)),
        }
    }
    merged
}

/// Splits intervals into column form, `(starts, stops)`.
pub fn split_bounds(intervals: &[Interval]) -> (Vec<PosType>, Vec<PosType>) {
    intervals.iter().copied().unzip()
}

/// Gaps between exons inside `[gene_start, gene_stop)`.
///
/// With `merge` unset, overlapping exons are an error: callers that expect
/// overlaps (pooled exons of a whole gene) have to ask for merging.
pub fn intron_intervals_from_exons(
    exons: &[Interval],
    gene_start: PosType,
    gene_stop: PosType,
    merge: bool,
) -> anyhow::Result<Vec<Interval>> {
    if let Some((start, stop)) = exons
        .iter()
        .find(|(start, stop)| stop < start)
    {
        bail!("Inverted exon ({start}, {stop})")
    }

    let exons = if merge {
        merge_exons(exons.to_vec())
    }
    else {
        exons.iter().copied().sorted_unstable().collect_vec()
    };

    let mut introns = Vec::with_capacity(exons.len() + 1);
    let mut intron_start = gene_start;
    for (idx, (exon_start, exon_stop)) in exons.into_iter().enumerate() {
        if intron_start > exon_start {
            if idx == 0 {
                bail!(
                    "Exon ({exon_start}, {exon_stop}) starts before gene \
                     start {gene_start}"
                )
            }
            bail!(
                "Exon ({exon_start}, {exon_stop}) overlaps the previous exon \
                 ending at {intron_start}; these exons need merging"
            )
        }
        if exon_start > gene_stop {
            bail!(
                "Exon ({exon_start}, {exon_stop}) starts after gene stop \
                 {gene_stop}"
            )
        }
        if intron_start != exon_start {
            introns.push((intron_start, exon_start));
        }
        intron_start = exon_stop;
    }
    if intron_start < gene_stop {
        introns.push((intron_start, gene_stop));
    }
    Ok(introns)
}

use std::cmp::Ordering;

use super::*;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::GkSmallStr;

fn contig(
    chr: &str,
    start: u32,
    end: u32,
) -> Contig {
    Contig::new(chr.into(), start, end, Strand::None)
}

#[test]
fn test_contig_basics() {
    let c = Contig::new("chr1".into(), 100, 250, Strand::Reverse);
    assert_eq!(c.length(), 150);
    assert_eq!(c.bounds(), (100, 250));
    assert_eq!(c.to_string(), "chr1:100-250 (-)");
    assert_eq!(c.start_gpos(), GenomicPosition::new("chr1".into(), 100));
}

#[test]
#[should_panic]
fn test_contig_inverted_panics() {
    contig("chr1", 10, 5);
}

#[test]
fn test_contig_try_new_inverted() {
    assert!(Contig::try_new("chr1".into(), 10, 5, Strand::None).is_err());
}

#[test]
fn test_contig_extend_saturates() {
    let mut c = contig("chr1", 10, 20);
    c.extend_upstream(100);
    c.extend_downstream(5);
    assert_eq!(c.bounds(), (0, 25));
    c.extend_downstream(u32::MAX);
    assert_eq!(c.end(), u32::MAX);
}

#[test]
fn test_contig_relations() {
    let outer = contig("chr1", 0, 100);
    let inner = contig("chr1", 10, 20);
    let touching = contig("chr1", 100, 120);
    let other_chr = contig("chr2", 10, 20);

    assert!(inner.is_in(&outer));
    assert!(!outer.is_in(&inner));
    assert!(inner.intersects(&outer));
    assert!(!touching.intersects(&outer));
    assert!(!other_chr.intersects(&outer));

    assert_eq!(touching.partial_cmp(&outer), Some(Ordering::Greater));
    assert_eq!(outer.partial_cmp(&touching), Some(Ordering::Less));
    assert_eq!(inner.partial_cmp(&outer), None);
    assert_eq!(other_chr.partial_cmp(&inner), None);

    assert_eq!(inner.partial_cmp(&inner.clone()), Some(Ordering::Equal));
    let point = contig("chr1", 50, 50);
    assert_eq!(point.partial_cmp(&point.clone()), Some(Ordering::Equal));
    let reverse_point = Contig::new("chr1".into(), 50, 50, Strand::Reverse);
    assert_ne!(point, reverse_point);
    assert_eq!(point.partial_cmp(&reverse_point), None);
}

#[test]
fn test_contig_bed_conversion() {
    let c = contig("chrX", 5, 15);
    let record = bio::io::bed::Record::from(&c);
    assert_eq!(record.chrom(), "chrX");
    assert_eq!(record.start(), 5);
    assert_eq!(record.end(), 15);
    assert_eq!(Contig::try_from(&record).unwrap(), c);
}

#[test]
fn test_gpos_ordering() {
    let a = GenomicPosition::new("chr1".into(), 5);
    let b = GenomicPosition::new("chr1".into(), 9);
    let c = GenomicPosition::new("chr2".into(), 1);
    assert!(a < b);
    assert_eq!(a.partial_cmp(&c), None);
    assert_eq!(a.distance_to(&b), Some(4));
    assert_eq!(b.distance_to(&a), Some(-4));
    assert_eq!(a.distance_to(&c), None);
}

#[test]
fn test_interval_map_find() {
    let imap: ContigIntervalMap<u32> = vec![
        (contig("chr1", 0, 100), 1),
        (contig("chr1", 50, 150), 2),
        (contig("chr1", 200, 300), 3),
        (contig("chr2", 0, 10), 4),
    ]
    .into_iter()
    .collect();

    assert_eq!(imap.n_intervals(), 4);
    assert_eq!(imap.n_chr(), 2);
    assert_eq!(imap.chr_names(), vec![
        GkSmallStr::from("chr1"),
        GkSmallStr::from("chr2")
    ]);

    let mut hits = imap
        .find(&contig("chr1", 90, 210))
        .into_iter()
        .copied()
        .collect::<Vec<_>>();
    hits.sort();
    assert_eq!(hits, vec![1, 2, 3]);

    assert!(imap.find(&contig("chr1", 150, 200)).is_empty());
    assert!(imap.find(&contig("chrM", 0, 1000)).is_empty());
}

#[test]
fn test_interval_map_insert_and_union() {
    let mut left = ContigIntervalMap::new();
    left.insert(&contig("chr1", 0, 10), "a");
    let mut right = ContigIntervalMap::new();
    right.insert(&contig("chr1", 5, 15), "b");
    right.insert(&contig("chr9", 0, 5), "c");

    left.union(&right);
    assert_eq!(left.n_intervals(), 3);
    assert_eq!(left.find(&contig("chr1", 6, 7)).len(), 2);
    assert_eq!(left.find(&contig("chr9", 0, 1)), vec![&"c"]);
}

#[test]
fn test_strand_symbols() {
    assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
    assert_eq!("-1".parse::<Strand>().unwrap(), Strand::Reverse);
    assert_eq!(".".parse::<Strand>().unwrap(), Strand::None);
    assert_eq!(Strand::from('?'), Strand::None);
    assert_eq!(Strand::Reverse.to_string(), "-");
    assert_eq!(Strand::Reverse.as_int(), -1);
    assert_eq!(
        Strand::from(bio::bio_types::strand::Strand::from(Strand::Forward)),
        Strand::Forward
    );
}

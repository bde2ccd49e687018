use std::fs;
use std::io::{
    BufReader,
    Cursor,
};
use std::path::PathBuf;

use genomekit::prelude::*;
use itertools::Itertools;
use rstest::{
    fixture,
    rstest,
};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[fixture]
fn gff_models() -> GeneModelStore {
    GeneModelStore::from_path(data_path("annot.gff3"), None).unwrap()
}

#[fixture]
fn gtf_models() -> GeneModelStore {
    GeneModelStore::from_path(data_path("annot.gtf"), None).unwrap()
}

#[rstest]
fn test_gff3_models(gff_models: GeneModelStore) {
    assert_eq!(gff_models.len(), 4);
    assert_eq!(gff_models.n_transcripts(), 4);
    assert_eq!(
        gff_models
            .genes()
            .iter()
            .map(|g| g.gene_stable_id().to_string())
            .collect_vec(),
        vec!["G1", "G2", "G3", "G4"]
    );

    let g1 = gff_models.get_gene("G1").unwrap();
    assert_eq!(g1.name(), "alpha");
    assert_eq!(g1.biotype(), "protein_coding");
    assert_eq!(g1.contig().bounds(), (100, 1000));
    assert_eq!(g1.transcripts().len(), 2);

    let t1 = gff_models.get_transcript("T1").unwrap();
    assert_eq!(t1.name(), "alpha-201");
    assert!(t1.is_protein_coding());
    assert_eq!(t1.exons_tuples(), vec![(100, 200), (300, 400), (800, 900)]);
    assert_eq!(
        t1.exon_stable_ids()
            .iter()
            .map(|id| id.to_string())
            .collect_vec(),
        vec!["E1", "E2", "E3"]
    );
    assert_eq!(gff_models.gene_of(t1).map(Gene::name), Some(&"alpha".to_string()));

    let t2 = gff_models.get_transcript("T2").unwrap();
    assert_eq!(t2.biotype(), "lncRNA");

    let g3 = gff_models.get_gene("G3").unwrap();
    assert_eq!(g3.name(), "G3");
    assert_eq!(g3.biotype(), "snRNA");

    let g4 = gff_models.get_gene("G4").unwrap();
    assert_eq!(g4.biotype(), "pseudogene");
    assert_eq!(g4.strand(), Strand::None);
    assert!(g4.transcripts().is_empty());
    assert!(gff_models.get_gene("G5").is_none());
}

#[rstest]
fn test_gtf_matches_gff3(
    gff_models: GeneModelStore,
    gtf_models: GeneModelStore,
) {
    assert_eq!(gtf_models.len(), 2);
    for id in ["G1", "G2"] {
        assert_eq!(gtf_models.get_gene(id), gff_models.get_gene(id), "{}", id);
    }
}

#[rstest]
fn test_gene_views(gff_models: GeneModelStore) {
    let g1 = gff_models.get_gene("G1").unwrap();
    assert_eq!(g1.introns().unwrap(), vec![(250, 300), (450, 800)]);
    assert_eq!(g1.exons_protein_coding_merged(), vec![
        (100, 200),
        (300, 400),
        (800, 900)
    ]);
    let t2 = g1.transcript("T2").unwrap();
    assert_eq!(g1.introns_of(t2).unwrap(), vec![
        (100, 150),
        (250, 350),
        (450, 890)
    ]);

    let g2 = gff_models.get_gene("G2").unwrap();
    assert_eq!((g2.tss(), g2.tes()), (3000, 2000));
    assert_eq!(g2.introns().unwrap(), vec![(2100, 2900)]);
    assert!(g2.exons_protein_coding_overlapping().is_empty());

    let g3 = gff_models.get_gene("G3").unwrap();
    assert!(g3.introns().unwrap().is_empty());
}

#[rstest]
fn test_genes_overlapping(gff_models: GeneModelStore) {
    let query = Contig::new("chr1".into(), 950, 2001, Strand::Reverse);
    let ids = gff_models
        .genes_overlapping(&query)
        .into_iter()
        .map(|g| g.gene_stable_id().to_string())
        .collect_vec();
    assert_eq!(ids, vec!["G1", "G2"]);

    let gap = Contig::new("chr1".into(), 1000, 2000, Strand::None);
    assert!(gff_models.genes_overlapping(&gap).is_empty());
}

#[rstest]
fn test_promoters(gff_models: GeneModelStore) {
    let promoters = gff_models
        .promoters(150, 50)
        .into_iter()
        .map(|(gene, contig)| (gene.gene_stable_id().to_string(), contig.bounds()))
        .collect_vec();
    assert_eq!(promoters[0], ("G1".to_string(), (0, 150)));
    assert_eq!(promoters[1], ("G2".to_string(), (2950, 3150)));
}

#[rstest]
fn test_introns_bed(gff_models: GeneModelStore) {
    let introns = gff_models.gene_introns().unwrap();
    let regions = intervals_to_regions(
        introns
            .into_iter()
            .map(|(gene, introns)| (gene.contig(), gene.gene_stable_id(), introns)),
    );

    let mut buffer = Vec::new();
    let written = write_bed(&mut buffer, regions).unwrap();
    assert_eq!(written, 4);
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "chr1\t250\t300\tG1_1\t0\t+\n\
         chr1\t450\t800\tG1_2\t0\t+\n\
         chr1\t2100\t2900\tG2_1\t0\t-\n\
         chr2\t100\t200\tG4_1\t0\t.\n"
    );
}

#[rstest]
fn test_transcript_introns(gff_models: GeneModelStore) {
    let introns = gff_models.transcript_introns().unwrap();
    assert_eq!(introns.len(), 4);
    let (_, t3, t3_introns) = introns
        .iter()
        .find(|(_, t, _)| t.transcript_stable_id().as_str() == "T3")
        .unwrap();
    assert_eq!(t3.exon_count(), 2);
    assert_eq!(t3_introns, &vec![(2100, 2900)]);
}

#[rstest]
fn test_frames(gff_models: GeneModelStore) {
    let genes = gff_models.genes_frame().unwrap();
    assert_eq!(genes.shape(), (4, 10));
    let tss = genes
        .column("tss")
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect_vec();
    assert_eq!(tss, vec![100, 3000, 10, 200]);

    let transcripts = gff_models.transcripts_frame().unwrap();
    assert_eq!(transcripts.height(), 4);
    let spliced = transcripts
        .column("spliced_length")
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect_vec();
    assert_eq!(spliced, vec![300, 310, 200, 50]);
}

#[rstest]
fn test_write_genes_tsv(gff_models: GeneModelStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genes.tsv");
    gff_models
        .write_genes_tsv(fs::File::create(&path).unwrap())
        .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines = contents.lines().collect_vec();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "gene_stable_id\tname\tchr\tstart\tstop\tstrand\tbiotype\ttss\ttes\ttranscript_count"
    );
    assert_eq!(lines[1], "G1\talpha\tchr1\t100\t1000\t1\tprotein_coding\t100\t1000\t2");
    assert_eq!(lines[2], "G2\tbeta\tchr1\t2000\t3000\t-1\tlncRNA\t3000\t2000\t1");
}

#[test]
fn test_reader_stops_at_fasta() {
    let source = "chr1\tt\tgene\t1\t10\t.\t+\t.\tID=g1\n\
                  ##FASTA\n\
                  >chr1\n\
                  ACGT\n";
    let reader = GffReader::new(BufReader::new(Cursor::new(source)), AnnotFormat::Gff);
    let store = reader.read_store().unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("g1").unwrap().contig.bounds(), (0, 10));
}

#[test]
fn test_reader_reports_line_number() {
    let source = "##gff-version 3\n\
                  chr1\tt\tgene\t1\t10\t.\t+\t.\tID=g1\n\
                  chr1\tt\tgene\tone\t10\t.\t+\t.\tID=g2\n";
    let err = GffReader::new(Cursor::new(source), AnnotFormat::Gff)
        .read_store()
        .err()
        .unwrap();
    assert!(err.to_string().contains("line 3"), "{}", err);

    let short = "chr1\tt\tgene\t1\t10\n";
    assert!(GffReader::new(Cursor::new(short), AnnotFormat::Gff)
        .next()
        .unwrap()
        .is_err());
}

#[test]
fn test_gtf_without_gene_rows() {
    let source = "chr3\tt\texon\t1\t10\t.\t-\t.\tgene_id \"GX\"; transcript_id \"TX\"; exon_id \"EX1\";\n\
                  chr3\tt\texon\t21\t30\t.\t-\t.\tgene_id \"GX\"; transcript_id \"TX\"; exon_id \"EX2\";\n";
    let store = GffReader::new(Cursor::new(source), AnnotFormat::Gtf)
        .read_store()
        .unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.get("gene:GX").unwrap().contig.bounds(), (0, 30));

    let models = GeneModelStore::from_annot_store(&store).unwrap();
    let gene = models.get_gene("GX").unwrap();
    assert_eq!(gene.strand(), Strand::Reverse);
    assert_eq!(gene.introns().unwrap(), vec![(10, 20)]);
    assert_eq!(models.get_transcript("TX").unwrap().exon_count(), 2);
}

#[rstest]
fn test_write_genes_json(gff_models: GeneModelStore) {
    let mut buffer = Vec::new();
    assert_eq!(gff_models.write_genes_json(&mut buffer).unwrap(), 4);

    let genes = String::from_utf8(buffer)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Gene>(line).unwrap())
        .collect_vec();
    assert_eq!(genes.as_slice(), gff_models.genes());
    assert_eq!(genes[1].introns().unwrap(), vec![(2100, 2900)]);
}

#[test]
fn test_duplicate_transcript_ids_keep_first() {
    let gene = |id: &str, start: u32, stop: u32| {
        let gene = Gene::new(
            id.into(),
            id.to_string(),
            Contig::new("chr1".into(), start, stop, Strand::Forward),
            "protein_coding".to_string(),
        );
        let transcript = Transcript::new(
            "TDUP".into(),
            id.into(),
            format!("{}-201", id),
            Contig::new("chr1".into(), start, stop, Strand::Forward),
            "protein_coding".to_string(),
        )
        .with_exons(vec![(start, stop)], vec![])
        .unwrap();
        gene.with_transcripts(vec![transcript]).unwrap()
    };

    let models = GeneModelStore::from_genes(vec![
        gene("GA", 0, 100),
        gene("GB", 200, 300),
        gene("GA", 500, 600),
    ]);
    assert_eq!(models.len(), 2);
    assert_eq!(models.n_transcripts(), 2);
    assert_eq!(models.get_gene("GA").unwrap().contig().bounds(), (0, 100));
    let transcript = models.get_transcript("TDUP").unwrap();
    assert_eq!(transcript.gene_stable_id().as_str(), "GA");
    assert_eq!(transcript.name(), "GA-201");
}

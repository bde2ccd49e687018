use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;

use anyhow::{
    anyhow,
    bail,
    Context,
};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
};

use crate::data_structs::annotation::{
    AnnotStore,
    GffEntry,
    GffEntryAttributes,
    RawGffEntry,
};
use crate::data_structs::coords::Contig;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::GkSmallStr;

const N_COLUMNS: usize = 9;
const FASTA_DIRECTIVE: &str = "##FASTA";
pub const GENE_ID_PREFIX: &str = "gene:";
pub const TRANSCRIPT_ID_PREFIX: &str = "transcript:";
/// GTF attributes that describe a single exon and are not inherited by
/// synthesised parents.
const EXON_LEVEL_KEYS: [&str; 4] =
    ["exon_id", "exon_number", "exon_version", "protein_id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotFormat {
    /// GFF3, `key=value` attributes with `ID`/`Parent` links.
    Gff,
    /// GTF (GFF2 flavour), `key "value"` attributes with
    /// `gene_id`/`transcript_id` links.
    Gtf,
}

impl AnnotFormat {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()?
            .to_str()?
            .to_lowercase();
        match ext.as_str() {
            "gff" | "gff3" => Some(AnnotFormat::Gff),
            "gtf" | "gff2" => Some(AnnotFormat::Gtf),
            _ => None,
        }
    }
}

/// Streams [`GffEntry`] records out of a GFF3 or GTF source.
///
/// Comment and blank lines are skipped and reading stops at a `##FASTA`
/// directive. Coordinates are converted to 0-based half-open.
pub struct GffReader<R: BufRead> {
    reader:   R,
    format:   AnnotFormat,
    line_no:  usize,
    buf:      String,
    finished: bool,
}

impl GffReader<BufReader<File>> {
    /// Opens a file. Without an explicit `format` it is guessed from the
    /// extension.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<AnnotFormat>,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let format = format
            .or_else(|| AnnotFormat::from_path(path))
            .ok_or(anyhow!(
                "Cannot infer annotation format of {}, specify it explicitly",
                path.display()
            ))?;
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        debug!("Opened {} as {:?}", path.display(), format);
        Ok(Self::new(BufReader::new(file), format))
    }
}

impl<R: BufRead> GffReader<R> {
    pub fn new(
        reader: R,
        format: AnnotFormat,
    ) -> Self {
        Self {
            reader,
            format,
            line_no: 0,
            buf: String::new(),
            finished: false,
        }
    }

    pub fn format(&self) -> AnnotFormat {
        self.format
    }

    /// Reads every entry into an [`AnnotStore`]. For GTF input, transcripts
    /// and genes that only appear through their exons are synthesised.
    pub fn read_store(self) -> anyhow::Result<AnnotStore> {
        let format = self.format;
        let entries = self.collect::<anyhow::Result<Vec<GffEntry>>>()?;
        let n_read = entries.len();
        let mut store = AnnotStore::from_iter(entries);
        if format == AnnotFormat::Gtf {
            let added = synthesize_gtf_parents(&mut store);
            if added > 0 {
                info!("Synthesised {} missing gene/transcript records", added);
            }
        }
        info!(
            "Read {} annotation records ({} kept)",
            n_read,
            store.len()
        );
        Ok(store)
    }

    fn parse_line(
        &self,
        line: &str,
    ) -> anyhow::Result<GffEntry> {
        let fields = line.split('\t').collect_vec();
        if fields.len() != N_COLUMNS {
            bail!(
                "expected {} tab separated columns, found {}",
                N_COLUMNS,
                fields.len()
            )
        }
        let record = csv::StringRecord::from(fields);
        let raw: RawGffEntry = record.deserialize(None)?;
        match self.format {
            AnnotFormat::Gff => GffEntry::try_from(raw),
            AnnotFormat::Gtf => gtf_entry(raw),
        }
    }
}

impl<R: BufRead> Iterator for GffReader<R> {
    type Item = anyhow::Result<GffEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim_end_matches(['\n', '\r']);
                    if line.starts_with(FASTA_DIRECTIVE) {
                        self.finished = true;
                    }
                    else if line.trim().is_empty() || line.starts_with('#') {
                        continue;
                    }
                    else {
                        let line_no = self.line_no;
                        return Some(
                            self.parse_line(line)
                                .with_context(|| format!("Malformed annotation line {}", line_no)),
                        );
                    }
                },
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                },
            }
        }
        None
    }
}

fn prefixed(
    prefix: &str,
    id: &str,
) -> GkSmallStr {
    GkSmallStr::from(format!("{}{}", prefix, id).as_str())
}

/// Maps a GTF line onto the GFF3 id/parent model: genes become
/// `gene:<gene_id>`, transcripts `transcript:<transcript_id>` and every
/// other feature is a child of its transcript (or gene).
fn gtf_entry(raw: RawGffEntry) -> anyhow::Result<GffEntry> {
    if raw.start == 0 {
        bail!("GTF coordinates are 1-based, got start 0")
    }
    let mut attributes = GffEntryAttributes::from_gtf_str(&raw.attributes)?;
    let gene_id = attributes.get_other("gene_id").map(String::from);
    let transcript_id = attributes
        .get_other("transcript_id")
        .map(String::from);

    match raw.feature_type.as_str() {
        "gene" => {
            let gene_id = gene_id.ok_or(anyhow!("gene record without gene_id"))?;
            attributes.id = Some(prefixed(GENE_ID_PREFIX, &gene_id));
        },
        "transcript" => {
            let transcript_id = transcript_id
                .ok_or(anyhow!("transcript record without transcript_id"))?;
            attributes.id = Some(prefixed(TRANSCRIPT_ID_PREFIX, &transcript_id));
            attributes.parent = gene_id.map(|g| vec![prefixed(GENE_ID_PREFIX, &g)]);
        },
        _ => {
            attributes.parent = match (transcript_id, gene_id) {
                (Some(t), _) => Some(vec![prefixed(TRANSCRIPT_ID_PREFIX, &t)]),
                (None, Some(g)) => Some(vec![prefixed(GENE_ID_PREFIX, &g)]),
                (None, None) => None,
            };
        },
    }

    Ok(GffEntry::new(
        Contig::try_new(
            raw.seqid,
            raw.start - 1,
            raw.end,
            Strand::from(raw.strand),
        )?,
        Some(raw.source),
        Some(raw.feature_type),
        raw.score,
        raw.phase,
        Some(attributes),
    ))
}

/// Creates parent records referenced by GTF lines but absent from the file.
/// A synthesised record spans its children and inherits their
/// gene/transcript level attributes. Returns the number of records added.
fn synthesize_gtf_parents(store: &mut AnnotStore) -> usize {
    let mut added = 0;
    for (prefix, feature_type) in [
        (TRANSCRIPT_ID_PREFIX, "transcript"),
        (GENE_ID_PREFIX, "gene"),
    ] {
        let mut missing: HashMap<GkSmallStr, Vec<&GffEntry>> = HashMap::new();
        for (_, entry) in store.iter() {
            for parent in entry.parents() {
                if parent.starts_with(prefix) && store.get(parent).is_none() {
                    missing.entry(parent.clone()).or_default().push(entry);
                }
            }
        }

        let synthesized = missing
            .into_iter()
            .map(|(id, children)| synthesized_parent(id, feature_type, &children))
            .collect_vec();
        for entry in synthesized {
            if store.insert(entry).is_some() {
                added += 1;
            }
        }
    }
    added
}

fn synthesized_parent(
    id: GkSmallStr,
    feature_type: &str,
    children: &[&GffEntry],
) -> GffEntry {
    let template = children[0];
    let start = children
        .iter()
        .map(|c| c.contig.start())
        .min()
        .unwrap_or_default();
    let end = children
        .iter()
        .map(|c| c.contig.end())
        .max()
        .unwrap_or_default();

    let mut other = template.attributes.other.clone();
    other.retain(|k, _| !EXON_LEVEL_KEYS.contains(&k.as_str()));
    let parent = match feature_type {
        "transcript" => other
            .get("gene_id")
            .map(|g| vec![prefixed(GENE_ID_PREFIX, g)]),
        _ => None,
    };
    if feature_type == "gene" {
        other.retain(|k, _| !k.starts_with("transcript_"));
    }

    GffEntry::new(
        Contig::new(
            template.contig.seqname().clone(),
            start,
            end,
            template.contig.strand(),
        ),
        Some(template.source.clone()),
        Some(feature_type.to_string()),
        None,
        None,
        Some(
            GffEntryAttributes::default()
                .with_id(Some(id))
                .with_parent(parent)
                .with_other(other),
        ),
    )
}

use std::fmt;
use std::str::FromStr;

use anyhow::{
    anyhow,
    bail,
};
use hashbrown::HashMap;
use itertools::Itertools;
use nanoid::nanoid;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::coords::Contig;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    GkSmallStr,
    PosType,
};
use crate::with_field_fn;

/// Column 9 of a GFF3 line. GTF attributes are mapped onto the same type,
/// with every key landing in `other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GffEntryAttributes {
    pub id:            Option<GkSmallStr>,
    pub name:          Option<Vec<String>>,
    pub alias:         Option<Vec<String>>,
    pub parent:        Option<Vec<GkSmallStr>>,
    pub gap:           Option<Vec<String>>,
    pub derives_from:  Option<Vec<String>>,
    pub note:          Option<Vec<String>>,
    pub dbxref:        Option<Vec<String>>,
    pub ontology_term: Option<Vec<String>>,
    pub other:         HashMap<String, String>,
}

fn split_values<T: for<'a> From<&'a str>>(value: Option<&str>) -> Option<Vec<T>> {
    value.map(|s| s.split(',').map(T::from).collect())
}

/// Splits on `sep` outside double-quoted runs.
fn split_unquoted(
    s: &str,
    sep: char,
) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut begin = 0;
    for (idx, c) in s.char_indices() {
        if c == '"' {
            quoted = !quoted;
        }
        else if c == sep && !quoted {
            parts.push(&s[begin..idx]);
            begin = idx + c.len_utf8();
        }
    }
    parts.push(&s[begin..]);
    parts
}

impl GffEntryAttributes {
    /// Sets the ID attribute.
    pub fn with_id<S: Into<GkSmallStr>>(
        mut self,
        id: Option<S>,
    ) -> Self {
        self.id = id.map(|s| s.into());
        self
    }

    /// Sets the Parent attribute.
    pub fn with_parent<S: Into<GkSmallStr>>(
        mut self,
        parent: Option<Vec<S>>,
    ) -> Self {
        self.parent = parent.map(|v| {
            v.into_iter()
                .map(|s| s.into())
                .collect()
        });
        self
    }

    with_field_fn!(name, Option<Vec<String>>);

    with_field_fn!(note, Option<Vec<String>>);

    with_field_fn!(other, HashMap<String, String>);

    /// First value of `Name`.
    pub fn first_name(&self) -> Option<&str> {
        self.name
            .as_ref()
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Value of an attribute outside the GFF3 reserved set.
    pub fn get_other(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.other.get(key).map(String::as_str)
    }

    /// First present value among `keys`.
    pub fn get_other_any(
        &self,
        keys: &[&str],
    ) -> Option<&str> {
        keys.iter().find_map(|k| self.get_other(k))
    }

    /// Parses GTF column 9: `key "value"; key2 "value2";`.
    ///
    /// Repeated keys (e.g. `tag`) are joined with commas.
    pub fn from_gtf_str(s: &str) -> anyhow::Result<Self> {
        let mut attributes = GffEntryAttributes::default();
        for pair in split_unquoted(s, ';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Missing value for GTF attribute '{}'", pair))?;
            let value = value.trim().trim_matches('"');
            attributes
                .other
                .entry(key.to_string())
                .and_modify(|old| {
                    old.push(',');
                    old.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        Ok(attributes)
    }
}

fn push_values<T: fmt::Display>(
    pairs: &mut Vec<String>,
    key: &str,
    values: &Option<Vec<T>>,
) {
    if let Some(values) = values {
        pairs.push(format!("{}={}", key, values.iter().join(",")));
    }
}

/// Serialises in GFF3 order: `ID` first, then the reserved attributes, then
/// the remaining keys alphabetically.
impl fmt::Display for GffEntryAttributes {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut pairs = Vec::with_capacity(4 + self.other.len());
        if let Some(id) = self.id.as_ref() {
            pairs.push(format!("ID={}", id));
        }
        push_values(&mut pairs, "Name", &self.name);
        push_values(&mut pairs, "Alias", &self.alias);
        push_values(&mut pairs, "Parent", &self.parent);
        push_values(&mut pairs, "Gap", &self.gap);
        push_values(&mut pairs, "Derives_from", &self.derives_from);
        push_values(&mut pairs, "Note", &self.note);
        push_values(&mut pairs, "Dbxref", &self.dbxref);
        push_values(&mut pairs, "Ontology_term", &self.ontology_term);
        pairs.extend(
            self.other
                .iter()
                .sorted_unstable_by_key(|(k, _)| *k)
                .map(|(k, v)| format!("{}={}", k, v)),
        );
        f.write_str(&pairs.join(";"))
    }
}

/// Parses GFF3 column 9. Keys without a value are dropped.
impl FromStr for GffEntryAttributes {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attributes = GffEntryAttributes::default();
        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (pair, None),
            };
            if key.is_empty() {
                bail!("Missing key in attribute '{}'", pair)
            }

            match key {
                "ID" => attributes.id = value.map(GkSmallStr::from),
                "Name" => attributes.name = split_values(value),
                "Alias" => attributes.alias = split_values(value),
                "Parent" => attributes.parent = split_values(value),
                "Gap" => attributes.gap = split_values(value),
                "Derives_from" => attributes.derives_from = split_values(value),
                "Note" => attributes.note = split_values(value),
                "Dbxref" => attributes.dbxref = split_values(value),
                "Ontology_term" => attributes.ontology_term = split_values(value),
                _ => {
                    if let Some(value) = value {
                        attributes.other.insert(key.to_owned(), value.to_owned());
                    }
                },
            }
        }

        Ok(attributes)
    }
}

/// One GFF line as it appears on disk: 1-based closed coordinates and an
/// unparsed attribute column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGffEntry {
    pub seqid:        GkSmallStr,
    pub source:       String,
    pub feature_type: String,
    pub start:        PosType,
    pub end:          PosType,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub score:        Option<f64>,
    pub strand:       char,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub phase:        Option<u8>,
    pub attributes:   String,
}

/// Annotation feature with 0-based half-open coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GffEntry {
    pub contig:       Contig,
    pub source:       String,
    pub feature_type: String,
    pub score:        Option<f64>,
    pub phase:        Option<u8>,
    pub attributes:   GffEntryAttributes,
    pub id:           GkSmallStr,
}

impl GffEntry {
    /// Creates an entry. Without an `ID` attribute a random id is assigned.
    pub fn new(
        contig: Contig,
        source: Option<String>,
        feature_type: Option<String>,
        score: Option<f64>,
        phase: Option<u8>,
        attributes: Option<GffEntryAttributes>,
    ) -> Self {
        let attributes = attributes.unwrap_or_default();
        let id = attributes
            .id
            .clone()
            .unwrap_or_else(|| GkSmallStr::from(nanoid!(16).as_str()));
        Self {
            contig,
            score,
            phase,
            id,
            attributes,
            source: source.unwrap_or_default(),
            feature_type: feature_type.unwrap_or_default(),
        }
    }

    pub fn parents(&self) -> &[GkSmallStr] {
        self.attributes
            .parent
            .as_deref()
            .unwrap_or_default()
    }
}

impl TryFrom<bio::io::bed::Record> for GffEntry {
    type Error = anyhow::Error;

    fn try_from(value: bio::io::bed::Record) -> Result<Self, Self::Error> {
        let contig = Contig::try_from(&value)?;
        let attributes = value
            .name()
            .map(|name| GffEntryAttributes::default().with_id(Some(name)));
        Ok(Self::new(
            contig,
            None,
            None,
            value
                .score()
                .map(|s| s.parse::<f64>().unwrap_or(f64::NAN)),
            None,
            attributes,
        ))
    }
}

impl TryFrom<RawGffEntry> for GffEntry {
    type Error = anyhow::Error;

    fn try_from(value: RawGffEntry) -> Result<Self, Self::Error> {
        if value.start == 0 {
            bail!("GFF coordinates are 1-based, got start 0")
        }
        let attributes =
            GffEntryAttributes::from_str(value.attributes.as_str())?;

        Ok(GffEntry::new(
            Contig::try_new(
                value.seqid,
                value.start - 1,
                value.end,
                Strand::from(value.strand),
            )?,
            Some(value.source),
            Some(value.feature_type),
            value.score,
            value.phase,
            Some(attributes),
        ))
    }
}

impl From<&GffEntry> for RawGffEntry {
    fn from(value: &GffEntry) -> Self {
        RawGffEntry {
            seqid:        value.contig.seqname().clone(),
            source:       value.source.clone(),
            feature_type: value.feature_type.clone(),
            start:        value.contig.start() + 1,
            end:          value.contig.end(),
            score:        value.score,
            strand:       value.contig.strand().into(),
            phase:        value.phase,
            attributes:   value.attributes.to_string(),
        }
    }
}

impl fmt::Display for RawGffEntry {
    /// Formats as a tab separated GFF3 line, `.` for missing values.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let score = self
            .score
            .map(|s| s.to_string())
            .unwrap_or(".".to_string());
        let phase = self
            .phase
            .map(|p| p.to_string())
            .unwrap_or(".".to_string());
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqid,
            if self.source.is_empty() { "." } else { self.source.as_str() },
            self.feature_type,
            self.start,
            self.end,
            score,
            self.strand,
            phase,
            self.attributes
        )
    }
}

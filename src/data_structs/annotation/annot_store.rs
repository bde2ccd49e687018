use anyhow::anyhow;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    warn,
};
use multimap::MultiMap;
use regex_lite::Regex;

use crate::data_structs::annotation::{
    GffEntry,
    GffEntryAttributes,
};
use crate::data_structs::coords::{
    Contig,
    ContigIntervalMap,
};
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    GkSmallStr,
    PosType,
};

const UPSTREAM_TYPE_NAME: &str = "upstream";
const DOWNSTREAM_TYPE_NAME: &str = "downstream";

/// Annotation features indexed by id, with the `Parent` relations resolved
/// in both directions.
#[derive(Default)]
pub struct AnnotStore {
    id_map:       HashMap<GkSmallStr, GffEntry>,
    parent_map:   MultiMap<GkSmallStr, GkSmallStr>,
    children_map: MultiMap<GkSmallStr, GkSmallStr>,
    imap:         Option<ContigIntervalMap<GkSmallStr>>,
}

impl AnnotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. Returns `None` and leaves the store untouched when
    /// the id is already taken.
    pub fn insert(
        &mut self,
        entry: GffEntry,
    ) -> Option<()> {
        if self.id_map.contains_key(&entry.id) {
            warn!("Duplicate annotation id {}, entry skipped", entry.id);
            return None;
        }
        for parent in entry.parents() {
            self.parent_map
                .insert(entry.id.clone(), parent.to_owned());
            self.children_map
                .insert(parent.to_owned(), entry.id.clone());
        }
        if let Some(imap) = self.imap.as_mut() {
            imap.insert(&entry.contig, entry.id.clone());
        }
        self.id_map.insert(entry.id.clone(), entry);
        Some(())
    }

    /// Removes an entry and its links. Children keep their `Parent`
    /// attribute but are no longer reachable through this id.
    pub fn remove(
        &mut self,
        id: &GkSmallStr,
    ) -> Option<GffEntry> {
        let removed = self.id_map.remove(id)?;
        for parent in self.parent_map.remove(id).unwrap_or_default() {
            if let Some(siblings) = self.children_map.get_vec_mut(&parent) {
                siblings.retain(|c| c != id);
            }
        }
        for child in self.children_map.remove(id).unwrap_or_default() {
            if let Some(parents) = self.parent_map.get_vec_mut(&child) {
                parents.retain(|p| p != id);
            }
        }
        if self.imap.take().is_some() {
            debug!("Interval map dropped after removing {}", id);
        }
        Some(removed)
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&GffEntry> {
        self.id_map.get(&GkSmallStr::from(id))
    }

    pub fn get_parents(
        &self,
        id: &GkSmallStr,
    ) -> Option<&Vec<GkSmallStr>> {
        self.parent_map.get_vec(id)
    }

    pub fn get_children(
        &self,
        id: &GkSmallStr,
    ) -> Option<&Vec<GkSmallStr>> {
        self.children_map.get_vec(id)
    }

    /// Entries without a resolvable parent.
    pub fn roots(&self) -> impl Iterator<Item = &GffEntry> {
        self.id_map.values().filter(|entry| {
            entry
                .parents()
                .iter()
                .all(|p| !self.id_map.contains_key(p))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GkSmallStr, &GffEntry)> {
        self.id_map.iter()
    }

    /// Entries ordered by sequence name, then start, then end.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &GffEntry> {
        self.id_map
            .values()
            .sorted_by_cached_key(|entry| {
                (
                    entry.contig.seqname().clone(),
                    entry.contig.start(),
                    entry.contig.end(),
                )
            })
    }

    pub fn get_feature_types(&self) -> Vec<String> {
        self.id_map
            .values()
            .map(|entry| entry.feature_type.clone())
            .unique()
            .sorted()
            .collect()
    }

    /// Entries whose id matches `pattern`.
    pub fn get_entries_regex(
        &self,
        pattern: &str,
    ) -> anyhow::Result<Vec<&GffEntry>> {
        let re = Regex::new(pattern)?;
        Ok(self
            .id_map
            .iter()
            .filter(|(id, _)| re.is_match(id.as_str()))
            .map(|(_, entry)| entry)
            .collect())
    }

    /// Builds the interval index used by [`AnnotStore::genomic_query`].
    pub fn init_imap(&mut self) {
        self.imap = Some(
            self.id_map
                .values()
                .map(|entry| (entry.contig.clone(), entry.id.clone()))
                .collect(),
        );
    }

    /// Entries overlapping `contig`, strand ignored.
    pub fn genomic_query(
        &self,
        contig: &Contig,
    ) -> anyhow::Result<Vec<&GffEntry>> {
        let imap = self
            .imap
            .as_ref()
            .ok_or(anyhow!("Interval map is not initialized, call init_imap first"))?;
        Ok(imap
            .find(contig)
            .into_iter()
            .filter_map(|id| self.id_map.get(id))
            .collect())
    }

    /// Adds a flank of `length` bases upstream of every selected entry,
    /// relative to its strand. Flanks are children of their entry.
    pub fn add_upstream<F: Fn(&GffEntry) -> bool>(
        &mut self,
        selector: F,
        length: PosType,
    ) -> usize {
        self.add_flank(selector, length, true)
    }

    pub fn add_downstream<F: Fn(&GffEntry) -> bool>(
        &mut self,
        selector: F,
        length: PosType,
    ) -> usize {
        self.add_flank(selector, length, false)
    }

    pub fn add_flanks<F: Fn(&GffEntry) -> bool + Clone>(
        &mut self,
        selector: F,
        length: PosType,
    ) -> usize {
        self.add_upstream(selector.clone(), length)
            + self.add_downstream(selector, length)
    }

    fn add_flank<F: Fn(&GffEntry) -> bool>(
        &mut self,
        selector: F,
        length: PosType,
        upstream: bool,
    ) -> usize {
        let type_name = if upstream {
            UPSTREAM_TYPE_NAME
        }
        else {
            DOWNSTREAM_TYPE_NAME
        };
        let mut entries = vec![];
        for (id, entry) in self.id_map.iter() {
            if !selector(entry) {
                continue;
            }
            let contig = &entry.contig;
            let reverse = contig.strand() == Strand::Reverse;
            let (start, end) = if upstream != reverse {
                (contig.start().saturating_sub(length), contig.start())
            }
            else {
                (contig.end(), contig.end().saturating_add(length))
            };

            let feature_type = if entry.feature_type.is_empty() {
                type_name.to_string()
            }
            else {
                format!("{}_{}", entry.feature_type, type_name)
            };
            entries.push(GffEntry::new(
                Contig::new(contig.seqname().clone(), start, end, contig.strand()),
                Some(entry.source.clone()),
                Some(feature_type),
                None,
                None,
                Some(
                    GffEntryAttributes::default()
                        .with_id(Some(format!("{}_{}", id, type_name).as_str()))
                        .with_parent(Some(vec![id.clone()])),
                ),
            ));
        }

        entries
            .into_iter()
            .filter_map(|entry| self.insert(entry))
            .count()
    }

    pub fn len(&self) -> usize {
        self.id_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_map.is_empty()
    }
}

impl FromIterator<GffEntry> for AnnotStore {
    fn from_iter<T: IntoIterator<Item = GffEntry>>(iter: T) -> Self {
        let mut new_self = Self::new();
        iter.into_iter().for_each(|entry| {
            new_self.insert(entry);
        });
        new_self
    }
}

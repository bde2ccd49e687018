use hashbrown::HashMap;
use itertools::Itertools;
use rust_lapper::{
    Interval,
    Lapper,
};

use super::Contig;
use crate::data_structs::typedef::{
    GkSmallStr,
    PosType,
};

type Tree<V> = Lapper<PosType, V>;

/// One interval tree per sequence name. Strand is not stored, so queries
/// match features on both strands.
#[derive(Clone, Debug)]
pub struct ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone, {
    trees: HashMap<GkSmallStr, Tree<V>>,
}

fn to_interval<V: Sync + Send + Eq + Clone>(
    contig: &Contig,
    val: V,
) -> Interval<PosType, V> {
    Interval {
        start: contig.start(),
        stop: contig.end(),
        val,
    }
}

impl<V> Default for ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone,
{
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }
}

impl<V> FromIterator<(Contig, V)> for ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone,
{
    /// Groups intervals by sequence and builds each tree once.
    fn from_iter<T: IntoIterator<Item = (Contig, V)>>(iter: T) -> Self {
        let mut by_chr: HashMap<GkSmallStr, Vec<Interval<PosType, V>>> = HashMap::new();
        for (contig, val) in iter {
            by_chr
                .entry_ref(contig.seqname().as_str())
                .or_default()
                .push(to_interval(&contig, val));
        }
        Self {
            trees: by_chr
                .into_iter()
                .map(|(chr, intervals)| (chr, Lapper::new(intervals)))
                .collect(),
        }
    }
}

impl<V> ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_intervals(&self) -> usize {
        self.trees.values().map(Lapper::len).sum()
    }

    pub fn n_chr(&self) -> usize {
        self.trees.len()
    }

    /// Sequence names, sorted.
    pub fn chr_names(&self) -> Vec<GkSmallStr> {
        self.trees.keys().cloned().sorted().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.n_intervals() == 0
    }

    pub fn insert(
        &mut self,
        contig: &Contig,
        value: V,
    ) {
        self.tree_mut(contig.seqname())
            .insert(to_interval(contig, value));
    }

    /// Values of all intervals overlapping `contig`. Empty when the sequence
    /// is unknown.
    pub fn find(
        &self,
        contig: &Contig,
    ) -> Vec<&V> {
        match self.trees.get(contig.seqname()) {
            Some(tree) => tree
                .find(contig.start(), contig.end())
                .map(|interval| &interval.val)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Adds every interval of `other` to this map.
    pub fn union(
        &mut self,
        other: &Self,
    ) {
        for (chr, tree) in other.trees.iter() {
            let target = self.tree_mut(chr);
            tree.iter()
                .for_each(|interval| target.insert(interval.clone()));
        }
    }

    fn tree_mut(
        &mut self,
        chr: &GkSmallStr,
    ) -> &mut Tree<V> {
        self.trees
            .entry_ref(chr.as_str())
            .or_insert_with(|| Lapper::new(Vec::new()))
    }
}

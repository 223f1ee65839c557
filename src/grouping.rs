//! Folding accepted pairs into disjoint duplicate groups.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use canonical::TableId;
use serde::{Deserialize, Serialize};

use crate::stats::DuplicateGroup;

/// How accepted pairs are folded into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingStrategy {
    /// Disjoint-set union over all pairs; independent of pair order.
    #[default]
    UnionFind,
    /// Single pass: a pair joins the first group holding its low id, else
    /// opens a new group. Only transitive when pairs arrive low-id first.
    LinearScan,
}

impl GroupingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupingStrategy::UnionFind => "union-find",
            GroupingStrategy::LinearScan => "linear-scan",
        }
    }
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union-find" => Ok(GroupingStrategy::UnionFind),
            "linear-scan" => Ok(GroupingStrategy::LinearScan),
            other => Err(format!("unknown grouping strategy {other:?}")),
        }
    }
}

/// Group accepted `(low, high)` pairs.
///
/// Groups come back sorted by their smallest member.
pub fn group_pairs(pairs: &[(TableId, TableId)], strategy: GroupingStrategy) -> Vec<DuplicateGroup> {
    let mut groups = match strategy {
        GroupingStrategy::UnionFind => union_find(pairs),
        GroupingStrategy::LinearScan => linear_scan(pairs),
    };
    groups.sort_by_key(|group| group.first().copied());
    groups
}

fn linear_scan(pairs: &[(TableId, TableId)]) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for &(low, high) in pairs {
        match groups.iter_mut().find(|group| group.contains(&low)) {
            Some(group) => {
                group.insert(high);
            }
            None => groups.push(BTreeSet::from([low, high])),
        }
    }
    groups
}

fn union_find(pairs: &[(TableId, TableId)]) -> Vec<DuplicateGroup> {
    let mut sets = DisjointSets::default();
    for &(a, b) in pairs {
        sets.union(a, b);
    }
    sets.groups()
}

/// Disjoint sets over table ids, with path halving and union by size.
#[derive(Debug, Default)]
struct DisjointSets {
    slots: HashMap<TableId, usize>,
    ids: Vec<TableId>,
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn slot(&mut self, id: TableId) -> usize {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.ids.len();
        self.slots.insert(id, slot);
        self.ids.push(id);
        self.parent.push(slot);
        self.size.push(1);
        slot
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: TableId, b: TableId) {
        let a = self.slot(a);
        let b = self.slot(b);
        let (mut root_a, mut root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return;
        }
        if self.size[root_a] < self.size[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b] = root_a;
        self.size[root_a] += self.size[root_b];
    }

    fn groups(mut self) -> Vec<DuplicateGroup> {
        let mut by_root: BTreeMap<usize, DuplicateGroup> = BTreeMap::new();
        for slot in 0..self.ids.len() {
            let root = self.find(slot);
            by_root.entry(root).or_default().insert(self.ids[slot]);
        }
        by_root.into_values().collect()
    }
}

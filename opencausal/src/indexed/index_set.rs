use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::formatting::format_truncated;

/// Mapping from world name to the selected positions along that world.
///
/// Names whose selection is empty are never stored, so two index sets are
/// equal exactly when they select the same positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IndexSet(BTreeMap<String, BTreeSet<usize>>);

impl IndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, indices)` pairs; repeated names are merged.
    pub fn from_pairs<I, N, J>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, J)>,
        N: Into<String>,
        J: IntoIterator<Item = usize>,
    {
        let mut out = Self::new();
        for (name, indices) in pairs {
            out.insert(name, indices);
        }
        out
    }

    fn insert<N, J>(&mut self, name: N, indices: J)
    where
        N: Into<String>,
        J: IntoIterator<Item = usize>,
    {
        let indices: BTreeSet<usize> = indices.into_iter().collect();
        if indices.is_empty() {
            return;
        }
        self.0.entry(name.into()).or_default().extend(indices);
    }

    pub fn get(&self, name: &str) -> Option<&BTreeSet<usize>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeSet<usize>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key-wise set union of two index sets.
    pub fn union(&self, other: &IndexSet) -> IndexSet {
        let mut out = self.clone();
        for (name, indices) in other.iter() {
            out.insert(name.clone(), indices.iter().copied());
        }
        out
    }

    /// True when the regions selected by `self` and `other` cannot overlap,
    /// i.e. some shared name selects disjoint positions. A name missing from
    /// one side is broadcast over and never separates the two.
    pub fn is_disjoint(&self, other: &IndexSet) -> bool {
        self.iter().any(|(name, indices)| match other.get(name) {
            Some(theirs) => indices.is_disjoint(theirs),
            None => false,
        })
    }
}

impl<N, J> FromIterator<(N, J)> for IndexSet
where
    N: Into<String>,
    J: IntoIterator<Item = usize>,
{
    fn from_iter<I: IntoIterator<Item = (N, J)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = (&'a String, &'a BTreeSet<usize>);
    type IntoIter = btree_map::Iter<'a, String, BTreeSet<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .iter()
            .map(|(name, indices)| {
                let values: Vec<usize> = indices.iter().copied().collect();
                format!("{}={}", name, format_truncated(&values))
            })
            .collect::<Vec<_>>();
        write!(f, "IndexSet({})", parts.join(", "))
    }
}

/// Union of any number of index sets; the empty union is the empty set.
pub fn union<'a, I>(indexsets: I) -> IndexSet
where
    I: IntoIterator<Item = &'a IndexSet>,
{
    indexsets
        .into_iter()
        .fold(IndexSet::new(), |acc, next| acc.union(next))
}

/// Build an [`IndexSet`] from `name: [indices]` pairs.
///
/// ```
/// # use opencausal::indexset;
/// let ix = indexset! { x: [0, 1], y: [1] };
/// assert!(ix.contains("x"));
/// ```
#[macro_export]
macro_rules! indexset {
    () => {
        $crate::IndexSet::new()
    };
    ($($name:ident : [$($idx:expr),* $(,)?]),+ $(,)?) => {
        $crate::IndexSet::from_pairs(vec![
            $((stringify!($name), vec![$($idx as usize),*])),+
        ])
    };
    ($($name:literal : [$($idx:expr),* $(,)?]),+ $(,)?) => {
        $crate::IndexSet::from_pairs(vec![
            $(($name, vec![$($idx as usize),*])),+
        ])
    };
}

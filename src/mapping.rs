//! Cost mapping module.
//!
//! A `CostMapping` accumulates dice counts per `CostKey` in order of first
//! appearance. Alternative keys are order-sensitive: `"charm / divine"`
//! and `"divine / charm"` name the same choice, so the reverse of an
//! existing key accumulates onto it instead of opening a new entry.

use crate::magic::{MagicCost, MagicType};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Identity of a mapping entry.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CostKey {
    /// `type[:subtype]`
    Single(MagicCost),
    /// `left / right`, in the order first seen.
    Alternative(MagicCost, MagicCost),
}

impl CostKey {
    /// The same alternative with its sides swapped; singles are unchanged.
    pub fn reversed(&self) -> CostKey {
        match self {
            CostKey::Single(cost) => CostKey::Single(cost.clone()),
            CostKey::Alternative(left, right) => CostKey::Alternative(right.clone(), left.clone()),
        }
    }
}

impl fmt::Display for CostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostKey::Single(cost) => write!(f, "{}", cost),
            CostKey::Alternative(left, right) => write!(f, "{} / {}", left, right),
        }
    }
}

impl Serialize for CostKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Die names split by whether they are always needed or only offered as
/// one side of a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceSets {
    pub required: BTreeSet<MagicType>,
    pub alternative: BTreeSet<MagicType>,
}

impl DiceSets {
    /// Collect dice from the keys of every given mapping.
    pub fn from_mappings<'a>(mappings: impl IntoIterator<Item = &'a CostMapping>) -> Self {
        let mut dice = DiceSets::default();
        for key in mappings.into_iter().flat_map(|mapping| mapping.keys()) {
            match key {
                CostKey::Single(cost) => {
                    dice.required.insert(cost.magic_type);
                }
                CostKey::Alternative(left, right) => {
                    dice.alternative.insert(left.magic_type);
                    dice.alternative.insert(right.magic_type);
                }
            }
        }
        dice
    }
}

/// Insertion-ordered mapping from `CostKey` to an accumulated dice count.
///
/// Serializes as a JSON object in insertion order.
///
/// # Examples
///
/// ```rust
/// use dicecost::mapping::{CostKey, CostMapping};
/// use dicecost::{MagicCost, MagicType};
///
/// let charm = MagicCost::new(MagicType::Charm, None);
/// let divine = MagicCost::new(MagicType::Divine, None);
///
/// let mut mapping = CostMapping::new();
/// mapping.add(CostKey::Alternative(charm.clone(), divine.clone()), 1);
/// mapping.add(CostKey::Alternative(divine, charm), 2);
///
/// assert_eq!(mapping.len(), 1);
/// assert_eq!(mapping.get_str("charm / divine"), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CostMapping {
    entries: Vec<(CostKey, u32)>,
    /// Position of each key in `entries`.
    index: HashMap<CostKey, usize>,
}

impl CostMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` under `key`, or under its reverse if that is already
    /// present.
    pub fn add(&mut self, key: CostKey, count: u32) {
        let position = self
            .index
            .get(&key)
            .or_else(|| self.index.get(&key.reversed()))
            .copied();
        match position {
            Some(position) => {
                let total = &mut self.entries[position].1;
                *total = total.saturating_add(count);
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    /// Count stored under `key` or its reverse.
    pub fn get(&self, key: &CostKey) -> Option<u32> {
        self.index
            .get(key)
            .or_else(|| self.index.get(&key.reversed()))
            .map(|position| self.entries[*position].1)
    }

    /// Count stored under the exact rendered key, e.g. `"natural:power"`.
    pub fn get_str(&self, key: &str) -> Option<u32> {
        self.iter()
            .find(|(candidate, _)| candidate.to_string() == key)
            .map(|(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CostKey, u32)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CostKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as `(rendered key, count)` pairs, in insertion order.
    pub fn to_pairs(&self) -> Vec<(String, u32)> {
        self.iter().map(|(key, count)| (key.to_string(), count)).collect()
    }
}

impl PartialEq for CostMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for CostMapping {}

impl Serialize for CostMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

//! Card store module.
//!
//! The relational store that owns cards is outside this crate. Card
//! creation talks to it through the `CardStore` trait: one lookup for
//! referenced conjurations and one atomic persist call.

use crate::card::{CardRecord, NewCard};
use crate::conjuration::stubify;
use crate::error::CostError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An existing card that another card can conjure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjurationRef {
    pub id: u64,
    pub name: String,
    pub stub: String,
}

/// Storage backend used by card creation.
///
/// `persist` must be all-or-nothing: either the card, its entity id and
/// every conjuration link are written, or nothing is.
pub trait CardStore {
    /// Look up non-legacy cards whose stub is in `stubs`.
    fn find_conjurations(&self, stubs: &BTreeSet<String>) -> Result<Vec<ConjurationRef>, CostError>;

    /// Allocate an entity id and write the card with its conjuration links.
    fn persist(&mut self, card: NewCard) -> Result<CardRecord, CostError>;
}

#[derive(Debug, Clone)]
struct StoredCard {
    name: String,
    stub: String,
    is_legacy: bool,
}

/// In-memory `CardStore`.
///
/// Ids and entity ids are allocated sequentially from 1.
///
/// # Examples
///
/// ```rust
/// use dicecost::store::{CardStore, MemoryCardStore};
/// use std::collections::BTreeSet;
///
/// let mut store = MemoryCardStore::new();
/// store.insert_card("Spark Wisp", false);
/// store.insert_card("Old Wisp", true);
///
/// let stubs = BTreeSet::from(["spark-wisp".to_string(), "old-wisp".to_string()]);
/// let found = store.find_conjurations(&stubs).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].stub, "spark-wisp");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCardStore {
    cards: BTreeMap<u64, StoredCard>,
    records: Vec<CardRecord>,
    conjuration_links: Vec<(u64, u64)>,
    next_id: u64,
    next_entity_id: u64,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing card directly, bypassing card creation.
    pub fn insert_card(&mut self, name: &str, is_legacy: bool) -> u64 {
        let id = self.allocate_id();
        self.cards.insert(
            id,
            StoredCard {
                name: name.to_string(),
                stub: stubify(name),
                is_legacy,
            },
        );
        id
    }

    /// Cards written through `persist`, in write order.
    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    /// `(card id, conjuration id)` links, in write order.
    pub fn conjuration_links(&self) -> &[(u64, u64)] {
        &self.conjuration_links
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl CardStore for MemoryCardStore {
    fn find_conjurations(&self, stubs: &BTreeSet<String>) -> Result<Vec<ConjurationRef>, CostError> {
        Ok(self
            .cards
            .iter()
            .filter(|(_, card)| !card.is_legacy && stubs.contains(&card.stub))
            .map(|(id, card)| ConjurationRef {
                id: *id,
                name: card.name.clone(),
                stub: card.stub.clone(),
            })
            .collect())
    }

    fn persist(&mut self, card: NewCard) -> Result<CardRecord, CostError> {
        if self.cards.values().any(|existing| !existing.is_legacy && existing.stub == card.stub) {
            return Err(CostError::Store(format!("card {:?} already exists", card.stub)));
        }
        let id = self.allocate_id();
        self.next_entity_id += 1;
        let record = CardRecord {
            id,
            entity_id: self.next_entity_id,
            card,
        };
        self.cards.insert(
            id,
            StoredCard {
                name: record.card.name.clone(),
                stub: record.card.stub.clone(),
                is_legacy: false,
            },
        );
        self.conjuration_links.extend(
            record
                .card
                .conjuration_ids
                .iter()
                .map(|conjuration_id| (id, *conjuration_id)),
        );
        self.records.push(record.clone());
        Ok(record)
    }
}

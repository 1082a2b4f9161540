//! Card creation.
//!
//! Validates conjuration references, compiles costs and assembles the
//! stored card document, then hands the finished card to a `CardStore`
//! in a single call. Nothing reaches the store when validation or
//! compilation fails.

use crate::compiler::{CostCompiler, CostInput};
use crate::conjuration::{referenced_conjurations, stubify};
use crate::error::CostError;
use crate::magic::dice_to_flags;
use crate::store::{CardStore, ConjurationRef};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// The release (set) a card belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub name: String,
    pub stub: String,
}

/// A printed card statistic. Usually a number, but some cards print
/// `X` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardStat {
    Number(i64),
    Text(String),
}

impl From<i64> for CardStat {
    fn from(value: i64) -> Self {
        CardStat::Number(value)
    }
}

impl From<&str> for CardStat {
    fn from(value: &str) -> Self {
        CardStat::Text(value.to_string())
    }
}

/// Card data as entered by a curator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub name: String,
    pub card_type: String,
    pub release: Release,
    #[serde(default)]
    pub placement: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub costs: CostInput,
    #[serde(default)]
    pub can_effect_repeat: bool,
    #[serde(default)]
    pub phoenixborn: Option<String>,
    #[serde(default)]
    pub attack: Option<CardStat>,
    #[serde(default)]
    pub battlefield: Option<CardStat>,
    #[serde(default)]
    pub life: Option<CardStat>,
    #[serde(default)]
    pub recover: Option<CardStat>,
    #[serde(default)]
    pub spellboard: Option<CardStat>,
    #[serde(default)]
    pub copies: Option<CardStat>,
}

impl CardDraft {
    pub fn new(name: impl Into<String>, card_type: impl Into<String>, release: Release) -> Self {
        Self {
            name: name.into(),
            card_type: card_type.into(),
            release,
            placement: None,
            text: None,
            costs: CostInput::default(),
            can_effect_repeat: false,
            phoenixborn: None,
            attack: None,
            battlefield: None,
            life: None,
            recover: None,
            spellboard: None,
            copies: None,
        }
    }
}

/// A fully prepared card, ready to be written by a `CardStore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCard {
    pub name: String,
    pub stub: String,
    pub card_type: String,
    pub placement: Option<String>,
    pub release_id: u64,
    pub search_text: String,
    pub is_summon_spell: bool,
    pub phoenixborn: Option<String>,
    pub copies: Option<CardStat>,
    pub cost_weight: u32,
    pub dice_flags: u32,
    pub alt_dice_flags: u32,
    /// Stored card document.
    pub json: Value,
    /// Ids of the conjurations this card references.
    pub conjuration_ids: Vec<u64>,
}

/// A card as written by a `CardStore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardRecord {
    pub id: u64,
    pub entity_id: u64,
    #[serde(flatten)]
    pub card: NewCard,
}

/// Card name and text with bracket markup removed, for full text search.
///
/// Runs of newlines in the text collapse into a single space.
fn search_text(name: &str, text: Option<&str>) -> String {
    let mut search = format!("{}\n", name);
    if let Some(text) = text {
        let plain = text.replace("[[", "").replace("]]", "");
        let mut in_break = false;
        for c in plain.chars() {
            if c == '\n' {
                if !in_break {
                    search.push(' ');
                }
                in_break = true;
            } else {
                search.push(c);
                in_break = false;
            }
        }
    }
    search
}

/// Fail unless every conjuration referenced in `text` exists.
fn check_conjurations<S: CardStore>(
    store: &S,
    text: &str,
) -> Result<Vec<ConjurationRef>, CostError> {
    let referenced = referenced_conjurations(text);
    if referenced.is_empty() {
        return Ok(Vec::new());
    }
    let existing = store.find_conjurations(&referenced)?;
    let found: BTreeSet<&str> = existing.iter().map(|card| card.stub.as_str()).collect();
    let missing: Vec<String> = referenced
        .iter()
        .filter(|stub| !found.contains(stub.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "card references conjurations that do not exist");
        return Err(CostError::MissingConjurations { stubs: missing });
    }
    Ok(existing)
}

/// Treat an empty curator field the same as a missing one.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn insert_stat(document: &mut Map<String, Value>, key: &str, stat: Option<&CardStat>) {
    if let Some(stat) = stat {
        document.insert(key.to_string(), json!(stat));
    }
}

/// Create a card from a curator draft.
///
/// # Errors
///
/// * `CostError::MissingConjurations` when the text references
///   conjurations that are not in the store yet; nothing is persisted
/// * any compilation error from `CostCompiler::compile`
/// * `CostError::Store` when the store rejects the write
///
/// # Examples
///
/// ```rust
/// use dicecost::card::{create_card, CardDraft, Release};
/// use dicecost::store::MemoryCardStore;
/// use dicecost::{CostCompiler, CostInput};
///
/// let release = Release { id: 1, name: "Master Set".into(), stub: "master-set".into() };
/// let mut draft = CardDraft::new("Summon Spark Wisp", "Ready Spell", release);
/// draft.text = Some("Place a [[Spark Wisp]] conjuration into play.".into());
/// draft.costs = CostInput::new().cost("[[main]] - 1 [[natural:class]]");
///
/// let mut store = MemoryCardStore::new();
/// store.insert_card("Spark Wisp", false);
///
/// let record = create_card(&mut store, &CostCompiler::new(), &draft).unwrap();
/// assert_eq!(record.card.cost_weight, 106);
/// assert!(record.card.is_summon_spell);
/// assert_eq!(record.card.conjuration_ids, vec![1]);
/// ```
pub fn create_card<S: CardStore>(
    store: &mut S,
    compiler: &CostCompiler,
    draft: &CardDraft,
) -> Result<CardRecord, CostError> {
    let text = non_empty(&draft.text);
    let placement = non_empty(&draft.placement);
    let conjurations = match text {
        Some(text) => check_conjurations(store, text)?,
        None => Vec::new(),
    };
    let costs = compiler.compile(&draft.costs)?;
    let stub = stubify(&draft.name);

    let mut document = Map::new();
    document.insert("name".into(), json!(draft.name));
    document.insert("stub".into(), json!(stub));
    document.insert("type".into(), json!(draft.card_type));
    document.insert(
        "release".into(),
        json!({ "name": draft.release.name, "stub": draft.release.stub }),
    );
    if !conjurations.is_empty() {
        let conjured: Vec<Value> = conjurations
            .iter()
            .map(|card| json!({ "name": card.name, "stub": card.stub }))
            .collect();
        document.insert("conjurations".into(), Value::Array(conjured));
    }
    if let Some(placement) = placement {
        document.insert("placement".into(), json!(placement));
    }
    if let Value::Object(cost_fields) = json!(costs.canonical()) {
        document.extend(cost_fields);
    }
    if let Some(text) = text {
        document.insert("text".into(), json!(text));
    }
    if let Some(phoenixborn) = &draft.phoenixborn {
        document.insert("phoenixborn".into(), json!(phoenixborn));
    }
    insert_stat(&mut document, "attack", draft.attack.as_ref());
    insert_stat(&mut document, "battlefield", draft.battlefield.as_ref());
    insert_stat(&mut document, "life", draft.life.as_ref());
    insert_stat(&mut document, "recover", draft.recover.as_ref());
    insert_stat(&mut document, "spellboard", draft.spellboard.as_ref());
    insert_stat(&mut document, "copies", draft.copies.as_ref());
    if draft.can_effect_repeat {
        document.insert("effectRepeats".into(), Value::Bool(true));
    }

    let card = NewCard {
        name: draft.name.clone(),
        stub,
        card_type: draft.card_type.clone(),
        placement: placement.map(str::to_string),
        release_id: draft.release.id,
        search_text: search_text(&draft.name, text),
        is_summon_spell: draft.name.starts_with("Summon "),
        phoenixborn: draft.phoenixborn.clone(),
        copies: draft.copies.clone(),
        cost_weight: costs.weight,
        dice_flags: dice_to_flags(&costs.required_dice),
        alt_dice_flags: dice_to_flags(&costs.alternative_dice),
        json: Value::Object(document),
        conjuration_ids: conjurations.iter().map(|card| card.id).collect(),
    };

    let record = store.persist(card)?;
    info!(
        card_id = record.id,
        entity_id = record.entity_id,
        stub = %record.card.stub,
        weight = record.card.cost_weight,
        "created card"
    );
    Ok(record)
}

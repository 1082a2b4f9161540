//! Cost compiler module.
//!
//! Provides `CostCompiler`, the main entry point. It runs the pipeline
//!
//! ```text
//! [RawCostSpec] → tokenize → [CostEntry] → parse → [ParsedEntry] → reduce → [WeightedResult]
//! ```
//!
//! once for the play cost and once for the effect cost. Only the play
//! cost contributes to the weight; both contribute dice.

use crate::config::CompilerConfig;
use crate::error::CostError;
use crate::mapping::{CostMapping, DiceSets};
use crate::magic::MagicType;
use crate::reducer::{build_mapping, total_weight, ParsedEntry};
use crate::tokenizer::{tokenize, CostEntry, RawCostSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost fields of a card as submitted for compilation.
///
/// # Examples
///
/// ```rust
/// use dicecost::CostInput;
///
/// let input = CostInput::new()
///     .cost("1 [[charm]] - [[main]]")
///     .effect_cost("1 [[divine:class]]")
///     .alt_dice(vec!["time".into()]);
/// assert!(input.dice.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInput {
    pub cost: Option<RawCostSpec>,
    pub effect_cost: Option<RawCostSpec>,
    /// Replaces the derived required dice when given.
    pub dice: Option<Vec<String>>,
    /// Replaces the derived alternative dice when given.
    pub alt_dice: Option<Vec<String>>,
}

impl CostInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cost(mut self, cost: impl Into<RawCostSpec>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    pub fn effect_cost(mut self, effect_cost: impl Into<RawCostSpec>) -> Self {
        self.effect_cost = Some(effect_cost.into());
        self
    }

    pub fn dice(mut self, dice: Vec<String>) -> Self {
        self.dice = Some(dice);
        self
    }

    pub fn alt_dice(mut self, alt_dice: Vec<String>) -> Self {
        self.alt_dice = Some(alt_dice);
        self
    }
}

/// Result of compiling a card's costs.
///
/// Plain data, safe to store or send; compiling the same input always
/// produces the same result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedResult {
    /// Sort weight of the play cost.
    pub weight: u32,
    /// Play cost entries, in input order.
    pub cost: Vec<CostEntry>,
    /// Effect cost entries, in input order.
    pub effect_cost: Vec<CostEntry>,
    pub cost_mapping: CostMapping,
    pub effect_cost_mapping: CostMapping,
    /// Dice always needed, derived or as overridden by the caller.
    pub required_dice: Vec<String>,
    /// Dice offered as one side of a choice, derived or as overridden.
    pub alternative_dice: Vec<String>,
}

impl WeightedResult {
    /// Storage and display form of the costs.
    pub fn canonical(&self) -> CanonicalCost<'_> {
        CanonicalCost {
            cost: &self.cost,
            dice: &self.required_dice,
            alt_dice: &self.alternative_dice,
            magic_cost: &self.cost_mapping,
            effect_magic_cost: &self.effect_cost_mapping,
        }
    }
}

/// Cost fields of the stored card document.
///
/// Empty fields are left out entirely rather than written as null or
/// empty placeholders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCost<'a> {
    #[serde(skip_serializing_if = "<[CostEntry]>::is_empty")]
    pub cost: &'a [CostEntry],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub dice: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub alt_dice: &'a [String],
    #[serde(skip_serializing_if = "CostMapping::is_empty")]
    pub magic_cost: &'a CostMapping,
    #[serde(skip_serializing_if = "CostMapping::is_empty")]
    pub effect_magic_cost: &'a CostMapping,
}

/// Compiles raw card costs into weights, mappings and dice.
///
/// The compiler holds only configuration and can be shared freely
/// between threads.
///
/// # Examples
///
/// ```rust
/// use dicecost::{CostCompiler, CostInput};
///
/// let compiler = CostCompiler::new();
/// let result = compiler
///     .compile(&CostInput::new().cost("3 [[basic]] - 1 [[natural:power]]"))
///     .unwrap();
///
/// assert_eq!(result.weight, 402);
/// assert_eq!(result.cost_mapping.get_str("basic"), Some(3));
/// assert_eq!(result.cost_mapping.get_str("natural:power"), Some(1));
/// assert_eq!(result.required_dice, vec!["basic", "natural"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CostCompiler {
    config: CompilerConfig,
}

impl CostCompiler {
    /// Create a permissive compiler.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Tokenize and parse one cost specification.
    ///
    /// Unrecognized tokens are logged and kept as zero-weight atoms, or
    /// rejected in strict mode.
    fn parse_spec(
        &self,
        spec: Option<&RawCostSpec>,
    ) -> Result<(Vec<CostEntry>, Vec<ParsedEntry>), CostError> {
        let Some(spec) = spec else {
            return Ok((Vec::new(), Vec::new()));
        };
        let entries = tokenize(spec)?;
        let mut parsed = Vec::with_capacity(entries.len());
        for entry in &entries {
            let parsed_entry = ParsedEntry::parse(entry);
            if let Some(token) = parsed_entry.unrecognized().first() {
                if self.config.is_strict() {
                    return Err(CostError::UnrecognizedToken(token.to_string()));
                }
                debug!(token = %token, "ignoring unrecognized cost token");
            }
            parsed.push(parsed_entry);
        }
        Ok((entries, parsed))
    }

    /// Compile a card's costs.
    ///
    /// # Errors
    ///
    /// * `CostError::MalformedAlternative` when a list entry is not one or
    ///   two tokens long
    /// * `CostError::UnrecognizedToken` in strict mode
    pub fn compile(&self, input: &CostInput) -> Result<WeightedResult, CostError> {
        let (cost, parsed_cost) = self.parse_spec(input.cost.as_ref())?;
        let (effect_cost, parsed_effect) = self.parse_spec(input.effect_cost.as_ref())?;

        let weight = total_weight(&parsed_cost);
        let cost_mapping = build_mapping(&parsed_cost);
        let effect_cost_mapping = build_mapping(&parsed_effect);

        let derived = DiceSets::from_mappings([&cost_mapping, &effect_cost_mapping]);
        let required_dice = input
            .dice
            .clone()
            .unwrap_or_else(|| die_names(&derived.required));
        let alternative_dice = input
            .alt_dice
            .clone()
            .unwrap_or_else(|| die_names(&derived.alternative));

        debug!(
            weight,
            entries = cost.len(),
            effect_entries = effect_cost.len(),
            "compiled card cost"
        );

        Ok(WeightedResult {
            weight,
            cost,
            effect_cost,
            cost_mapping,
            effect_cost_mapping,
            required_dice,
            alternative_dice,
        })
    }
}

fn die_names<'a>(dice: impl IntoIterator<Item = &'a MagicType>) -> Vec<String> {
    dice.into_iter().map(|die| die.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::RawCostEntry;

    fn compile(input: CostInput) -> WeightedResult {
        CostCompiler::new().compile(&input).unwrap()
    }

    #[test]
    fn test_effect_cost_has_no_weight() {
        let result = compile(
            CostInput::new()
                .cost("1 [[charm]]")
                .effect_cost("2 [[divine]] - 1 [[charm]]"),
        );
        assert_eq!(result.weight, 100);
        assert_eq!(result.cost_mapping.to_pairs(), vec![("charm".to_string(), 1)]);
        assert_eq!(
            result.effect_cost_mapping.to_pairs(),
            vec![("divine".to_string(), 2), ("charm".to_string(), 1)]
        );
        assert_eq!(result.required_dice, vec!["charm", "divine"]);
    }

    #[test]
    fn test_dice_from_alternatives() {
        let result = compile(CostInput::new().cost(RawCostSpec::Entries(vec![
            RawCostEntry::Options(vec!["2 [[ceremonial]]".into(), "3 [[divine]]".into()]),
        ])));
        assert_eq!(result.weight, 300);
        assert!(result.required_dice.is_empty());
        assert_eq!(result.alternative_dice, vec!["ceremonial", "divine"]);
    }

    #[test]
    fn test_dice_overrides_used_verbatim() {
        let result = compile(
            CostInput::new()
                .cost("1 [[charm]] - 1 [[time]] / 1 [[illusion]]")
                .dice(vec!["Sympathy".into(), "basic".into()])
                .alt_dice(vec![]),
        );
        assert_eq!(result.required_dice, vec!["Sympathy", "basic"]);
        assert!(result.alternative_dice.is_empty());
    }

    #[test]
    fn test_no_cost_compiles_empty() {
        let result = compile(CostInput::new());
        assert_eq!(result.weight, 0);
        assert!(result.cost.is_empty());
        assert!(result.cost_mapping.is_empty());
        assert!(result.required_dice.is_empty());
        assert_eq!(serde_json::to_string(&result.canonical()).unwrap(), "{}");
    }

    #[test]
    fn test_strict_mode_rejects_garbage() {
        let compiler = CostCompiler::with_config(CompilerConfig::strict());
        let err = compiler
            .compile(&CostInput::new().cost("1 [[basic]] - foo bar"))
            .unwrap_err();
        assert_eq!(err, CostError::UnrecognizedToken("foo bar".into()));

        let err = compiler
            .compile(&CostInput::new().effect_cost("1 [[charm]] / 2 [[fire]]"))
            .unwrap_err();
        assert_eq!(err, CostError::UnrecognizedToken("2 [[fire]]".into()));
    }

    #[test]
    fn test_permissive_mode_drops_garbage() {
        let result = compile(CostInput::new().cost("1 [[basic]] - foo bar"));
        assert_eq!(result.weight, 100);
        assert_eq!(result.cost.len(), 2);
        assert_eq!(result.cost_mapping.len(), 1);
    }

    #[test]
    fn test_canonical_field_names() {
        let result = compile(
            CostInput::new()
                .cost("1 [[charm]] or 1 [[time]] - 2 [[basic]]")
                .effect_cost("1 [[natural]]"),
        );
        let json = serde_json::to_value(result.canonical()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cost": [["1 [[charm]]", "1 [[time]]"], "2 [[basic]]"],
                "dice": ["basic", "natural"],
                "altDice": ["charm", "time"],
                "magicCost": { "charm / time": 1, "basic": 2 },
                "effectMagicCost": { "natural": 1 },
            })
        );
    }
}

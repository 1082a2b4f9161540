//! # dicecost - Card Cost Compiler for Dice-Based Card Games
//!
//! Turns curator-written card costs such as
//! `"2 [[ceremonial]] - 1 [[natural:power]]"` into:
//! - a **deterministic** sort weight
//! - an **ordered** mapping of cost key to dice count, with alternative
//!   costs merged under a first-seen `"a / b"` key
//! - the **dice** a card needs, split into required and alternative dice
//!
//! ## Pipeline
//!
//! ```text
//! [RawCostSpec] → [CostEntry] → [CostAtom] → [WeightedResult]
//!    tokenize        parse        reduce
//! ```
//!
//! 1. **Tokenizer** splits steps on ` - ` and choices on ` / ` or ` or `
//! 2. **Parser** reads each token as a magic cost, discard, side or main
//!    action; anything else weighs nothing
//! 3. **Reducer** sums weights, builds the mappings and derives dice
//!
//! ## Weights
//!
//! | token | weight |
//! |---|---|
//! | `N [[type]]` | N × 100 |
//! | `N [[type:class]]` | N × 101 |
//! | `N [[type:power]]` | N × 102 |
//! | `discard N` | N × 3 |
//! | `side` | 4 |
//! | `main` | 5 |
//!
//! An alternative weighs as much as its heavier option. Effect costs
//! contribute dice but no weight.
//!
//! ## Example
//!
//! ```rust
//! use dicecost::*;
//!
//! let compiler = CostCompiler::new();
//! let input = CostInput::new()
//!     .cost("2 [[ceremonial]] or 3 [[divine]] - discard 1")
//!     .effect_cost("1 [[charm:class]]");
//!
//! let result = compiler.compile(&input).unwrap();
//! assert_eq!(result.weight, 303); // max(200, 300) + 3
//! assert_eq!(result.cost_mapping.get_str("ceremonial / divine"), Some(3));
//! assert_eq!(result.required_dice, vec!["charm"]);
//! assert_eq!(result.alternative_dice, vec!["ceremonial", "divine"]);
//! ```
//!
//! ## Modules
//!
//! - [`magic`] - Magic types, subtypes and dice flags
//! - [`tokenizer`] - Raw cost input and entry splitting
//! - [`parser`] - Cost token grammar
//! - [`reducer`] - Weight and mapping reduction
//! - [`mapping`] - Ordered cost mapping and dice sets
//! - [`compiler`] - Main cost compiler
//! - [`config`] - Compiler configuration
//! - [`conjuration`] - Conjuration references and slugs
//! - [`card`] - Card creation workflow
//! - [`store`] - Card store interface
//! - [`error`] - Error types

pub mod card;
pub mod compiler;
pub mod config;
pub mod conjuration;
pub mod error;
pub mod magic;
pub mod mapping;
pub mod parser;
pub mod reducer;
pub mod store;
pub mod tokenizer;

// Re-export main types for convenience
pub use compiler::{CanonicalCost, CostCompiler, CostInput, WeightedResult};
pub use config::{CompilerConfig, ParseMode};
pub use error::CostError;
pub use magic::{MagicCost, MagicSubtype, MagicType};
pub use mapping::{CostKey, CostMapping, DiceSets};
pub use parser::{parse_atom, CostAtom};
pub use tokenizer::{tokenize, CostEntry, RawCostEntry, RawCostSpec};

// Re-export card creation
pub use card::{create_card, CardDraft, CardRecord, CardStat, NewCard, Release};
pub use conjuration::{referenced_conjurations, stubify};
pub use store::{CardStore, ConjurationRef, MemoryCardStore};

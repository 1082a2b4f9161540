//! Weight and mapping reduction.
//!
//! Folds parsed cost entries into a sort weight and a `CostMapping`.
//! Alternatives weigh as much as their heavier option and map under a
//! combined `"a / b"` key holding the larger of the two counts.

use crate::mapping::{CostKey, CostMapping};
use crate::parser::{parse_atom, CostAtom};
use crate::tokenizer::CostEntry;

/// A cost token alongside the atom parsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub token: String,
    pub atom: CostAtom,
}

impl ParsedToken {
    pub fn parse(token: &str) -> Self {
        Self {
            token: token.to_string(),
            atom: parse_atom(token),
        }
    }
}

/// A cost entry with its tokens parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEntry {
    Single(ParsedToken),
    Alternative(ParsedToken, ParsedToken),
}

impl ParsedEntry {
    pub fn parse(entry: &CostEntry) -> Self {
        match entry {
            CostEntry::Single(token) => ParsedEntry::Single(ParsedToken::parse(token)),
            CostEntry::Alternative(first, second) => {
                ParsedEntry::Alternative(ParsedToken::parse(first), ParsedToken::parse(second))
            }
        }
    }

    /// Parsed tokens of this entry, in input order.
    pub fn tokens(&self) -> Vec<&ParsedToken> {
        match self {
            ParsedEntry::Single(token) => vec![token],
            ParsedEntry::Alternative(first, second) => vec![first, second],
        }
    }

    /// Weight of this entry: the atom's own weight, or the heavier option
    /// of an alternative.
    pub fn weight(&self) -> u32 {
        match self {
            ParsedEntry::Single(token) => token.atom.weight(),
            ParsedEntry::Alternative(first, second) => {
                first.atom.weight().max(second.atom.weight())
            }
        }
    }

    /// Mapping key and count for this entry, if it is paid with dice.
    ///
    /// An alternative only maps when both options are magic costs.
    pub fn mapping_entry(&self) -> Option<(CostKey, u32)> {
        match self {
            ParsedEntry::Single(token) => {
                let (cost, count) = token.atom.as_magic()?;
                Some((CostKey::Single(cost.clone()), count))
            }
            ParsedEntry::Alternative(first, second) => {
                let (left, left_count) = first.atom.as_magic()?;
                let (right, right_count) = second.atom.as_magic()?;
                Some((
                    CostKey::Alternative(left.clone(), right.clone()),
                    left_count.max(right_count),
                ))
            }
        }
    }

    /// Source text of every token the grammar did not accept.
    pub fn unrecognized(&self) -> Vec<&str> {
        self.tokens()
            .into_iter()
            .filter(|token| !token.atom.is_recognized())
            .map(|token| token.token.as_str())
            .collect()
    }
}

/// Total weight of a list of parsed entries.
///
/// # Examples
///
/// ```rust
/// use dicecost::reducer::{total_weight, ParsedEntry};
/// use dicecost::CostEntry;
///
/// let entries = [
///     CostEntry::Single("3 [[basic]]".into()),
///     CostEntry::Alternative("2 [[ceremonial]]".into(), "3 [[divine]]".into()),
///     CostEntry::Single("side".into()),
/// ];
/// let parsed: Vec<ParsedEntry> = entries.iter().map(ParsedEntry::parse).collect();
/// assert_eq!(total_weight(&parsed), 300 + 300 + 4);
/// ```
pub fn total_weight(entries: &[ParsedEntry]) -> u32 {
    entries
        .iter()
        .fold(0u32, |total, entry| total.saturating_add(entry.weight()))
}

/// Build the ordered cost mapping for a list of parsed entries.
pub fn build_mapping(entries: &[ParsedEntry]) -> CostMapping {
    let mut mapping = CostMapping::new();
    for (key, count) in entries.iter().filter_map(ParsedEntry::mapping_entry) {
        mapping.add(key, count);
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(entries: &[CostEntry]) -> Vec<ParsedEntry> {
        entries.iter().map(ParsedEntry::parse).collect()
    }

    fn single(token: &str) -> CostEntry {
        CostEntry::Single(token.to_string())
    }

    fn alt(first: &str, second: &str) -> CostEntry {
        CostEntry::Alternative(first.to_string(), second.to_string())
    }

    #[test]
    fn test_alternative_weight_is_max() {
        let parsed = ParsedEntry::parse(&alt("2 [[ceremonial]]", "3 [[divine]]"));
        assert_eq!(parsed.weight(), 300);

        let parsed = ParsedEntry::parse(&alt("1 [[charm:power]]", "discard 1"));
        assert_eq!(parsed.weight(), 102);
    }

    #[test]
    fn test_alternative_mapping_uses_larger_count() {
        let parsed = parse_all(&[alt("2 [[ceremonial]]", "3 [[divine]]")]);
        let mapping = build_mapping(&parsed);
        assert_eq!(mapping.to_pairs(), vec![("ceremonial / divine".to_string(), 3)]);
    }

    #[test]
    fn test_reverse_alternative_accumulates() {
        let parsed = parse_all(&[
            alt("2 [[ceremonial]]", "3 [[divine]]"),
            single("1 [[basic]]"),
            alt("1 [[divine]]", "1 [[ceremonial]]"),
        ]);
        let mapping = build_mapping(&parsed);
        assert_eq!(
            mapping.to_pairs(),
            vec![
                ("ceremonial / divine".to_string(), 4),
                ("basic".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_non_magic_alternative_is_not_mapped() {
        let parsed = parse_all(&[alt("1 [[charm]]", "discard 1")]);
        assert!(build_mapping(&parsed).is_empty());
        assert_eq!(total_weight(&parsed), 100);
    }

    #[test]
    fn test_non_magic_entries_only_weigh() {
        let parsed = parse_all(&[
            single("discard 2"),
            single("side"),
            single("main"),
            single("foo bar"),
        ]);
        assert_eq!(total_weight(&parsed), 6 + 4 + 5);
        assert!(build_mapping(&parsed).is_empty());
    }

    #[test]
    fn test_unrecognized_tokens_reported() {
        let parsed = ParsedEntry::parse(&alt("1 [[fire]]", "1 [[charm]]"));
        assert_eq!(parsed.unrecognized(), vec!["1 [[fire]]"]);

        let parsed = ParsedEntry::parse(&alt("foo", "bar"));
        assert_eq!(parsed.unrecognized(), vec!["foo", "bar"]);

        let parsed = ParsedEntry::parse(&single("1 [[basic]]"));
        assert!(parsed.unrecognized().is_empty());
        assert_eq!(parsed.tokens()[0].token, "1 [[basic]]");
    }
}

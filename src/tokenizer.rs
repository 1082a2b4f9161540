//! Cost tokenizer module.
//!
//! Splits a raw cost specification into ordered `CostEntry` values.
//! A cost is written as steps separated by ` - `, and a step may offer a
//! choice between two tokens written as `A / B` or `A or B`.

use crate::error::CostError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw cost input as a curator or API client provides it.
///
/// Either a single string such as `"2 [[charm]] - 1 [[basic]]"`, or a list
/// whose elements are single tokens or `[option, option]` pairs.
///
/// # Examples
///
/// ```rust
/// use dicecost::RawCostSpec;
///
/// let text: RawCostSpec = serde_json::from_str(r#""1 [[charm]] - [[main]]""#).unwrap();
/// let list: RawCostSpec =
///     serde_json::from_str(r#"[["1 [[charm]]", "1 [[divine]]"], "[[main]]"]"#).unwrap();
///
/// assert!(matches!(text, RawCostSpec::Text(_)));
/// assert!(matches!(list, RawCostSpec::Entries(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCostSpec {
    /// Free text, split on ` - ` and then on ` / ` or ` or `.
    Text(String),
    /// Already split entries.
    Entries(Vec<RawCostEntry>),
}

/// One element of a list-shaped `RawCostSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCostEntry {
    Token(String),
    Options(Vec<String>),
}

/// A single step of a cost.
///
/// Serializes as a plain string for a single token and as a two element
/// array for an alternative, which is also the shape `RawCostSpec`
/// accepts, so compiled entries can be fed back in unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostEntry {
    Single(String),
    Alternative(String, String),
}

impl CostEntry {
    /// Build an entry from two options, dropping blank sides.
    ///
    /// Returns `None` when both sides are blank.
    fn from_options(first: &str, second: &str) -> Option<Self> {
        let (first, second) = (first.trim(), second.trim());
        match (first.is_empty(), second.is_empty()) {
            (true, true) => None,
            (false, true) => Some(CostEntry::Single(first.to_string())),
            (true, false) => Some(CostEntry::Single(second.to_string())),
            (false, false) => Some(CostEntry::Alternative(
                first.to_string(),
                second.to_string(),
            )),
        }
    }

    fn single(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(CostEntry::Single(token.to_string()))
        }
    }
}

impl From<&str> for RawCostSpec {
    fn from(text: &str) -> Self {
        RawCostSpec::Text(text.to_string())
    }
}

impl From<String> for RawCostSpec {
    fn from(text: String) -> Self {
        RawCostSpec::Text(text)
    }
}

impl From<Vec<CostEntry>> for RawCostSpec {
    fn from(entries: Vec<CostEntry>) -> Self {
        RawCostSpec::Entries(
            entries
                .into_iter()
                .map(|entry| match entry {
                    CostEntry::Single(token) => RawCostEntry::Token(token),
                    CostEntry::Alternative(first, second) => {
                        RawCostEntry::Options(vec![first, second])
                    }
                })
                .collect(),
        )
    }
}

/// Find the first `<ws>+word<ws>+` delimiter in `text`.
///
/// Returns the byte range covering the delimiter and its surrounding
/// whitespace.
fn find_delimiter(text: &str, word: &str) -> Option<(usize, usize)> {
    text.match_indices(word).find_map(|(pos, _)| {
        let before = &text[..pos];
        let after = &text[pos + word.len()..];
        let spaced_before = before.chars().next_back().is_some_and(char::is_whitespace);
        let spaced_after = after.chars().next().is_some_and(char::is_whitespace);
        if !(spaced_before && spaced_after) {
            return None;
        }
        let start = before.trim_end().len();
        let end = text.len() - after.trim_start().len();
        Some((start, end))
    })
}

/// Split free text into cost steps on every ` - ` delimiter.
fn split_steps(text: &str) -> Vec<&str> {
    let mut steps = Vec::new();
    let mut rest = text;
    while let Some((start, end)) = find_delimiter(rest, "-") {
        steps.push(&rest[..start]);
        rest = &rest[end..];
    }
    steps.push(rest);
    steps
}

/// Split a step into two options at its earliest ` / ` or ` or `.
///
/// # Examples
///
/// ```rust
/// use dicecost::tokenizer::split_alternative;
///
/// assert_eq!(
///     split_alternative("1 [[charm]] or 1 [[divine]]"),
///     Some(("1 [[charm]]", "1 [[divine]]"))
/// );
/// assert_eq!(split_alternative("2 [[basic]]"), None);
/// ```
pub fn split_alternative(step: &str) -> Option<(&str, &str)> {
    let slash = find_delimiter(step, "/");
    let or = find_delimiter(step, "or");
    let (start, end) = match (slash, or) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return None,
    };
    Some((&step[..start], &step[end..]))
}

/// Split a raw cost specification into ordered entries.
///
/// Blank steps are dropped. A list element with zero or more than two
/// options is rejected.
///
/// # Examples
///
/// ```rust
/// use dicecost::{tokenize, CostEntry, RawCostSpec};
///
/// let entries = tokenize(&RawCostSpec::from("2 [[ceremonial]] - 1 [[natural]] / 1 [[time]]")).unwrap();
/// assert_eq!(
///     entries,
///     vec![
///         CostEntry::Single("2 [[ceremonial]]".into()),
///         CostEntry::Alternative("1 [[natural]]".into(), "1 [[time]]".into()),
///     ]
/// );
/// ```
pub fn tokenize(spec: &RawCostSpec) -> Result<Vec<CostEntry>, CostError> {
    match spec {
        RawCostSpec::Text(text) => Ok(split_steps(text)
            .into_iter()
            .filter_map(|step| {
                let entry = match split_alternative(step) {
                    Some((first, second)) => CostEntry::from_options(first, second),
                    None => CostEntry::single(step),
                };
                if entry.is_none() {
                    debug!(text = %text, "dropping blank cost step");
                }
                entry
            })
            .collect()),
        RawCostSpec::Entries(entries) => {
            let mut tokenized = Vec::with_capacity(entries.len());
            for entry in entries {
                let entry = match entry {
                    RawCostEntry::Token(token) => CostEntry::single(token),
                    RawCostEntry::Options(options) => match options.as_slice() {
                        [token] => CostEntry::single(token),
                        [first, second] => CostEntry::from_options(first, second),
                        _ => {
                            return Err(CostError::MalformedAlternative {
                                len: options.len(),
                                options: options.clone(),
                            })
                        }
                    },
                };
                match entry {
                    Some(entry) => tokenized.push(entry),
                    None => debug!("dropping blank cost entry"),
                }
            }
            Ok(tokenized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(token: &str) -> CostEntry {
        CostEntry::Single(token.to_string())
    }

    fn alt(first: &str, second: &str) -> CostEntry {
        CostEntry::Alternative(first.to_string(), second.to_string())
    }

    #[test]
    fn test_split_text_steps() {
        let entries = tokenize(&"3 [[basic]] - 1 [[natural:power]]".into()).unwrap();
        assert_eq!(entries, vec![single("3 [[basic]]"), single("1 [[natural:power]]")]);
    }

    #[test]
    fn test_split_needs_whitespace_around_hyphen() {
        let entries = tokenize(&"1 [[basic]]-1 [[charm]]".into()).unwrap();
        assert_eq!(entries, vec![single("1 [[basic]]-1 [[charm]]")]);
    }

    #[test]
    fn test_split_alternative_forms() {
        let entries =
            tokenize(&"1 [[charm]] / 1 [[divine]] - 2 [[time]]   or   2 [[illusion]]".into())
                .unwrap();
        assert_eq!(
            entries,
            vec![
                alt("1 [[charm]]", "1 [[divine]]"),
                alt("2 [[time]]", "2 [[illusion]]"),
            ]
        );
    }

    #[test]
    fn test_alternative_takes_first_split_only() {
        let (first, second) = split_alternative("a / b or c").unwrap();
        assert_eq!(first, "a");
        assert_eq!(second, "b or c");

        let (first, second) = split_alternative("a or b / c").unwrap();
        assert_eq!(first, "a");
        assert_eq!(second, "b / c");
    }

    #[test]
    fn test_or_inside_word_is_not_a_delimiter() {
        assert_eq!(split_alternative("1 [[sympathy]] for you"), None);
        assert_eq!(split_alternative("color"), None);
    }

    #[test]
    fn test_blank_steps_dropped() {
        let entries = tokenize(&"   ".into()).unwrap();
        assert!(entries.is_empty());

        let entries = tokenize(&" - 1 [[basic]] - 1 [[time]] - ".into()).unwrap();
        assert_eq!(entries, vec![single("1 [[basic]]"), single("1 [[time]]")]);
    }

    #[test]
    fn test_list_entries_used_as_is() {
        let spec = RawCostSpec::Entries(vec![
            RawCostEntry::Token("1 [[charm]] / 1 [[basic]]".into()),
            RawCostEntry::Options(vec!["2 [[ceremonial]]".into(), "3 [[divine]]".into()]),
            RawCostEntry::Options(vec!["[[main]]".into()]),
            RawCostEntry::Token("  ".into()),
        ]);
        let entries = tokenize(&spec).unwrap();
        assert_eq!(
            entries,
            vec![
                single("1 [[charm]] / 1 [[basic]]"),
                alt("2 [[ceremonial]]", "3 [[divine]]"),
                single("[[main]]"),
            ]
        );
    }

    #[test]
    fn test_half_blank_alternative_collapses() {
        let spec = RawCostSpec::Entries(vec![RawCostEntry::Options(vec![
            " ".into(),
            "1 [[time]]".into(),
        ])]);
        assert_eq!(tokenize(&spec).unwrap(), vec![single("1 [[time]]")]);
    }

    #[test]
    fn test_oversized_alternative_rejected() {
        let spec = RawCostSpec::Entries(vec![RawCostEntry::Options(vec![
            "1 [[charm]]".into(),
            "1 [[time]]".into(),
            "1 [[basic]]".into(),
        ])]);
        let err = tokenize(&spec).unwrap_err();
        assert!(matches!(err, CostError::MalformedAlternative { len: 3, .. }));

        let empty = RawCostSpec::Entries(vec![RawCostEntry::Options(vec![])]);
        assert!(matches!(
            tokenize(&empty),
            Err(CostError::MalformedAlternative { len: 0, .. })
        ));
    }

    #[test]
    fn test_entries_serialize_to_input_shape() {
        let entries = vec![single("1 [[basic]]"), alt("1 [[charm]]", "1 [[time]]")];
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(json, r#"["1 [[basic]]",["1 [[charm]]","1 [[time]]"]]"#);

        let spec: RawCostSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(tokenize(&spec).unwrap(), entries);
    }
}

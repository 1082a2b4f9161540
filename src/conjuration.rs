//! Conjuration references in card text.
//!
//! Card text names the conjurations a card can summon in brackets, e.g.
//! `"Place a [[Spark Wisp]] conjuration into play"`. Those cards have to
//! exist before the referencing card can be created.

use std::collections::BTreeSet;

/// Convert a card name into its URL slug.
///
/// Lowercases, removes apostrophes, and collapses every other run of
/// non-alphanumeric characters into a single `-`.
///
/// # Examples
///
/// ```rust
/// use dicecost::stubify;
///
/// assert_eq!(stubify("Spark Wisp"), "spark-wisp");
/// assert_eq!(stubify("Hammer Knight's  Gift!"), "hammer-knights-gift");
/// ```
pub fn stubify(name: &str) -> String {
    let mut stub = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().filter(|c| !matches!(c, '\'' | '’')) {
        if c.is_alphanumeric() {
            if pending_dash && !stub.is_empty() {
                stub.push('-');
            }
            pending_dash = false;
            stub.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    stub
}

/// Words that mark a bracketed name as a conjuration reference when they
/// follow it after a single space.
const REFERENCE_SUFFIXES: [&str; 3] = ["conjuration", "conjured alteration spell", "or"];

/// A bracketed phrase names a card if it starts with an uppercase letter
/// and contains only letters, apostrophes and spaces.
fn is_card_name(phrase: &str) -> bool {
    let mut chars = phrase.chars();
    let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    starts_upper
        && phrase.len() > 1
        && chars.all(|c| c.is_ascii_alphabetic() || c == '\'' || c == ' ')
}

/// Collect the slugs of every conjuration referenced in `text`.
///
/// # Examples
///
/// ```rust
/// use dicecost::referenced_conjurations;
///
/// let text = "Place a [[Spark Wisp]] conjuration or [[Iron Rhino]] conjuration into play. \
///             Spend 1 [[natural]] to draw.";
/// let stubs = referenced_conjurations(text);
/// assert_eq!(stubs.into_iter().collect::<Vec<_>>(), vec!["iron-rhino", "spark-wisp"]);
/// ```
pub fn referenced_conjurations(text: &str) -> BTreeSet<String> {
    let mut stubs = BTreeSet::new();
    let mut rest = text;
    while let Some(open) = rest.find("[[") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("]]") else {
            break;
        };
        let phrase = &after_open[..close];
        let following = &after_open[close + 2..];
        let is_reference = following
            .strip_prefix(' ')
            .is_some_and(|tail| REFERENCE_SUFFIXES.iter().any(|suffix| tail.starts_with(suffix)));
        if is_card_name(phrase) && is_reference {
            stubs.insert(stubify(phrase));
            rest = following;
        } else {
            // A later `[[` may open the real reference.
            rest = after_open;
        }
    }
    stubs
}

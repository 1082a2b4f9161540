//! Cost token parser module.
//!
//! Turns a single cost token into a `CostAtom`. Parsing never fails:
//! anything that does not match the grammar becomes
//! `CostAtom::Unrecognized`, which weighs nothing.
//!
//! ```text
//! token   := ws* count? ws* "[[" inner "]]" ws*
//!          | "discard" ws+ count
//!          | "side" | "main"
//! inner   := type (":" word)?
//! ```
//!
//! `inner` is matched exactly: no whitespace inside the brackets, no empty
//! or multi-part subtype.

use crate::magic::MagicCost;

/// A parsed cost token.
///
/// # Examples
///
/// ```rust
/// use dicecost::{parse_atom, CostAtom};
///
/// assert_eq!(parse_atom("2 [[natural:power]]").weight(), 204);
/// assert_eq!(parse_atom("discard 2"), CostAtom::Discard(2));
/// assert_eq!(parse_atom("[[side]]"), CostAtom::Side);
/// assert_eq!(parse_atom("foo bar"), CostAtom::Unrecognized);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CostAtom {
    /// `count` dice showing `cost`.
    Magic { cost: MagicCost, count: u32 },
    /// Discard `count` cards.
    Discard(u32),
    /// Spend the side action.
    Side,
    /// Spend the main action.
    Main,
    /// Anything the grammar does not accept.
    Unrecognized,
}

impl CostAtom {
    /// Sort weight contributed by this atom.
    pub fn weight(&self) -> u32 {
        match self {
            CostAtom::Magic { cost, count } => cost.weight(*count),
            CostAtom::Discard(count) => count.saturating_mul(3),
            CostAtom::Side => 4,
            CostAtom::Main => 5,
            CostAtom::Unrecognized => 0,
        }
    }

    /// The magic cost and count, if this atom is paid with dice.
    pub fn as_magic(&self) -> Option<(&MagicCost, u32)> {
        match self {
            CostAtom::Magic { cost, count } => Some((cost, *count)),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, CostAtom::Unrecognized)
    }
}

/// Split a token into its optional leading count and bracket contents.
///
/// Returns `None` when the token is not of the `N [[inner]]` shape. A count
/// that overflows is treated as a shape mismatch.
fn split_bracketed(token: &str) -> Option<(Option<u32>, &str)> {
    let token = token.trim();
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, rest) = token.split_at(digits_end);
    let count = if digits.is_empty() {
        None
    } else {
        Some(digits.parse::<u32>().ok()?)
    };
    let inner = rest.trim_start().strip_prefix("[[")?.strip_suffix("]]")?;
    if inner.is_empty() || inner.contains(']') {
        return None;
    }
    Some((count, inner))
}

fn parse_bracketed(count: Option<u32>, inner: &str) -> CostAtom {
    let count = count.filter(|count| *count > 0);
    if let Some(cost) = MagicCost::parse(inner) {
        return match count {
            Some(count) => CostAtom::Magic { cost, count },
            None => CostAtom::Unrecognized,
        };
    }
    let kind = inner.split(':').next().unwrap_or(inner);
    if kind.eq_ignore_ascii_case("discard") {
        count.map_or(CostAtom::Unrecognized, CostAtom::Discard)
    } else if kind.eq_ignore_ascii_case("side") {
        CostAtom::Side
    } else if kind.eq_ignore_ascii_case("main") {
        CostAtom::Main
    } else {
        CostAtom::Unrecognized
    }
}

/// Parse the unbracketed `discard N`, `side` and `main` forms.
fn parse_literal(token: &str) -> CostAtom {
    let words: Vec<&str> = token.split_whitespace().collect();
    match words.as_slice() {
        [word] if word.eq_ignore_ascii_case("side") => CostAtom::Side,
        [word] if word.eq_ignore_ascii_case("main") => CostAtom::Main,
        [word, count] if word.eq_ignore_ascii_case("discard") => count
            .parse::<u32>()
            .ok()
            .filter(|count| *count > 0)
            .map_or(CostAtom::Unrecognized, CostAtom::Discard),
        _ => CostAtom::Unrecognized,
    }
}

/// Parse one cost token.
pub fn parse_atom(token: &str) -> CostAtom {
    match split_bracketed(token) {
        Some((count, inner)) => parse_bracketed(count, inner),
        None => parse_literal(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::{MagicSubtype, MagicType};

    #[test]
    fn test_parse_magic() {
        let atom = parse_atom("  3 [[Ceremonial]] ");
        assert_eq!(
            atom,
            CostAtom::Magic {
                cost: MagicCost::new(MagicType::Ceremonial, None),
                count: 3,
            }
        );
        assert_eq!(atom.weight(), 300);
    }

    #[test]
    fn test_parse_magic_without_space() {
        assert_eq!(parse_atom("2[[charm:class]]").weight(), 202);
    }

    #[test]
    fn test_parse_subtypes() {
        assert_eq!(parse_atom("1 [[natural:power]]").weight(), 102);
        assert_eq!(parse_atom("4 [[illusion:CLASS]]").weight(), 404);

        let atom = parse_atom("1 [[time:sand]]");
        let (cost, count) = atom.as_magic().unwrap();
        assert_eq!(count, 1);
        assert_eq!(cost.subtype, Some(MagicSubtype::Other("sand".into())));
        assert_eq!(atom.weight(), 100);
    }

    #[test]
    fn test_magic_needs_count() {
        assert_eq!(parse_atom("[[charm]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("0 [[charm]]"), CostAtom::Unrecognized);
    }

    #[test]
    fn test_unknown_type_unrecognized() {
        assert_eq!(parse_atom("2 [[fire]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("2 [[]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("2 [[basic]] extra"), CostAtom::Unrecognized);
    }

    #[test]
    fn test_bracket_contents_must_be_exact() {
        assert_eq!(parse_atom("1 [[ basic ]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("1 [[basic:]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("1 [[natural:power:x]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("[[ side ]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("1 [[natural:power]]").weight(), 102);
    }

    #[test]
    fn test_overflowing_count_unrecognized() {
        assert_eq!(parse_atom("99999999999 [[basic]]"), CostAtom::Unrecognized);
    }

    #[test]
    fn test_discard_forms() {
        assert_eq!(parse_atom("discard 2"), CostAtom::Discard(2));
        assert_eq!(parse_atom("Discard 1"), CostAtom::Discard(1));
        assert_eq!(parse_atom("2 [[discard]]"), CostAtom::Discard(2));
        assert_eq!(parse_atom("discard"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("[[discard]]"), CostAtom::Unrecognized);
        assert_eq!(parse_atom("discard 2").weight(), 6);
    }

    #[test]
    fn test_side_and_main() {
        assert_eq!(parse_atom("side"), CostAtom::Side);
        assert_eq!(parse_atom("main"), CostAtom::Main);
        assert_eq!(parse_atom("[[main]]"), CostAtom::Main);
        assert_eq!(parse_atom("3 [[side]]").weight(), 4);
        assert_eq!(parse_atom("[[main]]").weight(), 5);
        assert_eq!(parse_atom("side action"), CostAtom::Unrecognized);
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        let atom = parse_atom("foo bar");
        assert!(!atom.is_recognized());
        assert_eq!(atom.weight(), 0);
        assert_eq!(atom.as_magic(), None);
    }
}

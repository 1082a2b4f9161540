//! Magic types module.
//!
//! Provides the fixed set of magic types that can appear in a cost,
//! the optional subtype attached to them, and `MagicCost`, the
//! `type[:subtype]` identity used for cost keys and die names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed magic types a die can roll.
///
/// Parsing is case-insensitive; the canonical form is lowercase.
///
/// # Examples
///
/// ```rust
/// use dicecost::MagicType;
///
/// assert_eq!(MagicType::parse("Ceremonial"), Some(MagicType::Ceremonial));
/// assert_eq!(MagicType::parse("discard"), None);
/// assert_eq!(MagicType::Natural.as_str(), "natural");
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagicType {
    Basic,
    Ceremonial,
    Charm,
    Illusion,
    Natural,
    Divine,
    Sympathy,
    Time,
}

impl MagicType {
    /// Every magic type, in flag order.
    pub const ALL: [MagicType; 8] = [
        MagicType::Basic,
        MagicType::Ceremonial,
        MagicType::Charm,
        MagicType::Illusion,
        MagicType::Natural,
        MagicType::Divine,
        MagicType::Sympathy,
        MagicType::Time,
    ];

    /// Parse a magic type name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|magic| magic.as_str().eq_ignore_ascii_case(name))
    }

    /// Canonical lowercase name. This is also the die name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MagicType::Basic => "basic",
            MagicType::Ceremonial => "ceremonial",
            MagicType::Charm => "charm",
            MagicType::Illusion => "illusion",
            MagicType::Natural => "natural",
            MagicType::Divine => "divine",
            MagicType::Sympathy => "sympathy",
            MagicType::Time => "time",
        }
    }

    /// Bit used for this type in a dice flag set.
    pub fn flag(&self) -> u32 {
        1 << (*self as u32)
    }
}

impl fmt::Display for MagicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Die face qualifier written after the colon, e.g. `natural:power`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum MagicSubtype {
    /// Class symbol. Adds 1 weight per die.
    Class,
    /// Power symbol. Adds 2 weight per die.
    Power,
    /// Any other word. Kept in the key, adds no weight.
    Other(String),
}

impl MagicSubtype {
    /// Parse a subtype token. The token is lowercased.
    ///
    /// Returns `None` unless the token is a single non-empty word of ASCII
    /// letters, digits or underscores.
    pub fn parse(token: &str) -> Option<Self> {
        let is_word = !token.is_empty()
            && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_word {
            return None;
        }
        let token = token.to_ascii_lowercase();
        Some(match token.as_str() {
            "class" => MagicSubtype::Class,
            "power" => MagicSubtype::Power,
            _ => MagicSubtype::Other(token),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            MagicSubtype::Class => "class",
            MagicSubtype::Power => "power",
            MagicSubtype::Other(token) => token,
        }
    }

    /// Extra weight paid per die for this subtype.
    pub fn weight_bonus(&self) -> u32 {
        match self {
            MagicSubtype::Class => 1,
            MagicSubtype::Power => 2,
            MagicSubtype::Other(_) => 0,
        }
    }
}

/// A magic type with an optional subtype: the `type[:subtype]` part of a
/// bracketed cost token.
///
/// # Examples
///
/// ```rust
/// use dicecost::{MagicCost, MagicType};
///
/// let cost = MagicCost::parse("Natural:Power").unwrap();
/// assert_eq!(cost.magic_type, MagicType::Natural);
/// assert_eq!(cost.to_string(), "natural:power");
/// assert_eq!(cost.die_name(), "natural");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MagicCost {
    pub magic_type: MagicType,
    pub subtype: Option<MagicSubtype>,
}

impl MagicCost {
    pub fn new(magic_type: MagicType, subtype: Option<MagicSubtype>) -> Self {
        Self {
            magic_type,
            subtype,
        }
    }

    /// Parse the inside of a `[[...]]` bracket: `type` or `type:subtype`.
    ///
    /// Returns `None` when the type is not one of the magic types, or the
    /// text has stray whitespace, an empty subtype or a second colon.
    pub fn parse(inner: &str) -> Option<Self> {
        let (name, subtype) = match inner.split_once(':') {
            Some((name, subtype)) => (name, Some(MagicSubtype::parse(subtype)?)),
            None => (inner, None),
        };
        let magic_type = MagicType::parse(name)?;
        Some(Self::new(magic_type, subtype))
    }

    /// The die needed to pay this cost; the subtype is ignored.
    pub fn die_name(&self) -> &'static str {
        self.magic_type.as_str()
    }

    /// Weight of paying `count` of this cost.
    pub fn weight(&self, count: u32) -> u32 {
        let bonus = self.subtype.as_ref().map_or(0, MagicSubtype::weight_bonus);
        count.saturating_mul(100 + bonus)
    }
}

impl fmt::Display for MagicCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}:{}", self.magic_type, subtype.as_str()),
            None => write!(f, "{}", self.magic_type),
        }
    }
}

/// Convert die names to a flag set. Unknown names are ignored.
///
/// # Examples
///
/// ```rust
/// use dicecost::magic::dice_to_flags;
///
/// assert_eq!(dice_to_flags(&["basic", "charm"]), 0b101);
/// assert_eq!(dice_to_flags::<&str>(&[]), 0);
/// ```
pub fn dice_to_flags<S: AsRef<str>>(dice: &[S]) -> u32 {
    dice.iter()
        .filter_map(|name| MagicType::parse(name.as_ref()))
        .fold(0, |flags, magic| flags | magic.flag())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_type_parse_case_insensitive() {
        assert_eq!(MagicType::parse("TIME"), Some(MagicType::Time));
        assert_eq!(MagicType::parse("sympathy"), Some(MagicType::Sympathy));
        assert_eq!(MagicType::parse("side"), None);
    }

    #[test]
    fn test_subtype_weight() {
        let basic = MagicCost::parse("basic").unwrap();
        let class = MagicCost::parse("charm:class").unwrap();
        let power = MagicCost::parse("divine:power").unwrap();
        let other = MagicCost::parse("time:sand").unwrap();

        assert_eq!(basic.weight(3), 300);
        assert_eq!(class.weight(3), 303);
        assert_eq!(power.weight(3), 306);
        assert_eq!(other.weight(3), 300);
        assert_eq!(other.to_string(), "time:sand");
    }

    #[test]
    fn test_malformed_inner_text_rejected() {
        assert_eq!(MagicCost::parse(" basic "), None);
        assert_eq!(MagicCost::parse("basic:"), None);
        assert_eq!(MagicCost::parse("natural:power:x"), None);
        assert_eq!(MagicCost::parse("natural: power"), None);
        assert_eq!(
            MagicCost::parse("Charm:Class"),
            Some(MagicCost::new(MagicType::Charm, Some(MagicSubtype::Class)))
        );
    }

    #[test]
    fn test_dice_flags_skip_unknown() {
        let flags = dice_to_flags(&["natural", "bogus", "time"]);
        assert_eq!(flags, MagicType::Natural.flag() | MagicType::Time.flag());
    }
}

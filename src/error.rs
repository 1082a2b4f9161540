//! Error types for cost compilation and card creation.
//!
//! Malformed cost tokens are absorbed by the parser in permissive mode,
//! so most of these only surface on the card creation path or when the
//! caller hands over input of the wrong shape.

use thiserror::Error;

/// Join slugs into a readable, comma-separated list.
fn format_slugs(slugs: &[String]) -> String {
    if slugs.is_empty() {
        return String::from("(none)");
    }
    slugs.join(", ")
}

/// Errors that can occur while compiling costs or creating a card.
///
/// # Examples
///
/// ```rust
/// use dicecost::CostError;
///
/// let err = CostError::MissingConjurations {
///     stubs: vec!["spark-wisp".to_string()],
/// };
/// assert_eq!(
///     err.to_string(),
///     "The following conjurations must be added first: spark-wisp"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    /// The card text references conjurations that do not exist yet.
    ///
    /// Slugs are sorted so the message is stable.
    #[error("The following conjurations must be added first: {}", format_slugs(.stubs))]
    MissingConjurations { stubs: Vec<String> },

    /// An alternative cost was given as a list that is not one or two
    /// tokens long.
    #[error("Alternative cost must have two options, got {len}: {options:?}")]
    MalformedAlternative { len: usize, options: Vec<String> },

    /// A token could not be parsed and the compiler runs in strict mode.
    #[error("Unrecognized cost token: {0:?}")]
    UnrecognizedToken(String),

    /// Compiler configuration could not be read.
    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),

    /// The card store failed to look up or persist a card.
    #[error("Card store failure: {0}")]
    Store(String),
}

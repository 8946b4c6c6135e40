use std::time::Duration;
use thiserror::Error;

/// Errors raised by [`Palette`][crate::Palette] operations and the
/// helpers built on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// Missing or malformed input to a constructor or mutator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Positional access outside `0 .. len`.
    #[error("there is no color with index {index} in the palette (size {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// Invalid swatch index given to [`skip`][crate::Palette::skip] or
    /// [`unskip`][crate::Palette::unskip].
    #[error("invalid color index {0}")]
    InvalidIndex(usize),
    /// The weights do not match the number of swatches.
    #[error("invalid length for weights array: expected {expected}, got {got}")]
    InvalidWeights { expected: usize, got: usize },
    /// [`next`][crate::Palette::next] found every swatch skipped.
    #[error("a palette should not have all colors skipped")]
    AllSkipped,
    /// The operation needs at least one color.
    #[error("the palette is empty")]
    Empty,
    /// A numeric parameter outside its admissible range.
    #[error("invalid {name} value: {value}")]
    InvalidValue { name: &'static str, value: String },
    /// A string that does not describe a color.
    #[error("not a color: “{0}”")]
    InvalidColor(String),
    /// Stored palettes could not be decoded or encoded.
    #[error("palette storage: {0}")]
    Storage(String),
}

impl PaletteError {
    pub(crate) fn invalid_value(name: &'static str, value: impl ToString) -> Self {
        PaletteError::InvalidValue { name, value: value.to_string() }
    }
}

impl From<serde_json::Error> for PaletteError {
    fn from(e: serde_json::Error) -> Self { PaletteError::Storage(e.to_string()) }
}

/// Errors of the remote palette loaders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The transport failed to complete the request.
    #[error("request failed: {0}")]
    Http(String),
    /// No answer arrived within the configured delay.
    #[error("failed to retrieve data from the API after {0:?}")]
    Timeout(Duration),
    /// The answer could not be turned into a list of colors.
    #[error("unexpected answer: {0}")]
    Parse(String),
    /// The request was canceled before it completed.
    #[error("request canceled")]
    Canceled,
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self { FetchError::Parse(e.to_string()) }
}

//! Error types for the tree view core.
//!
//! Every variant except the configuration ones is a contract violation by the
//! caller: the operation did nothing and the view state is unchanged.

use std::path::PathBuf;

/// Result type alias for tree view operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors returned by tree view operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// An index outside the visible sequence (or outside `[-1, N)` for focus).
    #[error("index {index} out of range for {len} visible items")]
    IndexOutOfRange { index: usize, len: usize },

    /// Expand/collapse requested on an item that is not a folder.
    #[error("item at index {index} is not a folder")]
    NotAFolder { index: usize },

    /// Selecting more than one item while multi-select is off.
    #[error("cannot select {len} items when multi-select is disabled")]
    MultiSelectRequired { len: usize },

    /// Identity lookup failed where the item must be present.
    #[error("item is not in the tree view")]
    ItemNotFound,

    /// Label editing requested for an item that does not support renaming.
    #[error("item at index {index} cannot be renamed")]
    NotRenamable { index: usize },

    /// Configuration text could not be parsed.
    #[error("invalid tree view configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("failed to serialize tree view configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration file could not be read or written.
    #[error("configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a caller contract violation rather than a
    /// configuration problem.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            Self::Config(_) | Self::ConfigSerialize(_) | Self::Io { .. }
        )
    }
}

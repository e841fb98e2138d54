//! Tree view behaviour switches and layout settings.
//!
//! [`TreeViewConfig`] is plain data. It can be built in code, or loaded from
//! and saved to TOML:
//!
//! ```
//! use lattice_treeview::TreeViewConfig;
//!
//! let config = TreeViewConfig::from_toml_str(
//!     r#"
//!     multi_select = true
//!     has_checkboxes = true
//!     dpi = 144
//!     "#,
//! )
//! .unwrap();
//! assert!(config.multi_select);
//! assert_eq!(config.item_margin_left, 0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Scrollbar thickness at 96 DPI.
pub const DEFAULT_SCROLLBAR_THICKNESS: i32 = 17;

/// Behaviour and layout configuration for a [`TreeView`](crate::TreeView).
///
/// Margins and scrollbar thickness are logical units (96 DPI); they are
/// scaled to physical pixels by [`Metrics`](crate::Metrics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewConfig {
    /// Whether more than one item can be selected (Ctrl/Shift click, Shift+arrows).
    pub multi_select: bool,
    /// Highlight the item under the pointer.
    pub hot_track: bool,
    /// Activate items on single click instead of double click.
    pub single_click_activate: bool,
    /// Clicking anywhere on a folder row toggles it. Ignored with multi-select.
    pub full_row_expand: bool,
    /// Draw a checkbox column left of each item.
    pub has_checkboxes: bool,
    /// Extra space left of item images.
    pub item_margin_left: i32,
    /// Extra space right of item text.
    pub item_margin_right: i32,
    /// Percentage added to the natural item height.
    pub custom_item_height_add_percent: i32,
    /// Scrollbar thickness.
    pub scrollbar_thickness: i32,
    /// Device DPI.
    pub dpi: i32,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            multi_select: false,
            hot_track: false,
            single_click_activate: false,
            full_row_expand: false,
            has_checkboxes: false,
            item_margin_left: 0,
            item_margin_right: 0,
            custom_item_height_add_percent: 0,
            scrollbar_thickness: DEFAULT_SCROLLBAR_THICKNESS,
            dpi: 96,
        }
    }
}

impl TreeViewConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Save the configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| TreeError::io(path, e))
    }

    /// Whether switching from `self` to `other` invalidates measured widths.
    pub(crate) fn affects_measurement(&self, other: &Self) -> bool {
        self.has_checkboxes != other.has_checkboxes
            || self.item_margin_left != other.item_margin_left
            || self.item_margin_right != other.item_margin_right
            || self.custom_item_height_add_percent != other.custom_item_height_add_percent
            || self.scrollbar_thickness != other.scrollbar_thickness
            || self.dpi != other.dpi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = TreeViewConfig::from_toml_str("").unwrap();
        assert_eq!(config, TreeViewConfig::default());
        assert_eq!(config.dpi, 96);
        assert_eq!(config.scrollbar_thickness, DEFAULT_SCROLLBAR_THICKNESS);
    }

    #[test]
    fn test_toml_text_roundtrip() {
        let config = TreeViewConfig {
            multi_select: true,
            item_margin_left: 4,
            dpi: 120,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("multi_select = true"));
        assert_eq!(TreeViewConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TreeViewConfig::from_toml_str("dpi = \"high\"").unwrap_err();
        assert!(matches!(err, TreeError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TreeViewConfig::load("/nonexistent/lattice-treeview.toml").unwrap_err();
        assert!(matches!(err, TreeError::Io { .. }));
    }

    #[test]
    fn test_affects_measurement() {
        let base = TreeViewConfig::default();
        let hot = TreeViewConfig {
            hot_track: true,
            ..Default::default()
        };
        let boxes = TreeViewConfig {
            has_checkboxes: true,
            ..Default::default()
        };
        assert!(!base.affects_measurement(&hot));
        assert!(base.affects_measurement(&boxes));
    }
}

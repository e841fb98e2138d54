//! Physical-pixel item metrics derived from DPI and font height.

use crate::config::TreeViewConfig;

/// Scale a 96-DPI logical value to `dpi`, rounding to nearest.
pub fn scale(value: i32, dpi: i32) -> i32 {
    let v = i64::from(value) * i64::from(dpi);
    let r = if v >= 0 { (v + 48) / 96 } else { (v - 48) / 96 };
    r as i32
}

/// Row and chrome sizes in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub dpi: i32,
    /// Item image (icon) size; also the per-level indent.
    pub image_size: i32,
    /// Horizontal space on each side of the image.
    pub image_margin_x: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    /// Height of the text line; also the checkbox column width.
    pub line_height: i32,
    /// Row pitch, `line_height` plus the configured extra percentage.
    pub item_height: i32,
    pub scrollbar_v: i32,
    pub scrollbar_h: i32,
}

impl Metrics {
    /// Compute metrics for `config`, given the height of a line of text in
    /// the view font at the configured DPI.
    pub fn new(config: &TreeViewConfig, text_height: i32) -> Self {
        let dpi = config.dpi.max(1);
        let image_size = dpi / 6;
        let line_height = image_size.max(text_height) + scale(2, dpi);
        let mut item_height = line_height;
        if config.custom_item_height_add_percent > 0 {
            item_height += percent_ceil(line_height, config.custom_item_height_add_percent);
        }
        let scrollbar = scale(config.scrollbar_thickness.max(0), dpi);

        Self {
            dpi,
            image_size,
            image_margin_x: scale(4, dpi),
            margin_left: scale(config.item_margin_left, dpi),
            margin_right: scale(config.item_margin_right, dpi),
            line_height,
            item_height: item_height.max(1),
            scrollbar_v: scrollbar,
            scrollbar_h: scrollbar,
        }
    }

    /// Width that an item at `level` with text width `text_width` needs to
    /// be fully shown. `text_width` includes the 1-pixel caret allowance.
    pub fn item_extent(&self, text_width: i32, level: usize, has_checkboxes: bool) -> i32 {
        let level = i32::try_from(level).unwrap_or(i32::MAX / 2);
        let mut w = text_width
            + self.image_size.saturating_mul(level + 1)
            + self.image_margin_x * 2
            + self.margin_left
            + self.margin_right;
        if has_checkboxes {
            w += self.line_height;
        }
        w
    }
}

fn percent_ceil(value: i32, percent: i32) -> i32 {
    let v = i64::from(value) * i64::from(percent);
    ((v + 99) / 100) as i32
}

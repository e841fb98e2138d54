//! The item capability set.
//!
//! Any caller type can be shown in a [`TreeView`](crate::TreeView) by
//! implementing [`TreeItem`]. The view never owns the tree structure; it keeps
//! cloned [`ItemRef`] handles and identifies items by handle address
//! ([`ItemKey`]), so two handles to the same allocation are the same item.

use std::fmt;
use std::sync::Arc;

use crate::measure::TextMeasurer;

/// Checkbox state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// No checkbox.
    #[default]
    None,
    Unchecked,
    Checked,
    /// Some children checked.
    Mixed,
    /// Checked, but with an "excluded" mark.
    Excluded,
    RadioUnchecked,
    RadioChecked,
}

impl CheckState {
    /// Whether a checkbox or radio button is drawn for this state.
    pub fn has_box(self) -> bool {
        self != CheckState::None
    }
}

/// Contract a node must satisfy to be displayed in a tree view.
///
/// Mutators take `&self`; implementations use interior mutability, since
/// the same item is shared between the caller's tree and the view.
pub trait TreeItem: Send + Sync {
    /// Text shown for the item.
    fn display_text(&self) -> String;

    fn is_folder(&self) -> bool {
        false
    }

    /// Only consulted for folders.
    fn is_expanded(&self) -> bool {
        false
    }

    fn is_selectable(&self) -> bool {
        true
    }

    /// Disabled items are drawn grayed and are never activated.
    fn is_disabled(&self) -> bool {
        false
    }

    /// Bold text is measured with the bold font.
    fn is_bold(&self) -> bool {
        false
    }

    fn check_state(&self) -> CheckState {
        CheckState::None
    }

    /// Child items.
    ///
    /// Called only while the folder is expanded (or being expanded), at most
    /// twice per rebuild of the visible sequence.
    fn children(&self) -> Vec<ItemRef> {
        Vec::new()
    }

    /// Called by [`TreeView::expand`](crate::TreeView::expand).
    fn set_is_expanded(&self, _expanded: bool) {}

    /// Whether [`set_new_text`](Self::set_new_text) is supported.
    fn can_rename(&self) -> bool {
        false
    }

    /// Called when a label edit is committed with changed text.
    fn set_new_text(&self, _text: &str) {}

    /// Custom text width, for items that draw text differently.
    ///
    /// Return `None` to measure [`display_text`](Self::display_text).
    fn measure_text_width(&self, _measurer: &dyn TextMeasurer) -> Option<i32> {
        None
    }
}

/// Shared handle to a tree item.
pub type ItemRef = Arc<dyn TreeItem>;

/// Identity of an item, derived from its handle address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(usize);

impl ItemKey {
    /// Identity of the item behind `item`.
    pub fn of(item: &ItemRef) -> Self {
        Self(Arc::as_ptr(item).cast::<()>() as usize)
    }
}

/// Wrapper that prints an item by its text in debug output.
pub(crate) struct DebugItem<'a>(pub &'a ItemRef);

impl fmt::Debug for DebugItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.display_text())
    }
}

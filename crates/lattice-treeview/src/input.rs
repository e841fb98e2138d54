//! Keyboard and pointer input types.
//!
//! The host translates its native events into these types and feeds them to
//! [`TreeView::key_down`](crate::TreeView::key_down),
//! [`TreeView::pointer_down`](crate::TreeView::pointer_down) and friends.

use lattice_treeview_core::Point;

use crate::geometry::TvParts;
use crate::item::ItemRef;

/// Keys the tree view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Home,
    End,
    Up,
    Down,
    PageUp,
    PageDown,
    Left,
    Right,
    Enter,
    Escape,
    A,
    /// Any other key; never handled.
    Other,
}

impl Key {
    /// Keys navigated through the vertical scroll axis.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Key::Home | Key::End | Key::Up | Key::Down | Key::PageUp | Key::PageDown
        )
    }
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Exactly Ctrl or exactly Shift, the combinations that extend a
    /// multi-selection.
    pub(crate) fn is_ctrl_or_shift_only(&self) -> bool {
        *self == Self::CTRL || *self == Self::SHIFT
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl MouseButton {
    /// Bit of this button in a held-buttons mask.
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Payload of the item click, activation and drag-start signals.
#[derive(Clone)]
pub struct TvItemEvent {
    pub item: ItemRef,
    pub index: usize,
    /// Part under the pointer; [`TvParts::NONE`] for keyboard activation.
    pub part: TvParts,
    pub button: Option<MouseButton>,
    /// 1 for click, 2 for double click, 0 for keyboard.
    pub click_count: u8,
    pub point: Point,
    pub modifiers: KeyboardModifiers,
}

impl std::fmt::Debug for TvItemEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TvItemEvent")
            .field("item", &crate::item::DebugItem(&self.item))
            .field("index", &self.index)
            .field("part", &self.part)
            .field("button", &self.button)
            .field("click_count", &self.click_count)
            .field("point", &self.point)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

/// Button press being tracked between pointer down and up.
#[derive(Debug, Clone)]
pub(crate) struct PointerCapture {
    pub button: MouseButton,
    pub index: usize,
    pub part: TvParts,
    pub point: Point,
    pub modifiers: KeyboardModifiers,
    /// Ctrl/Shift multi-selection, applied on button up.
    pub multi_select: bool,
    /// Pressed on an already selected item; unselect the others on button up.
    pub unselect_on_up: bool,
}

//! A ready-made tree item.
//!
//! [`TreeNode`] implements [`TreeItem`] with plain stored state, for callers
//! that do not have their own node type.
//!
//! # Example
//!
//! ```
//! use lattice_treeview::{ItemRef, TreeNode};
//!
//! let leaf1: ItemRef = TreeNode::leaf("Leaf1").into();
//! let roots: Vec<ItemRef> = vec![
//!     TreeNode::folder("Folder1")
//!         .expanded(true)
//!         .child(leaf1.clone())
//!         .child(TreeNode::leaf("Leaf2"))
//!         .into(),
//!     TreeNode::leaf("Leaf3").into(),
//! ];
//! assert_eq!(roots.len(), 2);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::item::{CheckState, ItemKey, ItemRef, TreeItem};

struct NodeState {
    text: String,
    folder: bool,
    expanded: bool,
    selectable: bool,
    disabled: bool,
    bold: bool,
    renamable: bool,
    check: CheckState,
    children: Vec<ItemRef>,
}

/// A tree item with stored text, flags and children.
pub struct TreeNode {
    state: RwLock<NodeState>,
}

impl TreeNode {
    fn new(text: impl Into<String>, folder: bool) -> Self {
        Self {
            state: RwLock::new(NodeState {
                text: text.into(),
                folder,
                expanded: false,
                selectable: true,
                disabled: false,
                bold: false,
                renamable: true,
                check: CheckState::None,
                children: Vec::new(),
            }),
        }
    }

    /// Create a non-folder item.
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Create a collapsed folder.
    pub fn folder(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    // =========================================================================
    // Builder Pattern
    // =========================================================================

    /// Append a child.
    pub fn child(self, child: impl Into<ItemRef>) -> Self {
        self.state.write().children.push(child.into());
        self
    }

    /// Set the initial expansion state.
    pub fn expanded(self, expanded: bool) -> Self {
        self.state.write().expanded = expanded;
        self
    }

    pub fn selectable(self, selectable: bool) -> Self {
        self.state.write().selectable = selectable;
        self
    }

    pub fn disabled(self, disabled: bool) -> Self {
        self.state.write().disabled = disabled;
        self
    }

    pub fn bold(self, bold: bool) -> Self {
        self.state.write().bold = bold;
        self
    }

    /// Allow or forbid label editing. Allowed by default.
    pub fn renamable(self, renamable: bool) -> Self {
        self.state.write().renamable = renamable;
        self
    }

    pub fn with_check_state(self, check: CheckState) -> Self {
        self.state.write().check = check;
        self
    }

    // =========================================================================
    // Runtime Mutation
    // =========================================================================

    /// Current text.
    pub fn text(&self) -> String {
        self.state.read().text.clone()
    }

    /// Replace the text. The view must be told to remeasure.
    pub fn set_text(&self, text: impl Into<String>) {
        self.state.write().text = text.into();
    }

    pub fn set_check_state(&self, check: CheckState) {
        self.state.write().check = check;
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.state.write().disabled = disabled;
    }

    pub fn set_selectable(&self, selectable: bool) {
        self.state.write().selectable = selectable;
    }

    /// Append a child at runtime.
    pub fn push_child(&self, child: impl Into<ItemRef>) {
        self.state.write().children.push(child.into());
    }

    /// Insert a child at `position` (clamped to the child count).
    pub fn insert_child(&self, position: usize, child: impl Into<ItemRef>) {
        let mut state = self.state.write();
        let position = position.min(state.children.len());
        state.children.insert(position, child.into());
    }

    /// Remove a child by identity. Returns `false` if it was not a child.
    pub fn remove_child(&self, child: &ItemRef) -> bool {
        let key = ItemKey::of(child);
        let mut state = self.state.write();
        let before = state.children.len();
        state.children.retain(|c| ItemKey::of(c) != key);
        state.children.len() != before
    }

    pub fn child_count(&self) -> usize {
        self.state.read().children.len()
    }
}

impl TreeItem for TreeNode {
    fn display_text(&self) -> String {
        self.text()
    }

    fn is_folder(&self) -> bool {
        self.state.read().folder
    }

    fn is_expanded(&self) -> bool {
        let state = self.state.read();
        state.folder && state.expanded
    }

    fn is_selectable(&self) -> bool {
        self.state.read().selectable
    }

    fn is_disabled(&self) -> bool {
        self.state.read().disabled
    }

    fn is_bold(&self) -> bool {
        self.state.read().bold
    }

    fn check_state(&self) -> CheckState {
        self.state.read().check
    }

    fn children(&self) -> Vec<ItemRef> {
        self.state.read().children.clone()
    }

    fn set_is_expanded(&self, expanded: bool) {
        self.state.write().expanded = expanded;
    }

    fn can_rename(&self) -> bool {
        self.state.read().renamable
    }

    fn set_new_text(&self, text: &str) {
        self.set_text(text);
    }
}

impl From<TreeNode> for ItemRef {
    fn from(node: TreeNode) -> Self {
        Arc::new(node)
    }
}

static_assertions::assert_impl_all!(TreeNode: Send, Sync);

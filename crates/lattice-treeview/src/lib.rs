//! Lattice TreeView - a virtualized tree/list view core.
//!
//! Turns a caller-owned hierarchy of [`TreeItem`]s into a flat sequence of
//! visible rows and keeps everything a tree view widget needs on top of it:
//!
//! - **Flattening**: the [`VisibleSequence`] with an identity index
//! - **Measurement**: lazy text-width measurement and scrollbar resolution
//! - **Geometry**: row rectangles and part-level hit-testing
//! - **Selection**: single/multi selection and focus, preserved across rebuilds
//! - **Scrolling**: virtualized [`ScrollAxis`] with keyboard paging
//! - **Drag and drop**: insertion-point resolution and drag-over auto-scroll
//! - **Label editing**: start/commit/cancel of in-place renames
//!
//! Drawing, native scrollbars and edit controls are left to the host, which
//! talks to [`TreeView`] through plain method calls and [`Signal`]s.

pub mod config;
pub mod drag_drop;
pub mod error;
pub mod geometry;
pub mod input;
mod interaction;
pub mod item;
pub mod label_edit;
pub mod measure;
pub mod metrics;
pub mod node;
pub mod scroll;
mod selection;
pub mod view;
pub mod visible;

pub use lattice_treeview_core::{ConnectionGuard, ConnectionId, Point, Rect, Signal, Size};

pub use config::TreeViewConfig;
pub use drag_drop::{DropInfo, InsertMark, InsertPosition, classify_drop};
pub use error::{Result, TreeError};
pub use geometry::{HitTest, RowLayout, TvParts};
pub use input::{Key, KeyboardModifiers, MouseButton, TvItemEvent};
pub use item::{CheckState, ItemKey, ItemRef, TreeItem};
pub use label_edit::{LabelEditEnded, LabelEditStarted, LabelEditState};
pub use measure::{MeasureStats, ScrollbarInput, ScrollbarNeeds, TextMeasurer, resolve_scrollbars};
pub use metrics::Metrics;
pub use node::TreeNode;
pub use scroll::{ScrollAxis, ScrollSource};
pub use view::{RepaintRegion, RowPaint, TreeView};
pub use visible::{VisibleItem, VisibleSequence};

//! Logging facilities for Lattice TreeView.
//!
//! Lattice TreeView uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("lattice_treeview::measure=trace")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_treeview_core::signal";
    /// Flattener (visible sequence rebuild) target.
    pub const FLATTEN: &str = "lattice_treeview::flatten";
    /// Measurement engine and scrollbar resolution target.
    pub const MEASURE: &str = "lattice_treeview::measure";
    /// Selection and focus target.
    pub const SELECTION: &str = "lattice_treeview::selection";
    /// Scroll virtualization target.
    pub const SCROLL: &str = "lattice_treeview::scroll";
    /// Drag-drop insertion target.
    pub const DRAG_DROP: &str = "lattice_treeview::drag_drop";
    /// Label editing target.
    pub const LABEL_EDIT: &str = "lattice_treeview::label_edit";
    /// Keyboard and pointer input target.
    pub const INPUT: &str = "lattice_treeview::input";
}

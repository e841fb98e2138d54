//! Lattice TreeView Core
//!
//! Plumbing shared by the tree view crates:
//!
//! - **Signal/Slot System**: Synchronous notifications ([`Signal`])
//! - **Geometry**: Physical-pixel [`Point`], [`Size`] and [`Rect`]
//! - **Logging**: `tracing` target names for per-subsystem filtering
//!
//! # Example
//!
//! ```
//! use lattice_treeview_core::{Point, Rect, Signal};
//!
//! let hovered = Signal::<Point>::new();
//! let row = Rect::new(0, 20, 200, 20);
//! hovered.connect(move |p| {
//!     assert!(row.contains(*p));
//! });
//! hovered.emit(Point::new(5, 25));
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use signal::{ConnectionGuard, ConnectionId, Signal};

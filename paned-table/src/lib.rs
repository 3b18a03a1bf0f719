//! A headless coordination layer for windowed tables with frozen column panes.
//!
//! For adapter-level utilities (fixed-row windows, input routing), see the
//! `paned-table-adapter` crate.
//!
//! A table is drawn as up to three independently windowed grids: the main pane plus optional
//! left and right frozen panes. This crate keeps them consistent: one authoritative scroll
//! offset mirrored across panes, one flattened row sequence (tree rows with expandable
//! children), one column model with per-pane partitions and live resize overrides, and
//! scrollbar presence resolved from content and viewport sizes.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - a [`PaneWindow`] per pane (the actual windowing primitive)
//! - user scroll offsets and rendered row ranges reported back by those windows
//! - the platform scrollbar thickness
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod column;
mod emitter;
mod error;
mod expansion;
mod flatten;
mod key;
mod memo;
mod options;
mod pane;
mod renderer;
mod resize;
mod scrollbar;
mod sort;
mod table;
mod types;

#[cfg(test)]
mod tests;

pub use column::{
    Column, ColumnAlign, ColumnModel, ColumnNode, Frozen, PaneColumn, normalize_columns,
};
pub use emitter::{EventCallback, TableEvent};
pub use error::{Result, TableError};
pub use expansion::{ExpansionController, ExpansionProposal, Managed};
pub use flatten::{
    FlatRowEntry, FlatRows, RowKeyAccessor, Rows, TreeRow, flatten, frozen_entries, key_field,
};
pub use options::{
    DEFAULT_END_REACHED_THRESHOLD, DEFAULT_RESIZE_THROTTLE_MS, DEFAULT_SCROLLBAR_SIZE,
    ExpansionMode, TableOptions,
};
pub use pane::{OffsetPane, PaneWindow};
pub use renderer::{
    CellProps, CellRenderer, ExpandIconProps, ExpandIconRenderer, HeaderProps, HeaderRenderer,
    INDENT_PER_LEVEL, RendererRegistry,
};
pub use resize::{ResizeController, ResizeSession};
pub use scrollbar::{ScrollbarInputs, ScrollbarResolver, resolve_scrollbars};
pub use sort::{SortBy, SortOrder, SortState};
pub use table::PaneTable;
pub use types::{
    Align, PaneGeometry, PaneId, ResizingLine, RowKey, RowsRendered, ScrollDirection,
    ScrollDirections, ScrollOffset, ScrollbarPresence, TableHeight,
};

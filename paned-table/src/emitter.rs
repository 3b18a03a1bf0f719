use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{
    RowKey, RowsRendered, ScrollDirections, ScrollOffset, ScrollbarPresence, SortOrder,
};

/// Notifications raised by a [`crate::PaneTable`].
#[derive(Debug)]
pub enum TableEvent<R> {
    Scroll {
        offset: ScrollOffset,
        directions: ScrollDirections,
        /// `true` when the scroll was requested through the imperative API.
        programmatic: bool,
    },
    RowsRendered(RowsRendered),
    EndReached {
        distance_from_end: i64,
    },
    ScrollbarPresenceChange(ScrollbarPresence),
    RowHover {
        previous: Option<RowKey>,
        hovered: Option<RowKey>,
    },
    RowExpand {
        row: Arc<R>,
        key: RowKey,
        row_index: usize,
        expanded: bool,
    },
    ExpandedRowsChange {
        keys: Vec<RowKey>,
    },
    ColumnResize {
        key: String,
        width: u32,
    },
    ColumnResizeEnd {
        key: String,
        width: u32,
    },
    /// A proposed sort; applying it is up to the caller.
    ColumnSort {
        key: String,
        order: SortOrder,
    },
}

impl<R> Clone for TableEvent<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Scroll {
                offset,
                directions,
                programmatic,
            } => Self::Scroll {
                offset: *offset,
                directions: *directions,
                programmatic: *programmatic,
            },
            Self::RowsRendered(r) => Self::RowsRendered(*r),
            Self::EndReached { distance_from_end } => Self::EndReached {
                distance_from_end: *distance_from_end,
            },
            Self::ScrollbarPresenceChange(p) => Self::ScrollbarPresenceChange(*p),
            Self::RowHover { previous, hovered } => Self::RowHover {
                previous: previous.clone(),
                hovered: hovered.clone(),
            },
            Self::RowExpand {
                row,
                key,
                row_index,
                expanded,
            } => Self::RowExpand {
                row: Arc::clone(row),
                key: key.clone(),
                row_index: *row_index,
                expanded: *expanded,
            },
            Self::ExpandedRowsChange { keys } => Self::ExpandedRowsChange { keys: keys.clone() },
            Self::ColumnResize { key, width } => Self::ColumnResize {
                key: key.clone(),
                width: *width,
            },
            Self::ColumnResizeEnd { key, width } => Self::ColumnResizeEnd {
                key: key.clone(),
                width: *width,
            },
            Self::ColumnSort { key, order } => Self::ColumnSort {
                key: key.clone(),
                order: *order,
            },
        }
    }
}

/// A callback receiving every [`TableEvent`].
pub type EventCallback<R> = Arc<dyn Fn(&TableEvent<R>) + Send + Sync>;

/// Queues events raised while state is being mutated and delivers them once the outermost
/// operation completes.
pub(crate) struct EventQueue<R> {
    depth: usize,
    pending: Vec<TableEvent<R>>,
}

impl<R> EventQueue<R> {
    pub(crate) fn new() -> Self {
        Self {
            depth: 0,
            pending: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: TableEvent<R>) {
        self.pending.push(event);
    }

    pub(crate) fn enter(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Leaves one nesting level. Returns the events to deliver when the outermost level exits.
    pub(crate) fn exit(&mut self) -> Vec<TableEvent<R>> {
        debug_assert!(self.depth > 0, "event queue depth underflow");
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return Vec::new();
        }
        core::mem::take(&mut self.pending)
    }
}

impl<R> core::fmt::Debug for EventQueue<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventQueue")
            .field("depth", &self.depth)
            .field("pending", &self.pending.len())
            .finish()
    }
}

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{
    Column, ColumnNode, EventCallback, RendererRegistry, RowKey, RowKeyAccessor, Rows, SortState,
    TableEvent, TableHeight, TreeRow, key_field,
};

/// Thickness used for frozen-pane offsets until a real scrollbar size is known.
pub const DEFAULT_SCROLLBAR_SIZE: u32 = 20;

/// Default distance (in pixels) from the end of the content at which `EndReached` fires.
pub const DEFAULT_END_REACHED_THRESHOLD: u64 = 500;

/// Default minimum interval between intermediate column resize notifications.
pub const DEFAULT_RESIZE_THROTTLE_MS: u64 = 16;

/// Ownership of the expanded row keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpansionMode {
    /// The table owns the keys, starting from the given defaults.
    Uncontrolled { default_keys: Vec<RowKey> },
    /// The caller owns the keys; the table only proposes changes.
    Controlled(Vec<RowKey>),
}

impl Default for ExpansionMode {
    fn default() -> Self {
        Self::Uncontrolled {
            default_keys: Vec::new(),
        }
    }
}

/// Configuration for [`crate::PaneTable`].
///
/// Cheap to clone: row collections and callbacks are stored in `Arc`s.
pub struct TableOptions<R> {
    pub data: Rows<R>,
    /// Rows pinned above the scrollable body.
    pub frozen_data: Rows<R>,
    pub columns: Vec<ColumnNode>,
    pub row_key: RowKeyAccessor<R>,

    pub width: u32,
    pub height: TableHeight,
    pub row_height: u32,
    pub header_height: u32,
    pub footer_height: u32,

    /// When `true`, columns keep their widths and may overflow horizontally. When `false`,
    /// columns flex to fill the width and never overflow.
    pub fixed: bool,

    pub expansion: ExpansionMode,
    /// Column hosting the expand icon.
    pub expand_column_key: Option<String>,
    pub sort: SortState,

    pub overscan: usize,
    pub end_reached_threshold: u64,
    /// Overrides the probed scrollbar thickness.
    pub scrollbar_size: Option<u32>,
    pub resize_throttle_ms: u64,

    pub renderers: RendererRegistry<R>,
    pub on_event: Option<EventCallback<R>>,
}

impl<R> Clone for TableOptions<R> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            frozen_data: Arc::clone(&self.frozen_data),
            columns: self.columns.clone(),
            row_key: Arc::clone(&self.row_key),
            width: self.width,
            height: self.height,
            row_height: self.row_height,
            header_height: self.header_height,
            footer_height: self.footer_height,
            fixed: self.fixed,
            expansion: self.expansion.clone(),
            expand_column_key: self.expand_column_key.clone(),
            sort: self.sort.clone(),
            overscan: self.overscan,
            end_reached_threshold: self.end_reached_threshold,
            scrollbar_size: self.scrollbar_size,
            resize_throttle_ms: self.resize_throttle_ms,
            renderers: self.renderers.clone(),
            on_event: self.on_event.clone(),
        }
    }
}

impl<R: TreeRow + 'static> TableOptions<R> {
    /// Creates options for an empty table keyed by the `"id"` field.
    pub fn new(width: u32, height: TableHeight) -> Self {
        Self {
            data: Arc::from(Vec::new()),
            frozen_data: Arc::from(Vec::new()),
            columns: Vec::new(),
            row_key: key_field("id"),
            width,
            height,
            row_height: 50,
            header_height: 50,
            footer_height: 0,
            fixed: false,
            expansion: ExpansionMode::default(),
            expand_column_key: None,
            sort: SortState::Unsorted,
            overscan: 1,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            scrollbar_size: None,
            resize_throttle_ms: DEFAULT_RESIZE_THROTTLE_MS,
            renderers: RendererRegistry::default(),
            on_event: None,
        }
    }

    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.row_key = key_field(field);
        self
    }
}

impl<R> TableOptions<R> {
    pub fn with_data(mut self, data: impl Into<Rows<R>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_frozen_data(mut self, frozen_data: impl Into<Rows<R>>) -> Self {
        self.frozen_data = frozen_data.into();
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns = columns.into_iter().map(ColumnNode::from).collect();
        self
    }

    pub fn with_column_nodes(mut self, columns: Vec<ColumnNode>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_row_key(
        mut self,
        row_key: impl Fn(&R) -> Option<RowKey> + Send + Sync + 'static,
    ) -> Self {
        self.row_key = Arc::new(row_key);
        self
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn with_footer_height(mut self, footer_height: u32) -> Self {
        self.footer_height = footer_height;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_default_expanded_keys(mut self, keys: Vec<RowKey>) -> Self {
        self.expansion = ExpansionMode::Uncontrolled { default_keys: keys };
        self
    }

    pub fn with_expanded_keys(mut self, keys: Vec<RowKey>) -> Self {
        self.expansion = ExpansionMode::Controlled(keys);
        self
    }

    pub fn with_expand_column_key(mut self, key: impl Into<String>) -> Self {
        self.expand_column_key = Some(key.into());
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_end_reached_threshold(mut self, threshold: u64) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    pub fn with_scrollbar_size(mut self, size: Option<u32>) -> Self {
        self.scrollbar_size = size;
        self
    }

    pub fn with_resize_throttle_ms(mut self, interval_ms: u64) -> Self {
        self.resize_throttle_ms = interval_ms;
        self
    }

    pub fn with_renderers(mut self, renderers: RendererRegistry<R>) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_on_event(
        mut self,
        on_event: Option<impl Fn(&TableEvent<R>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_event = on_event.map(|f| Arc::new(f) as _);
        self
    }
}

impl<R> core::fmt::Debug for TableOptions<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableOptions")
            .field("rows", &self.data.len())
            .field("frozen_rows", &self.frozen_data.len())
            .field("columns", &self.columns.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_height", &self.row_height)
            .field("header_height", &self.header_height)
            .field("footer_height", &self.footer_height)
            .field("fixed", &self.fixed)
            .field("expansion", &self.expansion)
            .field("sort", &self.sort)
            .field("overscan", &self.overscan)
            .field("end_reached_threshold", &self.end_reached_threshold)
            .field("scrollbar_size", &self.scrollbar_size)
            .finish_non_exhaustive()
    }
}

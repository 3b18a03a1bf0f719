use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp;

use crate::emitter::EventQueue;
use crate::memo::Memo;
use crate::options::DEFAULT_SCROLLBAR_SIZE;
use crate::pane::PaneSet;
use crate::{
    Align, CellProps, ColumnModel, ColumnNode, ExpansionController, ExpansionMode, FlatRowEntry,
    FlatRows, Frozen, HeaderProps, OffsetPane, PaneGeometry, PaneId, PaneWindow, ResizeController,
    ResizeSession, ResizingLine, Result, RowKey, RowKeyAccessor, Rows, RowsRendered,
    ScrollDirection, ScrollDirections, ScrollOffset, ScrollbarInputs, ScrollbarPresence,
    ScrollbarResolver, SortOrder, SortState, TableError, TableEvent, TableHeight, TableOptions,
    TreeRow, flatten, frozen_entries, normalize_columns,
};

struct FlattenInputs<R> {
    rows: Rows<R>,
    expanded: Vec<RowKey>,
    row_key: RowKeyAccessor<R>,
}

impl<R> FlattenInputs<R> {
    fn same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.rows, &b.rows)
            && Arc::ptr_eq(&a.row_key, &b.row_key)
            && a.expanded == b.expanded
    }
}

/// Bookkeeping for end-reached detection.
#[derive(Clone, Copy, Debug)]
struct EndReach {
    /// Highest overscan stop index reported since the data last changed; -1 before any.
    last_scanned_row: i64,
    data_changed: bool,
    /// Content height at the last firing.
    scroll_height: u64,
}

impl EndReach {
    fn new() -> Self {
        Self {
            last_scanned_row: -1,
            data_changed: true,
            scroll_height: 0,
        }
    }

    fn rearm(&mut self) {
        self.last_scanned_row = -1;
        self.data_changed = true;
    }
}

/// Coordinates the main pane and the optional left/right frozen panes of a windowed table.
///
/// The table owns the authoritative scroll offset, the column model, the expanded-row state and
/// the flattened rows. Every pane reads the same flattened rows; vertical scrolling is mirrored
/// across panes, horizontal scrolling only applies to the main pane.
///
/// All operations are synchronous. Events raised by an operation are delivered to
/// `on_event` after the operation's state changes are complete.
pub struct PaneTable<R, W = OffsetPane> {
    options: TableOptions<R>,
    columns: ColumnModel,
    expansion: ExpansionController,
    flat_memo: Memo<FlattenInputs<R>, Arc<FlatRows<R>>>,
    flat: Arc<FlatRows<R>>,
    frozen_rows: Vec<FlatRowEntry<R>>,
    data_epoch: u64,

    scroll: ScrollOffset,
    measured_scrollbar_size: u32,
    scrollbars: ScrollbarResolver,
    end_reach: EndReach,

    resize: ResizeController,
    hovered: Option<RowKey>,
    panes: PaneSet<W>,
    events: EventQueue<R>,
}

impl<R: TreeRow, W: PaneWindow + Default> PaneTable<R, W> {
    /// Builds a table from options.
    ///
    /// Fails on configuration errors (duplicate column keys, rows without keys, duplicate row
    /// keys among the flattened rows).
    pub fn new(options: TableOptions<R>) -> Result<Self> {
        let columns = ColumnModel::from_nodes(&options.columns, options.fixed)?;
        let expansion = match &options.expansion {
            ExpansionMode::Uncontrolled { default_keys } => {
                ExpansionController::uncontrolled(default_keys.clone())
            }
            ExpansionMode::Controlled(keys) => ExpansionController::controlled(keys.clone()),
        };
        let frozen_rows = frozen_entries(&options.frozen_data, &*options.row_key)?;

        let mut flat_memo = Memo::new();
        let flat = Arc::clone(flat_memo.get_or_try_compute(
            FlattenInputs {
                rows: Arc::clone(&options.data),
                expanded: expansion.keys().to_vec(),
                row_key: Arc::clone(&options.row_key),
            },
            FlattenInputs::same,
            |i| flatten(&i.rows, &i.expanded, &*i.row_key).map(Arc::new),
        )?);

        pdebug!(
            rows = flat.len(),
            frozen_rows = frozen_rows.len(),
            columns = columns.columns().len(),
            "PaneTable::new"
        );

        let resize = ResizeController::new(options.resize_throttle_ms);
        let mut table = Self {
            options,
            columns,
            expansion,
            flat_memo,
            flat,
            frozen_rows,
            data_epoch: 0,
            scroll: ScrollOffset::default(),
            measured_scrollbar_size: 0,
            scrollbars: ScrollbarResolver::new(),
            end_reach: EndReach::new(),
            resize,
            hovered: None,
            panes: PaneSet::default(),
            events: EventQueue::new(),
        };
        table.batch_update(|t| {
            t.sync_panes();
            t.refresh_layout();
        });
        Ok(table)
    }

    pub fn options(&self) -> &TableOptions<R> {
        &self.options
    }

    /// Runs `f` and delivers the events it raised once, after it returns.
    pub fn batch_update<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.events.enter();
        let out = f(self);
        let events = self.events.exit();
        if let Some(cb) = &self.options.on_event {
            for event in &events {
                cb(event);
            }
        }
        out
    }

    // ---- derived geometry ----

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn flat_rows(&self) -> &Arc<FlatRows<R>> {
        &self.flat
    }

    pub fn row(&self, row_index: usize) -> Option<&FlatRowEntry<R>> {
        self.flat.get(row_index)
    }

    pub fn frozen_rows(&self) -> &[FlatRowEntry<R>] {
        &self.frozen_rows
    }

    pub fn depth_of(&self, key: &RowKey) -> Option<u32> {
        self.flat.depth_of(key)
    }

    /// Incremented every time the row data identity changes.
    pub fn data_epoch(&self) -> u64 {
        self.data_epoch
    }

    pub(crate) fn flatten_runs(&self) -> u64 {
        self.flat_memo.computed()
    }

    /// Scrollbar thickness in effect: the override if set, the probed size otherwise.
    pub fn scrollbar_size(&self) -> u32 {
        self.options
            .scrollbar_size
            .unwrap_or(self.measured_scrollbar_size)
    }

    pub fn scrollbar_presence(&self) -> ScrollbarPresence {
        self.scrollbars.current()
    }

    pub fn total_rows_height(&self) -> u64 {
        self.flat.len() as u64 * self.options.row_height as u64
    }

    pub fn frozen_rows_height(&self) -> u64 {
        self.frozen_rows.len() as u64 * self.options.row_height as u64
    }

    fn table_height_with(&self, horizontal_size: u32) -> u32 {
        let footer = self.options.footer_height;
        match self.options.height {
            TableHeight::Fixed(height) => height.saturating_sub(footer),
            TableHeight::Max(max_height) => {
                let total = self.options.header_height as u64
                    + self.frozen_rows_height()
                    + self.total_rows_height()
                    + horizontal_size as u64;
                saturate_u32(cmp::min(total, max_height.saturating_sub(footer) as u64))
            }
        }
    }

    /// Height of the table without its footer.
    pub fn table_height(&self) -> u32 {
        self.table_height_with(self.scrollbars.current().horizontal_size)
    }

    fn body_height_with(&self, horizontal_size: u32) -> u32 {
        let reserved = self.options.header_height as u64 + self.frozen_rows_height();
        saturate_u32((self.table_height_with(horizontal_size) as u64).saturating_sub(reserved))
    }

    /// Height of the scrolled body area (headers and frozen rows excluded).
    pub fn body_height(&self) -> u32 {
        self.body_height_with(self.scrollbars.current().horizontal_size)
    }

    fn frozen_container_height(&self) -> u32 {
        let horizontal = if self.flat.is_empty() {
            0
        } else {
            self.scrollbars.current().horizontal_size
        };
        let height = self.table_height().saturating_sub(horizontal);
        match self.options.height {
            TableHeight::Max(_) => height,
            TableHeight::Fixed(_) => {
                let total = self.total_rows_height()
                    + self.options.header_height as u64
                    + self.frozen_rows_height();
                saturate_u32(cmp::min(height as u64, total))
            }
        }
    }

    /// Geometry of a pane, or `None` when the pane does not exist.
    pub fn pane_geometry(&self, pane: PaneId) -> Option<PaneGeometry> {
        if !self.columns.has_pane(pane) {
            return None;
        }
        let presence = self.scrollbars.current();
        let vertical = presence.vertical_size;
        let width = self.options.width;
        let reserved = self.options.header_height as u64 + self.frozen_rows_height();
        let base = PaneGeometry {
            header_height: self.options.header_height,
            row_height: self.options.row_height,
            row_count: self.flat.len(),
            frozen_row_count: self.frozen_rows.len(),
            overscan: self.options.overscan,
            ..PaneGeometry::default()
        };

        let geometry = match pane {
            PaneId::Main => {
                let mut body_width = width.saturating_sub(vertical);
                if self.columns.is_fixed() {
                    body_width = body_width.max(saturate_u32(self.columns.columns_width()));
                }
                PaneGeometry {
                    container_width: width,
                    width,
                    body_width,
                    height: self.table_height(),
                    body_height: self.body_height(),
                    ..base
                }
            }
            PaneId::Left => {
                let columns_width = saturate_u32(self.columns.left_frozen_width());
                // The grid is wider than its container so its own scrollbar stays clipped.
                let offset = if vertical == 0 {
                    DEFAULT_SCROLLBAR_SIZE
                } else {
                    vertical
                };
                let height = self.frozen_container_height();
                PaneGeometry {
                    container_width: columns_width,
                    width: columns_width.saturating_add(offset),
                    body_width: columns_width.saturating_add(offset),
                    height,
                    body_height: saturate_u32((height as u64).saturating_sub(reserved)),
                    ..base
                }
            }
            PaneId::Right => {
                let columns_width = saturate_u32(self.columns.right_frozen_width());
                let height = self.frozen_container_height();
                PaneGeometry {
                    container_width: columns_width.saturating_add(vertical),
                    width: columns_width.saturating_add(vertical),
                    body_width: columns_width,
                    height,
                    body_height: saturate_u32((height as u64).saturating_sub(reserved)),
                    ..base
                }
            }
        };
        Some(geometry)
    }

    pub fn pane(&self, pane: PaneId) -> Option<&W> {
        self.panes.get(pane)
    }

    pub fn pane_mut(&mut self, pane: PaneId) -> Option<&mut W> {
        self.panes.get_mut(pane)
    }

    fn sync_panes(&mut self) {
        let offset = self.scroll;
        self.panes
            .ensure(PaneId::Left, self.columns.has_left_frozen(), offset);
        self.panes
            .ensure(PaneId::Right, self.columns.has_right_frozen(), offset);
    }

    /// Re-resolves scrollbar presence and pushes geometry to every pane.
    fn refresh_layout(&mut self) {
        let thickness = self.scrollbar_size();
        let inputs = ScrollbarInputs {
            content_width: self.columns.columns_width(),
            content_height: self.total_rows_height(),
            viewport_width: self.options.width,
            viewport_height: self.body_height_with(0),
            viewport_height_reserved: self.body_height_with(thickness),
            thickness,
            fixed: self.columns.is_fixed(),
        };
        self.scrollbars.resolve(inputs);
        if let Some(presence) = self.scrollbars.take_change() {
            self.events
                .push(TableEvent::ScrollbarPresenceChange(presence));
        }

        for pane in PaneId::ALL {
            let Some(geometry) = self.pane_geometry(pane) else {
                continue;
            };
            if let Some(window) = self.panes.get_mut(pane) {
                window.apply_geometry(geometry);
            }
        }

        // Shrunk content or columns: pull the offset back into range.
        let clamped = self.clamp_scroll_offset(self.scroll);
        if clamped != self.scroll {
            pdebug!(left = clamped.left, top = clamped.top, "scroll offset clamped");
            self.apply_scroll(clamped, None, true);
        }
    }

    // ---- configuration updates ----

    /// Replaces the body rows. A new data identity re-arms end-reached detection.
    pub fn set_data(&mut self, data: impl Into<Rows<R>>) -> Result<()> {
        let data = data.into();
        if Arc::ptr_eq(&self.options.data, &data) {
            return Ok(());
        }
        let flat = self.reflatten(Arc::clone(&data), self.expansion.keys().to_vec())?;
        pdebug!(rows = flat.len(), "set_data");
        self.batch_update(|t| {
            t.options.data = data;
            t.flat = flat;
            t.data_epoch = t.data_epoch.saturating_add(1);
            t.end_reach.rearm();
            t.refresh_layout();
        });
        Ok(())
    }

    pub fn set_frozen_data(&mut self, frozen_data: impl Into<Rows<R>>) -> Result<()> {
        let frozen_data = frozen_data.into();
        if Arc::ptr_eq(&self.options.frozen_data, &frozen_data) {
            return Ok(());
        }
        let frozen_rows = frozen_entries(&frozen_data, &*self.options.row_key)?;
        self.batch_update(|t| {
            t.options.frozen_data = frozen_data;
            t.frozen_rows = frozen_rows;
            t.refresh_layout();
        });
        Ok(())
    }

    pub fn set_row_key(
        &mut self,
        row_key: impl Fn(&R) -> Option<RowKey> + Send + Sync + 'static,
    ) -> Result<()> {
        let row_key: RowKeyAccessor<R> = Arc::new(row_key);
        let frozen_rows = frozen_entries(&self.options.frozen_data, &*row_key)?;
        let prev = core::mem::replace(&mut self.options.row_key, row_key);
        let flat = match self.reflatten(
            Arc::clone(&self.options.data),
            self.expansion.keys().to_vec(),
        ) {
            Ok(flat) => flat,
            Err(err) => {
                self.options.row_key = prev;
                return Err(err);
            }
        };
        self.batch_update(|t| {
            t.flat = flat;
            t.frozen_rows = frozen_rows;
            t.refresh_layout();
        });
        Ok(())
    }

    fn reflatten(&mut self, rows: Rows<R>, expanded: Vec<RowKey>) -> Result<Arc<FlatRows<R>>> {
        let inputs = FlattenInputs {
            rows,
            expanded,
            row_key: Arc::clone(&self.options.row_key),
        };
        self.flat_memo
            .get_or_try_compute(inputs, FlattenInputs::same, |i| {
                flatten(&i.rows, &i.expanded, &*i.row_key).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// Replaces the column declarations. Deep-equal declarations are a no-op.
    pub fn set_columns(&mut self, columns: Vec<ColumnNode>) -> Result<()> {
        let declared = normalize_columns(&columns);
        let fixed = self.columns.is_fixed();
        if !self.columns.reset(declared, fixed)? {
            return Ok(());
        }
        self.options.columns = columns;
        self.batch_update(|t| {
            t.sync_panes();
            t.refresh_layout();
        });
        Ok(())
    }

    pub fn set_fixed(&mut self, fixed: bool) -> Result<()> {
        let declared = self.columns.declared().to_vec();
        if !self.columns.reset(declared, fixed)? {
            return Ok(());
        }
        self.options.fixed = fixed;
        self.batch_update(|t| t.refresh_layout());
        Ok(())
    }

    pub fn set_dimensions(&mut self, width: u32, height: TableHeight) {
        self.options.width = width;
        self.options.height = height;
        self.batch_update(|t| t.refresh_layout());
    }

    pub fn set_row_heights(&mut self, row_height: u32, header_height: u32, footer_height: u32) {
        self.options.row_height = row_height;
        self.options.header_height = header_height;
        self.options.footer_height = footer_height;
        self.batch_update(|t| t.refresh_layout());
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.batch_update(|t| t.refresh_layout());
    }

    pub fn set_end_reached_threshold(&mut self, threshold: u64) {
        self.options.end_reached_threshold = threshold;
    }

    /// Overrides the scrollbar thickness (`None` falls back to the probed size).
    pub fn set_scrollbar_size(&mut self, size: Option<u32>) {
        self.options.scrollbar_size = size;
        self.batch_update(|t| t.refresh_layout());
    }

    /// Records the scrollbar thickness probed on the current platform.
    pub fn set_measured_scrollbar_size(&mut self, size: u32) {
        if self.measured_scrollbar_size == size {
            return;
        }
        self.measured_scrollbar_size = size;
        self.batch_update(|t| t.refresh_layout());
    }

    pub fn set_resize_throttle_ms(&mut self, interval_ms: u64) {
        self.options.resize_throttle_ms = interval_ms;
        self.resize.set_interval_ms(interval_ms);
    }

    /// Recomputes every derived value and asks each pane to redraw.
    pub fn force_update(&mut self) -> Result<()> {
        self.flat_memo.invalidate();
        let flat = self.reflatten(
            Arc::clone(&self.options.data),
            self.expansion.keys().to_vec(),
        )?;
        self.batch_update(|t| {
            t.flat = flat;
            t.refresh_layout();
            t.panes.for_each_mut(|_, window| window.force_update());
        });
        Ok(())
    }

    // ---- scrolling ----

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn max_scroll_top(&self) -> u64 {
        let content = self.total_rows_height() + self.scrollbars.current().horizontal_size as u64;
        content.saturating_sub(self.body_height() as u64)
    }

    pub fn max_scroll_left(&self) -> u64 {
        if !self.columns.is_fixed() {
            return 0;
        }
        let viewport = self
            .options
            .width
            .saturating_sub(self.scrollbars.current().vertical_size);
        self.columns
            .columns_width()
            .saturating_sub(viewport as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: ScrollOffset) -> ScrollOffset {
        ScrollOffset {
            left: offset.left.min(self.max_scroll_left()),
            top: offset.top.min(self.max_scroll_top()),
        }
    }

    /// Programmatically scrolls every pane. The offset is clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: ScrollOffset) {
        let offset = self.clamp_scroll_offset(offset);
        self.batch_update(|t| t.apply_scroll(offset, None, true));
    }

    pub fn scroll_to_top(&mut self, top: u64) {
        let left = self.scroll.left;
        self.scroll_to(ScrollOffset { left, top });
    }

    pub fn scroll_to_left(&mut self, left: u64) {
        let top = self.scroll.top;
        self.scroll_to(ScrollOffset { left, top });
    }

    /// Scrolls a body row into view. Returns the applied top offset.
    pub fn scroll_to_row(&mut self, row_index: usize, align: Align) -> u64 {
        let top = self.scroll_to_row_offset(row_index, align);
        self.scroll_to_top(top);
        self.scroll.top
    }

    /// Computes the top offset that brings a body row into view with the given alignment.
    pub fn scroll_to_row_offset(&self, row_index: usize, align: Align) -> u64 {
        let count = self.flat.len();
        if count == 0 {
            return 0;
        }
        let row_index = row_index.min(count - 1) as u64;
        let row_height = self.options.row_height as u64;
        let viewport = self
            .body_height()
            .saturating_sub(self.scrollbars.current().horizontal_size) as u64;
        let last_offset = self.total_rows_height().saturating_sub(viewport);

        let max_offset = cmp::min(last_offset, row_index * row_height);
        let min_offset = (row_index * row_height + row_height).saturating_sub(viewport);
        let current = self.scroll.top;

        let align = match align {
            Align::Smart
                if current >= min_offset.saturating_sub(viewport)
                    && current <= max_offset.saturating_add(viewport) =>
            {
                Align::Auto
            }
            Align::Smart => Align::Center,
            other => other,
        };

        let target = match align {
            Align::Start => max_offset,
            Align::End => min_offset,
            Align::Center => {
                let middle = (min_offset + max_offset).div_ceil(2);
                if middle < viewport.div_ceil(2) {
                    0
                } else if middle > last_offset + viewport / 2 {
                    last_offset
                } else {
                    middle
                }
            }
            Align::Auto | Align::Smart => {
                if current >= min_offset && current <= max_offset {
                    current
                } else if current < min_offset {
                    min_offset
                } else {
                    max_offset
                }
            }
        };
        target.min(self.max_scroll_top())
    }

    /// Entry point for scroll events reported by a pane's windowing primitive.
    ///
    /// The vertical offset is mirrored to the other panes; the horizontal offset only matters
    /// for the main pane. The reporting pane is never written back to, and an offset equal to
    /// the current one (an echo of a sync) is ignored.
    pub fn on_pane_scrolled(&mut self, pane: PaneId, offset: ScrollOffset) {
        if self.panes.get(pane).is_none() {
            pwarn!(?pane, "scroll reported by a pane that does not exist");
            return;
        }
        let target = if pane.is_frozen() {
            ScrollOffset {
                left: self.scroll.left,
                top: offset.top,
            }
        } else {
            offset
        };
        if target == self.scroll {
            return;
        }
        self.batch_update(|t| t.apply_scroll(target, Some(pane), false));
    }

    fn apply_scroll(&mut self, next: ScrollOffset, origin: Option<PaneId>, programmatic: bool) {
        let prev = self.scroll;
        self.scroll = next;
        ptrace!(
            left = next.left,
            top = next.top,
            ?origin,
            programmatic,
            "apply_scroll"
        );

        self.panes.for_each_mut(|pane, window| {
            if Some(pane) == origin {
                return;
            }
            let offset = match pane {
                PaneId::Main => next,
                PaneId::Left | PaneId::Right => ScrollOffset {
                    left: 0,
                    top: next.top,
                },
            };
            window.apply_offset(offset);
        });

        if prev == next {
            return;
        }
        self.events.push(TableEvent::Scroll {
            offset: next,
            directions: ScrollDirections {
                horizontal: ScrollDirection::between(prev.left, next.left),
                vertical: ScrollDirection::between(prev.top, next.top),
            },
            programmatic,
        });
        if next.top > prev.top {
            self.maybe_end_reached();
        }
    }

    /// Entry point for the main pane's rendered-rows report.
    pub fn on_rows_rendered(&mut self, rendered: RowsRendered) {
        ptrace!(
            overscan_start = rendered.overscan_start,
            overscan_stop = rendered.overscan_stop,
            "on_rows_rendered"
        );
        self.batch_update(|t| {
            t.events.push(TableEvent::RowsRendered(rendered));
            let stop = rendered.overscan_stop as i64;
            if stop > t.end_reach.last_scanned_row {
                t.end_reach.last_scanned_row = stop;
                t.maybe_end_reached();
            }
        });
    }

    /// Remaining scrollable distance below the viewport.
    pub fn distance_from_end(&self) -> i64 {
        self.total_rows_height() as i64 - self.scroll.top as i64 - self.body_height() as i64
            + self.scrollbars.current().horizontal_size as i64
    }

    fn maybe_end_reached(&mut self) {
        let scroll_height = self.total_rows_height();
        if scroll_height == 0 || self.body_height() == 0 {
            return;
        }
        let distance_from_end = self.distance_from_end();
        let reach = &mut self.end_reach;
        if reach.last_scanned_row >= 0
            && distance_from_end <= self.options.end_reached_threshold as i64
            && (reach.data_changed || reach.scroll_height != scroll_height)
        {
            reach.data_changed = false;
            reach.scroll_height = scroll_height;
            pdebug!(distance_from_end, "end reached");
            self.events.push(TableEvent::EndReached { distance_from_end });
        }
    }

    // ---- expansion ----

    pub fn expanded_row_keys(&self) -> &[RowKey] {
        self.expansion.keys()
    }

    pub fn is_row_expanded(&self, key: &RowKey) -> bool {
        self.expansion.is_expanded(key)
    }

    pub fn is_expansion_controlled(&self) -> bool {
        self.expansion.is_controlled()
    }

    /// Expands or collapses the body row at `row_index`.
    ///
    /// When the expanded keys are controlled, local state is left untouched and only the
    /// proposal is reported. Either way `RowExpand` is followed by `ExpandedRowsChange`.
    pub fn set_row_expanded(&mut self, row_index: usize, expanded: bool) -> Result<()> {
        let entry = self
            .flat
            .get(row_index)
            .cloned()
            .ok_or(TableError::UnknownRow(row_index))?;
        let proposal = self.expansion.propose(&entry.key, expanded);

        let flat = if self.expansion.is_controlled() {
            None
        } else {
            Some(self.reflatten(Arc::clone(&self.options.data), proposal.next.clone())?)
        };

        self.batch_update(|t| {
            if let Some(flat) = flat {
                t.expansion.commit(&proposal);
                t.flat = flat;
                t.refresh_layout();
            }
            t.events.push(TableEvent::RowExpand {
                row: entry.row,
                key: proposal.key,
                row_index,
                expanded,
            });
            t.events.push(TableEvent::ExpandedRowsChange {
                keys: proposal.next,
            });
        });
        Ok(())
    }

    pub fn toggle_row_expansion(&mut self, row_index: usize) -> Result<()> {
        let entry = self
            .flat
            .get(row_index)
            .ok_or(TableError::UnknownRow(row_index))?;
        let expanded = !self.expansion.is_expanded(&entry.key);
        self.set_row_expanded(row_index, expanded)
    }

    /// Replaces the expanded keys. Ignored (returns `Ok(false)`) when they are controlled.
    pub fn set_expanded_row_keys(&mut self, keys: Vec<RowKey>) -> Result<bool> {
        if self.expansion.is_controlled() {
            pwarn!("set_expanded_row_keys ignored: expanded keys are controlled");
            return Ok(false);
        }
        let flat = self.reflatten(Arc::clone(&self.options.data), keys.clone())?;
        self.batch_update(|t| {
            t.expansion.set_all(keys);
            t.flat = flat;
            t.refresh_layout();
        });
        Ok(true)
    }

    /// Supplies the caller-owned expanded keys (switches to controlled mode).
    pub fn set_controlled_expanded_row_keys(&mut self, keys: Vec<RowKey>) -> Result<()> {
        let flat = self.reflatten(Arc::clone(&self.options.data), keys.clone())?;
        self.options.expansion = ExpansionMode::Controlled(keys.clone());
        self.batch_update(|t| {
            t.expansion.set_controlled(keys);
            t.flat = flat;
            t.refresh_layout();
        });
        Ok(())
    }

    // ---- hover & sort ----

    pub fn hovered_row(&self) -> Option<&RowKey> {
        self.hovered.as_ref()
    }

    pub fn set_hovered_row(&mut self, key: Option<RowKey>) {
        if self.hovered == key {
            return;
        }
        self.batch_update(|t| {
            let previous = core::mem::replace(&mut t.hovered, key.clone());
            t.events.push(TableEvent::RowHover {
                previous,
                hovered: key,
            });
        });
    }

    pub fn sort_state(&self) -> &SortState {
        &self.options.sort
    }

    /// Supplies the caller-owned sort state.
    pub fn set_sort_state(&mut self, sort: SortState) {
        self.options.sort = sort;
    }

    /// Proposes the next sort order for a column and reports it. Sort state is not changed.
    pub fn request_column_sort(&mut self, key: &str) -> Result<SortOrder> {
        let column = self
            .columns
            .column(key)
            .ok_or_else(|| TableError::UnknownColumn(String::from(key)))?;
        if !column.sortable {
            return Err(TableError::ColumnNotSortable(String::from(key)));
        }
        let order = self.options.sort.next_order(key);
        self.batch_update(|t| {
            t.events.push(TableEvent::ColumnSort {
                key: String::from(key),
                order,
            });
        });
        Ok(order)
    }

    // ---- column resizing ----

    pub fn resize_session(&self) -> Option<&ResizeSession> {
        self.resize.session()
    }

    pub fn start_column_resize(&mut self, key: &str) -> Result<()> {
        if self.columns.column(key).is_none() {
            return Err(TableError::UnknownColumn(String::from(key)));
        }
        self.resize.start(key);
        Ok(())
    }

    /// Writes a live width into the column model. Intermediate `ColumnResize` events are
    /// rate-limited; the model always holds the latest width. Returns the applied width.
    pub fn update_column_resize(&mut self, key: &str, width: u32, now_ms: u64) -> Result<u32> {
        let width = self.columns.set_width(key, width)?;
        self.batch_update(|t| {
            if t.resize.update(key, width, now_ms) {
                t.events.push(TableEvent::ColumnResize {
                    key: String::from(key),
                    width,
                });
            }
            t.refresh_layout();
        });
        Ok(width)
    }

    /// Ends the resize session and reports the committed width. A no-op without a session or
    /// without any recorded width.
    pub fn stop_column_resize(&mut self) -> Option<ResizeSession> {
        let session = self.resize.stop()?;
        let width = self
            .columns
            .width_of(&session.column_key)
            .unwrap_or(session.live_width);
        self.batch_update(|t| {
            t.events.push(TableEvent::ColumnResizeEnd {
                key: session.column_key.clone(),
                width,
            });
        });
        Some(session)
    }

    /// Sets a column width directly, without a resize session or events.
    pub fn set_column_width(&mut self, key: &str, width: u32) -> Result<u32> {
        let width = self.columns.set_width(key, width)?;
        self.batch_update(|t| t.refresh_layout());
        Ok(width)
    }

    /// Position of the guide line for the column being resized (fixed tables only).
    pub fn resizing_line(&self) -> Option<ResizingLine> {
        if !self.columns.is_fixed() {
            return None;
        }
        let session = self.resize.session()?;
        let columns = self.columns.pane_columns(PaneId::Main);
        let idx = columns
            .iter()
            .position(|c| c.column.key == session.column_key)?;
        let column = columns.get(idx)?.column;
        let column_width = column.width as i64;
        let before = ColumnModel::total_width(columns.iter().take(idx).map(|c| c.column)) as i64;

        let left = match column.frozen {
            Frozen::None => before + column_width - self.scroll.left as i64,
            Frozen::Left => before + column_width,
            Frozen::Right => {
                let after =
                    ColumnModel::total_width(columns.iter().skip(idx + 1).map(|c| c.column))
                        as i64;
                let available = self
                    .options
                    .width
                    .saturating_sub(self.scrollbars.current().vertical_size)
                    as i64;
                if after + column_width > available {
                    column_width
                } else {
                    available - after
                }
            }
        };
        let height = self
            .table_height()
            .saturating_sub(self.scrollbars.current().horizontal_size);
        Some(ResizingLine { left, height })
    }

    // ---- rendering ----

    /// Renders one body or frozen cell through the renderer registry.
    pub fn render_cell(&self, entry: &FlatRowEntry<R>, column_key: &str) -> Result<String> {
        let column = self
            .columns
            .column(column_key)
            .ok_or_else(|| TableError::UnknownColumn(String::from(column_key)))?;
        let is_expand_column = self.options.expand_column_key.as_deref() == Some(column_key);
        let expandable = entry.row_index >= 0 && !entry.row.children().is_empty();
        Ok(self.options.renderers.render_cell(&CellProps {
            row: &entry.row,
            row_key: &entry.key,
            column,
            row_index: entry.row_index,
            depth: entry.depth,
            is_expand_column,
            expandable,
            expanded: expandable && self.expansion.is_expanded(&entry.key),
        }))
    }

    pub fn render_header(&self, column_key: &str) -> Result<String> {
        let column = self
            .columns
            .column(column_key)
            .ok_or_else(|| TableError::UnknownColumn(String::from(column_key)))?;
        Ok(self.options.renderers.render_header(&HeaderProps {
            column,
            sort_order: self.options.sort.order_of(column_key),
        }))
    }
}

impl<R, W> core::fmt::Debug for PaneTable<R, W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaneTable")
            .field("options", &self.options)
            .field("rows", &self.flat.len())
            .field("frozen_rows", &self.frozen_rows.len())
            .field("scroll", &self.scroll)
            .field("scrollbars", &self.scrollbars.current())
            .field("expanded", &self.expansion.keys())
            .field("resize", &self.resize.session())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

fn saturate_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

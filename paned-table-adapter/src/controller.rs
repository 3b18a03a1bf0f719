use paned_table::{
    Align, FlatRowEntry, PaneId, PaneTable, Result, RowsRendered, ScrollOffset, TableHeight,
    TableOptions, TreeRow,
};

use crate::FixedRowWindow;

/// A framework-neutral controller that wires a `paned_table::PaneTable` to one
/// [`FixedRowWindow`] per pane.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_wheel` when a pane receives a scroll gesture
/// - `on_viewport_size` when the table is resized
///
/// and draw, per pane, the rows returned by `visible_rows` at `row_top`.
#[derive(Debug)]
pub struct Controller<R> {
    table: PaneTable<R, FixedRowWindow>,
    last_rendered: Option<RowsRendered>,
}

impl<R: TreeRow> Controller<R> {
    pub fn new(options: TableOptions<R>) -> Result<Self> {
        Ok(Self::from_table(PaneTable::new(options)?))
    }

    pub fn from_table(table: PaneTable<R, FixedRowWindow>) -> Self {
        let mut c = Self {
            table,
            last_rendered: None,
        };
        c.sync_rendered();
        c
    }

    pub fn table(&self) -> &PaneTable<R, FixedRowWindow> {
        &self.table
    }

    /// Direct access to the table. Call [`Self::sync_rendered`] after changing anything that
    /// moves rows.
    pub fn table_mut(&mut self) -> &mut PaneTable<R, FixedRowWindow> {
        &mut self.table
    }

    pub fn into_table(self) -> PaneTable<R, FixedRowWindow> {
        self.table
    }

    /// Routes a wheel/drag gesture on `pane`. Frozen panes only scroll vertically.
    ///
    /// Returns the shared offset afterwards.
    pub fn on_wheel(&mut self, pane: PaneId, delta_left: i64, delta_top: i64) -> ScrollOffset {
        let max = ScrollOffset {
            left: match pane {
                PaneId::Main => self.table.max_scroll_left(),
                PaneId::Left | PaneId::Right => 0,
            },
            top: self.table.max_scroll_top(),
        };
        let Some(window) = self.table.pane_mut(pane) else {
            return self.table.scroll_offset();
        };
        let offset = window.scroll_by(delta_left, delta_top, max);
        self.table.on_pane_scrolled(pane, offset);
        self.sync_rendered();
        self.table.scroll_offset()
    }

    pub fn on_viewport_size(&mut self, width: u32, height: TableHeight) {
        self.table.set_dimensions(width, height);
        self.sync_rendered();
    }

    /// Scrolls a row into view immediately. Returns the applied top offset.
    pub fn scroll_to_row(&mut self, row_index: usize, align: Align) -> u64 {
        let top = self.table.scroll_to_row(row_index, align);
        self.sync_rendered();
        top
    }

    pub fn scroll_to(&mut self, offset: ScrollOffset) -> ScrollOffset {
        self.table.scroll_to(offset);
        self.sync_rendered();
        self.table.scroll_offset()
    }

    pub fn toggle_row(&mut self, row_index: usize) -> Result<()> {
        self.table.toggle_row_expansion(row_index)?;
        self.sync_rendered();
        Ok(())
    }

    /// Reports the main pane's rendered rows to the table when they changed since the last
    /// report.
    pub fn sync_rendered(&mut self) -> Option<RowsRendered> {
        let rendered = self.table.pane(PaneId::Main)?.rows_rendered()?;
        if self.last_rendered == Some(rendered) {
            return None;
        }
        adebug!(
            start = rendered.overscan_start,
            stop = rendered.overscan_stop,
            "rows rendered"
        );
        self.last_rendered = Some(rendered);
        self.table.on_rows_rendered(rendered);
        Some(rendered)
    }

    /// Body rows a pane should draw (overscan included). Empty for panes that do not exist.
    pub fn visible_rows(&self, pane: PaneId) -> &[FlatRowEntry<R>] {
        let Some(window) = self.table.pane(pane) else {
            return &[];
        };
        let entries = self.table.flat_rows().entries();
        let range = window.row_range();
        let end = range.end.min(entries.len());
        entries.get(range.start.min(end)..end).unwrap_or(&[])
    }

    /// Pixel offset of a row within `pane`'s scrolled body, or `None` if the pane does not exist.
    pub fn row_top(&self, pane: PaneId, row_index: usize) -> Option<i64> {
        self.table
            .pane(pane)
            .map(|window| window.row_top(row_index))
    }
}

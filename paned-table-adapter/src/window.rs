use core::cmp;
use core::ops::Range;

use paned_table::{PaneGeometry, PaneWindow, RowsRendered, ScrollOffset};

/// A windowing primitive for rows of one fixed height.
///
/// Holds the geometry and offset pushed by the table and derives which rows to draw. User
/// gestures go through [`FixedRowWindow::scroll_by`], which clamps to the given bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedRowWindow {
    offset: ScrollOffset,
    geometry: PaneGeometry,
    redraws: u64,
}

impl FixedRowWindow {
    pub fn geometry(&self) -> &PaneGeometry {
        &self.geometry
    }

    /// Number of forced redraws requested so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn content_height(&self) -> u64 {
        self.geometry.row_count as u64 * self.geometry.row_height as u64
    }

    /// Applies a user gesture. Returns the resulting offset, clamped to `0..=max` per axis.
    pub fn scroll_by(&mut self, delta_left: i64, delta_top: i64, max: ScrollOffset) -> ScrollOffset {
        self.offset = ScrollOffset {
            left: add_clamped(self.offset.left, delta_left, max.left),
            top: add_clamped(self.offset.top, delta_top, max.top),
        };
        atrace!(
            left = self.offset.left,
            top = self.offset.top,
            "FixedRowWindow::scroll_by"
        );
        self.offset
    }

    /// The visible and overscanned row ranges (inclusive), or `None` when nothing is drawn.
    pub fn rows_rendered(&self) -> Option<RowsRendered> {
        let g = &self.geometry;
        let count = g.row_count;
        if count == 0 || g.row_height == 0 || g.body_height == 0 {
            return None;
        }

        let row_height = g.row_height as u64;
        let view = g.body_height as u64;
        let last = count - 1;
        let top = self
            .offset
            .top
            .min(self.content_height().saturating_sub(view));

        let visible_start = cmp::min(last, (top / row_height) as usize);
        let visible_stop = cmp::min(last, ((top + view - 1) / row_height) as usize);
        Some(RowsRendered {
            overscan_start: visible_start.saturating_sub(g.overscan),
            overscan_stop: cmp::min(last, visible_stop.saturating_add(g.overscan)),
            visible_start,
            visible_stop,
        })
    }

    /// Row indexes to draw (overscan included), as a half-open range.
    pub fn row_range(&self) -> Range<usize> {
        match self.rows_rendered() {
            Some(r) => r.overscan_start..r.overscan_stop + 1,
            None => 0..0,
        }
    }

    /// Pixel offset of a row relative to the top of the scrolled body.
    pub fn row_top(&self, row_index: usize) -> i64 {
        row_index as i64 * self.geometry.row_height as i64 - self.offset.top as i64
    }
}

impl PaneWindow for FixedRowWindow {
    fn apply_offset(&mut self, offset: ScrollOffset) {
        self.offset = offset;
    }

    fn apply_geometry(&mut self, geometry: PaneGeometry) {
        self.geometry = geometry;
    }

    fn offset(&self) -> ScrollOffset {
        self.offset
    }

    fn force_update(&mut self) {
        self.redraws = self.redraws.saturating_add(1);
    }
}

fn add_clamped(value: u64, delta: i64, max: u64) -> u64 {
    let next = if delta < 0 {
        value.saturating_sub(delta.unsigned_abs())
    } else {
        value.saturating_add(delta as u64)
    };
    next.min(max)
}

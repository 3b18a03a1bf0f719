use crate::ScrollbarPresence;

/// Inputs of a scrollbar presence resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollbarInputs {
    /// Width of every visible column.
    pub content_width: u64,
    /// Height of every flattened body row.
    pub content_height: u64,
    pub viewport_width: u32,
    /// Body height before any horizontal scrollbar is reserved.
    pub viewport_height: u32,
    /// Body height once a horizontal scrollbar of `thickness` is reserved. Equals
    /// `viewport_height` when the table height is fixed; a max-height table grows to make room.
    pub viewport_height_reserved: u32,
    /// Probed (or overridden) scrollbar thickness; 0 for overlay scrollbars.
    pub thickness: u32,
    /// Whether columns keep their widths (and may overflow horizontally).
    pub fixed: bool,
}

/// Decides which scrollbars are present.
///
/// A horizontal scrollbar consumes body height, which can make a vertical scrollbar necessary,
/// which consumes width; the order of checks below breaks that cycle.
pub fn resolve_scrollbars(inputs: ScrollbarInputs) -> ScrollbarPresence {
    let size = inputs.thickness;
    if size == 0 {
        return ScrollbarPresence::default();
    }

    let overflows = |height: u64| if inputs.content_height > height { size } else { 0 };
    let body = inputs.viewport_height as u64;
    let width = inputs.viewport_width as u64;

    if !inputs.fixed || inputs.content_width <= width.saturating_sub(size as u64) {
        return ScrollbarPresence {
            horizontal_size: 0,
            vertical_size: overflows(body),
        };
    }

    if inputs.content_width <= width {
        // The horizontal scrollbar overlays the bottom of the reserved body.
        let reserved = inputs.viewport_height_reserved as u64;
        return ScrollbarPresence {
            horizontal_size: size,
            vertical_size: overflows(reserved.saturating_sub(size as u64)),
        };
    }

    ScrollbarPresence {
        horizontal_size: size,
        vertical_size: size,
    }
}

/// Edge-triggered wrapper around [`resolve_scrollbars`].
///
/// A change relative to the previous resolution is reported once by [`Self::take_change`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollbarResolver {
    current: ScrollbarPresence,
    dirty: bool,
}

impl ScrollbarResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ScrollbarPresence {
        self.current
    }

    pub fn resolve(&mut self, inputs: ScrollbarInputs) -> ScrollbarPresence {
        let next = resolve_scrollbars(inputs);
        if next != self.current {
            pdebug!(
                horizontal = next.horizontal_size,
                vertical = next.vertical_size,
                "scrollbar presence changed"
            );
            self.current = next;
            self.dirty = true;
        }
        next
    }

    /// Consumes the pending change, if any.
    pub fn take_change(&mut self) -> Option<ScrollbarPresence> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.current)
    }
}

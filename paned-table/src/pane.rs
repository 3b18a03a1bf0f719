use crate::{PaneGeometry, PaneId, ScrollOffset};

/// The windowing primitive behind one pane.
///
/// Implementations draw only the visible slice of rows. The table pushes offsets and geometry
/// into them; user scrolling flows the other way through
/// [`crate::PaneTable::on_pane_scrolled`]. `apply_offset` must not report back as a user scroll.
pub trait PaneWindow {
    fn apply_offset(&mut self, offset: ScrollOffset);

    fn apply_geometry(&mut self, geometry: PaneGeometry);

    fn offset(&self) -> ScrollOffset;

    /// Redraw everything, bypassing any cached slice.
    fn force_update(&mut self) {}
}

/// A pane that only records what it was given.
///
/// Useful as a stand-in when the real drawing happens elsewhere, and in tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetPane {
    pub offset: ScrollOffset,
    pub geometry: PaneGeometry,
    pub offsets_applied: u64,
    pub forced_updates: u64,
}

impl PaneWindow for OffsetPane {
    fn apply_offset(&mut self, offset: ScrollOffset) {
        self.offset = offset;
        self.offsets_applied = self.offsets_applied.saturating_add(1);
    }

    fn apply_geometry(&mut self, geometry: PaneGeometry) {
        self.geometry = geometry;
    }

    fn offset(&self) -> ScrollOffset {
        self.offset
    }

    fn force_update(&mut self) {
        self.forced_updates = self.forced_updates.saturating_add(1);
    }
}

/// The main pane plus the optional frozen panes. A frozen pane exists only while its column
/// group is non-empty.
#[derive(Clone, Debug, Default)]
pub(crate) struct PaneSet<W> {
    main: W,
    left: Option<W>,
    right: Option<W>,
}

impl<W: PaneWindow + Default> PaneSet<W> {
    pub(crate) fn get(&self, pane: PaneId) -> Option<&W> {
        match pane {
            PaneId::Main => Some(&self.main),
            PaneId::Left => self.left.as_ref(),
            PaneId::Right => self.right.as_ref(),
        }
    }

    pub(crate) fn get_mut(&mut self, pane: PaneId) -> Option<&mut W> {
        match pane {
            PaneId::Main => Some(&mut self.main),
            PaneId::Left => self.left.as_mut(),
            PaneId::Right => self.right.as_mut(),
        }
    }

    /// Constructs or drops a frozen pane. New panes start at `offset`.
    pub(crate) fn ensure(&mut self, pane: PaneId, exists: bool, offset: ScrollOffset) {
        let slot = match pane {
            PaneId::Main => return,
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        };
        match (slot.is_some(), exists) {
            (false, true) => {
                pdebug!(?pane, "pane constructed");
                let mut window = W::default();
                window.apply_offset(ScrollOffset::new(0, offset.top));
                *slot = Some(window);
            }
            (true, false) => {
                pdebug!(?pane, "pane dropped");
                *slot = None;
            }
            _ => {}
        }
    }

    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(PaneId, &mut W)) {
        for pane in PaneId::ALL {
            if let Some(window) = self.get_mut(pane) {
                f(pane, window);
            }
        }
    }
}

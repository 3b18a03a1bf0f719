use alloc::string::String;
use core::fmt;

/// Identity of a row, extracted from the application record by the configured accessor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RowKey {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for RowKey {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for RowKey {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// The three independently windowed grids that make up a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaneId {
    Main,
    Left,
    Right,
}

impl PaneId {
    pub const ALL: [PaneId; 3] = [PaneId::Main, PaneId::Left, PaneId::Right];

    pub fn is_frozen(self) -> bool {
        !matches!(self, Self::Main)
    }
}

/// Alignment policy for scrolling a row into view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Scroll as little as possible to make the row visible.
    #[default]
    Auto,
    /// Like `Auto` when the row is within one viewport of the current offset, `Center` otherwise.
    Smart,
    Center,
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    pub(crate) fn between(prev: u64, next: u64) -> Option<Self> {
        match next.cmp(&prev) {
            core::cmp::Ordering::Greater => Some(Self::Forward),
            core::cmp::Ordering::Less => Some(Self::Backward),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// Scroll position shared by every pane of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollOffset {
    pub left: u64,
    pub top: u64,
}

impl ScrollOffset {
    pub fn new(left: u64, top: u64) -> Self {
        Self { left, top }
    }
}

/// Per-axis scroll directions of a scroll event (`None` when that axis did not move).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollDirections {
    pub horizontal: Option<ScrollDirection>,
    pub vertical: Option<ScrollDirection>,
}

/// Scrollbar thickness per axis; 0 means the scrollbar is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarPresence {
    pub horizontal_size: u32,
    pub vertical_size: u32,
}

impl ScrollbarPresence {
    pub fn horizontal(&self) -> bool {
        self.horizontal_size > 0
    }

    pub fn vertical(&self) -> bool {
        self.vertical_size > 0
    }
}

/// Row range reported by the windowing primitive after drawing a pane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowsRendered {
    pub overscan_start: usize,
    pub overscan_stop: usize, // inclusive
    pub visible_start: usize,
    pub visible_stop: usize, // inclusive
}

/// Height policy of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableHeight {
    Fixed(u32),
    /// Grows with the content up to the given height.
    Max(u32),
}

impl Default for TableHeight {
    fn default() -> Self {
        Self::Fixed(400)
    }
}

/// Geometry handed to a pane's windowing primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaneGeometry {
    /// Width of the clipping container the pane is placed in.
    pub container_width: u32,
    /// Width of the windowed grid (may exceed the container to hide its scrollbar).
    pub width: u32,
    /// Width of the scrollable content.
    pub body_width: u32,
    /// Height of the whole pane, header and frozen rows included.
    pub height: u32,
    /// Height available to the scrolled body rows.
    pub body_height: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub row_count: usize,
    pub frozen_row_count: usize,
    pub overscan: usize,
}

/// Position of the visual guide drawn while a column is being resized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizingLine {
    pub left: i64,
    pub height: u32,
}

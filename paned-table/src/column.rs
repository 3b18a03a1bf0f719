use alloc::string::String;
use alloc::vec::Vec;

use crate::key::KeySet;
use crate::{PaneId, Result, TableError};

/// Which edge (if any) a column is pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frozen {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A declared column.
///
/// Inside a [`ColumnModel`], `width` holds the *effective* width: it starts at the declared
/// width and is overridden by committed resizes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    pub key: String,
    pub title: Option<String>,
    pub width: u32,
    pub min_width: Option<u32>,
    pub flex_grow: u32,
    pub flex_shrink: u32,
    pub frozen: Frozen,
    pub resizable: bool,
    pub sortable: bool,
    pub align: ColumnAlign,
    pub hidden: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, width: u32) -> Self {
        Self {
            key: key.into(),
            title: None,
            width,
            min_width: None,
            flex_grow: 0,
            flex_shrink: 1,
            frozen: Frozen::None,
            resizable: false,
            sortable: false,
            align: ColumnAlign::Left,
            hidden: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn with_flex(mut self, flex_grow: u32, flex_shrink: u32) -> Self {
        self.flex_grow = flex_grow;
        self.flex_shrink = flex_shrink;
        self
    }

    pub fn with_frozen(mut self, frozen: Frozen) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_align(mut self, align: ColumnAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Clamps a requested width to this column's minimum.
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.max(self.min_width.unwrap_or(0))
    }
}

/// A column declaration tree: leaves are columns, groups only nest them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnNode {
    Leaf(Column),
    Group {
        title: String,
        children: Vec<ColumnNode>,
    },
}

impl From<Column> for ColumnNode {
    fn from(column: Column) -> Self {
        Self::Leaf(column)
    }
}

/// Flattens nested declarations into leaf columns, in declaration order.
pub fn normalize_columns(nodes: &[ColumnNode]) -> Vec<Column> {
    let mut out = Vec::new();
    let mut stack: Vec<&ColumnNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            ColumnNode::Leaf(column) => out.push(column.clone()),
            ColumnNode::Group { children, .. } => stack.extend(children.iter().rev()),
        }
    }
    out
}

/// A column as it appears in one pane.
///
/// The main pane carries placeholders for the frozen columns so its header and body stay
/// aligned with the frozen panes drawn on top of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneColumn<'a> {
    pub column: &'a Column,
    pub placeholder: bool,
}

/// Normalized column declarations plus the per-pane partition and effective widths.
#[derive(Clone, Debug)]
pub struct ColumnModel {
    declared: Vec<Column>,
    fixed: bool,
    columns: Vec<Column>,
    left: Vec<usize>,
    center: Vec<usize>,
    right: Vec<usize>,
}

impl ColumnModel {
    /// Builds a model from a flat declaration list.
    ///
    /// Duplicate keys (hidden columns included) are rejected.
    pub fn build(declared: Vec<Column>, fixed: bool) -> Result<Self> {
        validate_keys(&declared)?;
        let mut model = Self {
            columns: declared.clone(),
            declared,
            fixed,
            left: Vec::new(),
            center: Vec::new(),
            right: Vec::new(),
        };
        model.repartition();
        pdebug!(columns = model.columns.len(), fixed, "ColumnModel::build");
        Ok(model)
    }

    /// Builds a model from nested column descriptors.
    pub fn from_nodes(nodes: &[ColumnNode], fixed: bool) -> Result<Self> {
        Self::build(normalize_columns(nodes), fixed)
    }

    /// Replaces the declarations.
    ///
    /// Returns `false` (and keeps every derived value, resize overrides included) when the new
    /// inputs are deep-equal to the current ones. Resizable columns keep their effective width
    /// across a reset when their key survives.
    pub fn reset(&mut self, declared: Vec<Column>, fixed: bool) -> Result<bool> {
        if self.fixed == fixed && self.declared == declared {
            return Ok(false);
        }
        validate_keys(&declared)?;
        let columns = declared
            .iter()
            .map(|column| {
                let mut next = column.clone();
                if column.resizable {
                    if let Some(prev) = self.columns.iter().find(|c| c.key == column.key) {
                        next.width = column.clamp_width(prev.width);
                    }
                }
                next
            })
            .collect();
        self.columns = columns;
        self.declared = declared;
        self.fixed = fixed;
        self.repartition();
        pdebug!(columns = self.columns.len(), fixed, "ColumnModel::reset");
        Ok(true)
    }

    fn repartition(&mut self) {
        self.left.clear();
        self.center.clear();
        self.right.clear();
        for (i, column) in self.columns.iter().enumerate() {
            if column.hidden {
                continue;
            }
            match column.frozen {
                Frozen::Left => self.left.push(i),
                Frozen::None => self.center.push(i),
                Frozen::Right => self.right.push(i),
            }
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn declared(&self) -> &[Column] {
        &self.declared
    }

    /// Every column (hidden included) with its effective width, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Returns the `(left, center, right)` visible column groups.
    pub fn partition(&self) -> (Vec<&Column>, Vec<&Column>, Vec<&Column>) {
        (
            self.pick(&self.left),
            self.pick(&self.center),
            self.pick(&self.right),
        )
    }

    fn pick(&self, indexes: &[usize]) -> Vec<&Column> {
        indexes.iter().filter_map(|&i| self.columns.get(i)).collect()
    }

    pub fn has_left_frozen(&self) -> bool {
        !self.left.is_empty()
    }

    pub fn has_right_frozen(&self) -> bool {
        !self.right.is_empty()
    }

    pub fn has_frozen(&self) -> bool {
        self.has_left_frozen() || self.has_right_frozen()
    }

    /// Whether the given pane has columns (and therefore exists at all).
    pub fn has_pane(&self, pane: PaneId) -> bool {
        match pane {
            PaneId::Main => true,
            PaneId::Left => self.has_left_frozen(),
            PaneId::Right => self.has_right_frozen(),
        }
    }

    /// Columns drawn by a pane. The main pane includes placeholders for frozen columns.
    pub fn pane_columns(&self, pane: PaneId) -> Vec<PaneColumn<'_>> {
        match pane {
            PaneId::Left => self.wrap(&self.left, false),
            PaneId::Right => self.wrap(&self.right, false),
            PaneId::Main => {
                let mut out = self.wrap(&self.left, true);
                out.extend(self.wrap(&self.center, false));
                out.extend(self.wrap(&self.right, true));
                out
            }
        }
    }

    fn wrap(&self, indexes: &[usize], placeholder: bool) -> Vec<PaneColumn<'_>> {
        indexes
            .iter()
            .filter_map(|&i| self.columns.get(i))
            .map(|column| PaneColumn {
                column,
                placeholder,
            })
            .collect()
    }

    pub fn width_of(&self, key: &str) -> Option<u32> {
        self.column(key).map(|c| c.width)
    }

    /// Sets a column's effective width, clamped to its `min_width`. Returns the applied width.
    pub fn set_width(&mut self, key: &str, width: u32) -> Result<u32> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| TableError::UnknownColumn(String::from(key)))?;
        let width = column.clamp_width(width);
        column.width = width;
        ptrace!(key, width, "ColumnModel::set_width");
        Ok(width)
    }

    /// Sum of effective widths.
    pub fn total_width<'a>(columns: impl IntoIterator<Item = &'a Column>) -> u64 {
        columns.into_iter().map(|c| c.width as u64).sum()
    }

    /// Width of every visible column.
    pub fn columns_width(&self) -> u64 {
        Self::total_width(self.visible_columns())
    }

    pub fn left_frozen_width(&self) -> u64 {
        Self::total_width(self.pick(&self.left))
    }

    pub fn right_frozen_width(&self) -> u64 {
        Self::total_width(self.pick(&self.right))
    }

    /// Effective `(flex_grow, flex_shrink)`; fixed tables never flex.
    pub fn flex_of(&self, key: &str) -> Option<(u32, u32)> {
        let column = self.column(key)?;
        if self.fixed {
            return Some((0, 0));
        }
        Some((column.flex_grow, column.flex_shrink))
    }
}

fn validate_keys(columns: &[Column]) -> Result<()> {
    let mut seen = KeySet::<&str>::new();
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            pwarn!(key = column.key.as_str(), "duplicate column key");
            return Err(TableError::DuplicateColumnKey(column.key.clone()));
        }
    }
    Ok(())
}

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use crate::{Column, RowKey, SortOrder, TreeRow};

/// Indentation per depth level used by the default expand-icon renderer.
pub const INDENT_PER_LEVEL: usize = 2;

/// Inputs of a cell renderer.
pub struct CellProps<'a, R> {
    pub row: &'a R,
    pub row_key: &'a RowKey,
    pub column: &'a Column,
    pub row_index: i64,
    pub depth: u32,
    /// Whether this cell hosts the expand icon.
    pub is_expand_column: bool,
    pub expandable: bool,
    pub expanded: bool,
}

/// Inputs of a header cell renderer.
pub struct HeaderProps<'a> {
    pub column: &'a Column,
    pub sort_order: Option<SortOrder>,
}

/// Inputs of the expand icon renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandIconProps {
    pub depth: u32,
    pub expandable: bool,
    pub expanded: bool,
}

pub type CellRenderer<R> = Arc<dyn Fn(&CellProps<'_, R>) -> String + Send + Sync>;
pub type HeaderRenderer = Arc<dyn Fn(&HeaderProps<'_>) -> String + Send + Sync>;
pub type ExpandIconRenderer = Arc<dyn Fn(&ExpandIconProps) -> String + Send + Sync>;

/// Caller-supplied renderers per slot. Empty slots fall back to the text defaults below.
pub struct RendererRegistry<R> {
    pub cell: Option<CellRenderer<R>>,
    pub header: Option<HeaderRenderer>,
    pub expand_icon: Option<ExpandIconRenderer>,
}

impl<R> Default for RendererRegistry<R> {
    fn default() -> Self {
        Self {
            cell: None,
            header: None,
            expand_icon: None,
        }
    }
}

impl<R> Clone for RendererRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            header: self.header.clone(),
            expand_icon: self.expand_icon.clone(),
        }
    }
}

impl<R> core::fmt::Debug for RendererRegistry<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("cell", &self.cell.is_some())
            .field("header", &self.header.is_some())
            .field("expand_icon", &self.expand_icon.is_some())
            .finish()
    }
}

impl<R: TreeRow> RendererRegistry<R> {
    pub fn render_cell(&self, props: &CellProps<'_, R>) -> String {
        let body = match &self.cell {
            Some(f) => f(props),
            None => default_cell(props),
        };
        if !props.is_expand_column {
            return body;
        }
        let icon = self.render_expand_icon(&ExpandIconProps {
            depth: props.depth,
            expandable: props.expandable,
            expanded: props.expanded,
        });
        format!("{icon}{body}")
    }

    pub fn render_header(&self, props: &HeaderProps<'_>) -> String {
        match &self.header {
            Some(f) => f(props),
            None => default_header(props),
        }
    }

    pub fn render_expand_icon(&self, props: &ExpandIconProps) -> String {
        match &self.expand_icon {
            Some(f) => f(props),
            None => default_expand_icon(props),
        }
    }
}

fn default_cell<R: TreeRow>(props: &CellProps<'_, R>) -> String {
    props.row.cell_text(&props.column.key).unwrap_or_default()
}

fn default_header(props: &HeaderProps<'_>) -> String {
    let title = props.column.title.as_deref().unwrap_or(&props.column.key);
    match props.sort_order {
        Some(SortOrder::Asc) => format!("{title} ▲"),
        Some(SortOrder::Desc) => format!("{title} ▼"),
        None => String::from(title),
    }
}

fn default_expand_icon(props: &ExpandIconProps) -> String {
    let indent = " ".repeat(props.depth as usize * INDENT_PER_LEVEL);
    let icon = match (props.expandable, props.expanded) {
        (false, _) => "  ",
        (true, false) => "▸ ",
        (true, true) => "▾ ",
    };
    format!("{indent}{icon}")
}

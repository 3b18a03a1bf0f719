use alloc::string::String;

use crate::RowKey;

/// Configuration errors reported by the table.
///
/// None of these are fatal: the operation that raised them is rejected and the table keeps its
/// previous state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two column declarations share the same key.
    #[error("duplicate column key: {0}")]
    DuplicateColumnKey(String),

    /// A column key that is not part of the column model.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A sort was requested on a column declared as not sortable.
    #[error("column is not sortable: {0}")]
    ColumnNotSortable(String),

    /// A flattened row index past the end of the body rows.
    #[error("row index out of bounds: {0}")]
    UnknownRow(usize),

    /// The row-key accessor returned nothing for a row.
    #[error("missing row key (position {position}, depth {depth})")]
    MissingRowKey { position: usize, depth: u32 },

    /// Two flattened rows resolved to the same key.
    #[error("duplicate row key: {0}")]
    DuplicateRowKey(RowKey),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, TableError>;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::{KeyMap, KeySet};
use crate::{Result, RowKey, TableError};

/// An application record that may own child rows.
///
/// Rows are shared as `Arc`s so the flattened sequence can reference them without copying.
pub trait TreeRow {
    /// Child rows. An empty slice means the row is not expandable.
    fn children(&self) -> &[Arc<Self>]
    where
        Self: Sized,
    {
        &[]
    }

    /// Looks up a key-like field by name. Used by [`key_field`] accessors.
    fn key_field(&self, field: &str) -> Option<RowKey> {
        let _ = field;
        None
    }

    /// Text for a cell of the given column, used by the default cell renderer.
    fn cell_text(&self, column_key: &str) -> Option<String> {
        let _ = column_key;
        None
    }
}

/// A shared, identity-comparable row collection.
pub type Rows<R> = Arc<[Arc<R>]>;

/// Extracts a row's key. Returning `None` is a configuration error.
pub type RowKeyAccessor<R> = Arc<dyn Fn(&R) -> Option<RowKey> + Send + Sync>;

/// Creates an accessor reading the named field through [`TreeRow::key_field`].
pub fn key_field<R: TreeRow + 'static>(field: impl Into<String>) -> RowKeyAccessor<R> {
    let field = field.into();
    Arc::new(move |row: &R| row.key_field(&field))
}

/// One row of the flattened sequence.
///
/// `row_index` is non-negative for body rows and negative (starting at -1) for frozen rows.
#[derive(Debug)]
pub struct FlatRowEntry<R> {
    pub row: Arc<R>,
    pub key: RowKey,
    pub depth: u32,
    pub row_index: i64,
}

impl<R> Clone for FlatRowEntry<R> {
    fn clone(&self) -> Self {
        Self {
            row: Arc::clone(&self.row),
            key: self.key.clone(),
            depth: self.depth,
            row_index: self.row_index,
        }
    }
}

impl<R> PartialEq for FlatRowEntry<R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.row, &other.row)
            && self.key == other.key
            && self.depth == other.depth
            && self.row_index == other.row_index
    }
}

/// The flattened body rows plus the key → depth side table.
#[derive(Debug)]
pub struct FlatRows<R> {
    entries: Vec<FlatRowEntry<R>>,
    depths: KeyMap<RowKey, u32>,
}

impl<R> FlatRows<R> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            depths: KeyMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FlatRowEntry<R>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[FlatRowEntry<R>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlatRowEntry<R>> {
        self.entries.iter()
    }

    pub fn depth_of(&self, key: &RowKey) -> Option<u32> {
        self.depths.get(key).copied()
    }

    pub fn position_of(&self, key: &RowKey) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }

    /// Recovers the forest the sequence was flattened from (its depth-0 rows).
    ///
    /// Flattening the result with the same expanded keys reproduces this sequence.
    pub fn roots(&self) -> Vec<Arc<R>> {
        self.entries
            .iter()
            .filter(|e| e.depth == 0)
            .map(|e| Arc::clone(&e.row))
            .collect()
    }
}

/// Flattens a row forest into a pre-order sequence honoring the expanded keys.
///
/// Children of a row are visited only when the row has children and its key is expanded, so
/// the cost is proportional to the number of emitted entries. Expanded keys that match no row
/// are ignored. A row without a key, or two emitted rows sharing a key, is an error.
pub fn flatten<R: TreeRow>(
    rows: &[Arc<R>],
    expanded_keys: &[RowKey],
    key_of: &dyn Fn(&R) -> Option<RowKey>,
) -> Result<FlatRows<R>> {
    let expanded: KeySet<&RowKey> = expanded_keys.iter().collect();
    let mut entries = Vec::with_capacity(rows.len());
    let mut depths = KeyMap::default();

    let mut stack: Vec<(&Arc<R>, u32)> = rows.iter().rev().map(|row| (row, 0)).collect();
    while let Some((row, depth)) = stack.pop() {
        let position = entries.len();
        let key = key_of(&**row).ok_or(TableError::MissingRowKey { position, depth })?;
        if depths.insert(key.clone(), depth).is_some() {
            pwarn!(key = %key, "duplicate row key while flattening");
            return Err(TableError::DuplicateRowKey(key));
        }

        let children = row.children();
        if !children.is_empty() && expanded.contains(&key) {
            stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
        }

        entries.push(FlatRowEntry {
            row: Arc::clone(row),
            key,
            depth,
            row_index: position as i64,
        });
    }

    ptrace!(
        roots = rows.len(),
        entries = entries.len(),
        expanded = expanded_keys.len(),
        "flatten"
    );
    Ok(FlatRows { entries, depths })
}

/// Builds the pinned entries for frozen rows: depth 0, row indexes -1, -2, ...
///
/// Frozen rows never expand.
pub fn frozen_entries<R>(
    rows: &[Arc<R>],
    key_of: &dyn Fn(&R) -> Option<RowKey>,
) -> Result<Vec<FlatRowEntry<R>>> {
    let mut seen = KeySet::default();
    let mut out = Vec::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        let key = key_of(&**row).ok_or(TableError::MissingRowKey { position, depth: 0 })?;
        if !seen.insert(key.clone()) {
            return Err(TableError::DuplicateRowKey(key));
        }
        out.push(FlatRowEntry {
            row: Arc::clone(row),
            key,
            depth: 0,
            row_index: -(position as i64) - 1,
        });
    }
    Ok(out)
}

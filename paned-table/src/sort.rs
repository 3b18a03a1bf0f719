use alloc::string::String;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortBy {
    pub key: String,
    pub order: SortOrder,
}

/// Caller-owned sort state. The table reads it and proposes changes, it never applies them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortState {
    #[default]
    Unsorted,
    Single(SortBy),
    /// Several sorted columns, in priority order.
    Multi(Vec<SortBy>),
}

impl SortState {
    pub fn order_of(&self, key: &str) -> Option<SortOrder> {
        match self {
            Self::Unsorted => None,
            Self::Single(sort_by) => (sort_by.key == key).then_some(sort_by.order),
            Self::Multi(list) => list.iter().find(|s| s.key == key).map(|s| s.order),
        }
    }

    /// Proposed order after a sort request on `key`: toggles a sorted column, starts others at
    /// ascending.
    pub fn next_order(&self, key: &str) -> SortOrder {
        self.order_of(key)
            .map(SortOrder::toggled)
            .unwrap_or(SortOrder::Asc)
    }
}

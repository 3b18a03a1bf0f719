use alloc::vec::Vec;

use crate::RowKey;

/// State that is either owned by the table or supplied by the caller.
///
/// Mutations always go through a proposal; only `Owned` state applies it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Managed<T> {
    /// Owned by the table and mutated on user interaction.
    Owned(T),
    /// Owned by the caller: read-only here, changes are only proposed.
    External(T),
}

impl<T> Managed<T> {
    pub fn get(&self) -> &T {
        match self {
            Self::Owned(v) | Self::External(v) => v,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }

    /// Stores `next` when owned. Returns whether it was stored.
    pub fn apply(&mut self, next: T) -> bool {
        match self {
            Self::Owned(v) => {
                *v = next;
                true
            }
            Self::External(_) => false,
        }
    }
}

/// The outcome of an expand/collapse request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionProposal {
    pub key: RowKey,
    pub expanded: bool,
    /// The complete expanded key list after the change.
    pub next: Vec<RowKey>,
}

/// Tracks which rows are expanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionController {
    keys: Managed<Vec<RowKey>>,
}

impl ExpansionController {
    pub fn uncontrolled(default_keys: Vec<RowKey>) -> Self {
        Self {
            keys: Managed::Owned(default_keys),
        }
    }

    pub fn controlled(keys: Vec<RowKey>) -> Self {
        Self {
            keys: Managed::External(keys),
        }
    }

    pub fn is_controlled(&self) -> bool {
        self.keys.is_external()
    }

    pub fn keys(&self) -> &[RowKey] {
        self.keys.get()
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.keys().contains(key)
    }

    /// Computes the key list that would result from setting `key` to `expanded`.
    ///
    /// Pure: depends only on the key and the current membership.
    pub fn propose(&self, key: &RowKey, expanded: bool) -> ExpansionProposal {
        let mut next = self.keys().to_vec();
        if expanded {
            if !next.contains(key) {
                next.push(key.clone());
            }
        } else {
            next.retain(|k| k != key);
        }
        ExpansionProposal {
            key: key.clone(),
            expanded,
            next,
        }
    }

    /// Proposal for flipping `key`.
    pub fn propose_toggle(&self, key: &RowKey) -> ExpansionProposal {
        self.propose(key, !self.is_expanded(key))
    }

    /// Applies a proposal when uncontrolled. Returns whether local state was mutated.
    pub fn commit(&mut self, proposal: &ExpansionProposal) -> bool {
        self.keys.apply(proposal.next.clone())
    }

    /// Flips `key`, mutating local state only when uncontrolled.
    pub fn toggle(&mut self, key: &RowKey) -> ExpansionProposal {
        let proposal = self.propose_toggle(key);
        self.commit(&proposal);
        proposal
    }

    /// Bulk replace. Ignored (returns `false`) when controlled.
    pub fn set_all(&mut self, keys: Vec<RowKey>) -> bool {
        if self.is_controlled() {
            pwarn!("set_all ignored: expanded keys are controlled");
            return false;
        }
        self.keys.apply(keys)
    }

    /// Replaces the caller-owned keys, switching to controlled mode.
    pub fn set_controlled(&mut self, keys: Vec<RowKey>) {
        self.keys = Managed::External(keys);
    }
}

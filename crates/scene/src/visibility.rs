use std::collections::BTreeSet;

use catalog::DEFAULT_LAYER_UNIVERSE;
use serde::Serialize;

/// Authoritative set of overlay layer ids that should be on the map.
///
/// Every mutation is idempotent. `revision` only moves when membership
/// actually changes, so hosts can skip reconciliation for no-op updates.
///
/// Ordering contract:
/// - Iteration yields ids in ascending lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerVisibilitySet {
    ids: BTreeSet<String>,
    #[serde(skip)]
    revision: u64,
}

impl LayerVisibilitySet {
    pub fn empty() -> Self {
        Self {
            ids: BTreeSet::new(),
            revision: 0,
        }
    }

    /// The default universe `{field, lu, sta, stl, stp}`.
    pub fn default_universe() -> Self {
        let mut s = Self::empty();
        s.ids = DEFAULT_LAYER_UNIVERSE.iter().map(|id| id.to_string()).collect();
        s
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(String::as_str)
    }

    /// Returns `true` if the set changed.
    pub fn add(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string());
        self.bump();
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.bump();
        true
    }

    /// Flips membership of `id`; returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(id)
        }
    }

    /// Replaces the whole set. Returns `true` if membership changed.
    pub fn replace<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        if next == self.ids {
            return false;
        }
        self.ids = next;
        self.bump();
        true
    }

    pub fn reset_to_default(&mut self) -> bool {
        self.replace(DEFAULT_LAYER_UNIVERSE)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for LayerVisibilitySet {
    fn default() -> Self {
        Self::default_universe()
    }
}

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::aggregator::AttributeBuckets;
use crate::kind::GeometryKind;

/// Per-kind highlight membership.
///
/// Each set is either empty or equal to the ids of its bucket at the moment
/// it was last toggled on. Never a partial subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSets {
    pub points: BTreeSet<String>,
    pub lines: BTreeSet<String>,
    pub polygons: BTreeSet<String>,
}

impl HighlightSets {
    pub fn get(&self, kind: GeometryKind) -> &BTreeSet<String> {
        match kind {
            GeometryKind::Points => &self.points,
            GeometryKind::Lines => &self.lines,
            GeometryKind::Polygons => &self.polygons,
        }
    }

    fn get_mut(&mut self, kind: GeometryKind) -> &mut BTreeSet<String> {
        match kind {
            GeometryKind::Points => &mut self.points,
            GeometryKind::Lines => &mut self.lines,
            GeometryKind::Polygons => &mut self.polygons,
        }
    }

    /// All-or-nothing toggle against the current bucket for `kind`.
    ///
    /// Only an involution while the bucket is unchanged between calls.
    pub fn toggle(&mut self, kind: GeometryKind, buckets: &AttributeBuckets) {
        let set = self.get_mut(kind);
        if set.is_empty() {
            set.extend(buckets.ids(kind).map(str::to_string));
        } else {
            set.clear();
        }
    }

    pub fn is_highlighted(&self, kind: GeometryKind, id: &str) -> bool {
        self.get(kind).contains(id)
    }

    /// `true` when a non-empty set no longer matches its bucket's ids.
    pub fn is_stale(&self, kind: GeometryKind, buckets: &AttributeBuckets) -> bool {
        let set = self.get(kind);
        if set.is_empty() {
            return false;
        }
        let current: BTreeSet<&str> = buckets.ids(kind).collect();
        set.len() != current.len() || set.iter().any(|id| !current.contains(id.as_str()))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.polygons.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.polygons.is_empty()
    }
}

impl crate::state::ViewerState {
    pub fn toggle_highlight(&mut self, kind: GeometryKind) {
        self.highlights.toggle(kind, &self.buckets);
        debug!(%kind, highlighted = self.highlights.get(kind).len(), "highlight toggled");
    }
}

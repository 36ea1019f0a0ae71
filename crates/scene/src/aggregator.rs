use std::collections::BTreeMap;

use foundation::Aabb2;
use serde::Serialize;
use tracing::{debug, trace};

use crate::feature::{AttributeRow, Feature, Geometry};
use crate::kind::GeometryKind;

/// Attribute rows of the features currently reported by the map, one ordered
/// bucket per geometry kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeBuckets {
    pub points: Vec<AttributeRow>,
    pub lines: Vec<AttributeRow>,
    pub polygons: Vec<AttributeRow>,
    /// Geometry extents of identified rows, for "show bounding box".
    #[serde(skip)]
    extents: BTreeMap<(GeometryKind, String), Aabb2>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    pub points: usize,
    pub lines: usize,
    pub polygons: usize,
    pub dropped: usize,
}

impl AttributeBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions `features` by the kind derived from their source layer.
    ///
    /// Input order is kept within each bucket. Features whose source layer
    /// carries none of the kind suffixes are dropped.
    pub fn aggregate<'a>(
        features: impl IntoIterator<Item = &'a Feature>,
    ) -> (Self, AggregateSummary) {
        let mut out = Self::default();
        let mut dropped = 0usize;

        for feature in features {
            let Some(kind) = feature.kind() else {
                trace!(
                    source_layer = %feature.source_layer,
                    "dropping feature with unknown layer suffix"
                );
                dropped += 1;
                continue;
            };
            if let (Some(id), Some(bbox)) = (
                feature.id(),
                feature.geometry.as_ref().and_then(Geometry::bbox),
            ) {
                out.extents.insert((kind, id.to_string()), bbox);
            }
            out.bucket_mut(kind).push(feature.properties.clone());
        }

        let summary = AggregateSummary {
            points: out.points.len(),
            lines: out.lines.len(),
            polygons: out.polygons.len(),
            dropped,
        };
        (out, summary)
    }

    pub fn bucket(&self, kind: GeometryKind) -> &[AttributeRow] {
        match kind {
            GeometryKind::Points => &self.points,
            GeometryKind::Lines => &self.lines,
            GeometryKind::Polygons => &self.polygons,
        }
    }

    fn bucket_mut(&mut self, kind: GeometryKind) -> &mut Vec<AttributeRow> {
        match kind {
            GeometryKind::Points => &mut self.points,
            GeometryKind::Lines => &mut self.lines,
            GeometryKind::Polygons => &mut self.polygons,
        }
    }

    /// Identifiers present in one bucket; rows without an id are skipped.
    pub fn ids(&self, kind: GeometryKind) -> impl Iterator<Item = &str> + '_ {
        self.bucket(kind).iter().filter_map(AttributeRow::id)
    }

    pub fn extent(&self, kind: GeometryKind, id: &str) -> Option<Aabb2> {
        self.extents.get(&(kind, id.to_string())).copied()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.polygons.clear();
        self.extents.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.polygons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len() + self.polygons.len()
    }
}

impl crate::state::ViewerState {
    /// Replaces all three buckets with the rows of a freshly reported feature set.
    ///
    /// Highlight sets are left untouched even when they no longer match the
    /// new buckets; see `HighlightSets::is_stale`.
    pub fn refresh_attributes(&mut self, features: &[Feature]) -> AggregateSummary {
        let (buckets, summary) = AttributeBuckets::aggregate(features);
        self.buckets = buckets;
        debug!(
            points = summary.points,
            lines = summary.lines,
            polygons = summary.polygons,
            dropped = summary.dropped,
            "attribute buckets refreshed"
        );
        summary
    }
}

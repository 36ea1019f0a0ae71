use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::{AttributeRow, Feature};
use crate::kind::GeometryKind;
use crate::state::ViewerState;

/// The one attribute-table row currently selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAttributeRow {
    pub data: AttributeRow,
    pub kind: GeometryKind,
}

impl SelectedAttributeRow {
    /// Same row identity: equal ids (both absent counts as equal) and kind.
    pub fn is_same(&self, row: &AttributeRow, kind: GeometryKind) -> bool {
        self.kind == kind && self.data.id == row.id
    }
}

/// Selection controller.
///
/// `selected_feature` (map click) and `selected_row` (table click) are
/// mutually exclusive; setting one clears the other. Hover is tracked
/// separately and never touches either.
impl ViewerState {
    /// Table-level selection.
    ///
    /// Re-selecting the identical `{id, kind}` deselects. Otherwise the row
    /// becomes the selection and the layer for `kind` is forced visible.
    pub fn select_row(&mut self, row: AttributeRow, kind: GeometryKind) {
        self.selected_feature = None;

        if self
            .selected_row
            .as_ref()
            .is_some_and(|sel| sel.is_same(&row, kind))
        {
            debug!(id = ?row.id, %kind, "row deselected");
            self.selected_row = None;
            return;
        }

        debug!(id = ?row.id, %kind, "row selected");
        self.selected_row = Some(SelectedAttributeRow { data: row, kind });
        self.visibility.add(kind.layer_id());
    }

    /// Map-level selection; `None` clears it.
    pub fn select_feature(&mut self, feature: Option<Feature>) {
        if feature.is_some() {
            self.selected_row = None;
        }
        debug!(
            source_layer = ?feature.as_ref().map(|f| f.source_layer.as_str()),
            id = ?feature.as_ref().and_then(Feature::id),
            "feature selected"
        );
        self.selected_feature = feature;
    }

    pub fn hover_feature(&mut self, feature: Option<Feature>) {
        self.hovered_feature = feature;
    }

    /// Full reset: both selections and all three highlight sets.
    pub fn clear_selection(&mut self) {
        self.selected_feature = None;
        self.selected_row = None;
        self.highlights.clear();
        debug!("selection cleared");
    }
}

#[cfg(test)]
mod tests {
    use crate::aggregator::AttributeBuckets;
    use crate::feature::{AttributeRow, Feature};
    use crate::kind::GeometryKind;
    use crate::state::ViewerState;
    use pretty_assertions::assert_eq;

    fn row(id: &str) -> AttributeRow {
        AttributeRow::with_id(id)
    }

    #[test]
    fn row_selection_clears_feature_selection() {
        let mut s = ViewerState::new();
        s.select_feature(Some(Feature::new("stp", row("f"))));
        s.select_row(row("r"), GeometryKind::Points);
        assert!(s.selected_feature.is_none());
        assert_eq!(s.selected_row.as_ref().map(|r| r.kind), Some(GeometryKind::Points));
    }

    #[test]
    fn feature_selection_clears_row_selection() {
        let mut s = ViewerState::new();
        s.select_row(row("r"), GeometryKind::Lines);
        s.select_feature(Some(Feature::new("stl", row("f"))));
        assert!(s.selected_row.is_none());
        assert!(s.selected_feature.is_some());
    }

    #[test]
    fn reclicking_identical_row_deselects() {
        let mut s = ViewerState::new();
        s.select_row(row("r"), GeometryKind::Lines);
        s.select_row(row("r"), GeometryKind::Lines);
        assert!(s.selected_row.is_none());
        assert!(s.selected_feature.is_none());
    }

    #[test]
    fn same_id_other_kind_is_a_new_selection() {
        let mut s = ViewerState::new();
        s.select_row(row("r"), GeometryKind::Lines);
        s.select_row(row("r"), GeometryKind::Polygons);
        assert_eq!(
            s.selected_row.as_ref().map(|r| r.kind),
            Some(GeometryKind::Polygons)
        );
    }

    #[test]
    fn selecting_row_forces_its_layer_visible() {
        let mut s = ViewerState::new();
        s.visibility.replace(["field"]);
        s.select_row(row("r"), GeometryKind::Points);
        assert!(s.visibility.contains("stp"));
        assert!(s.visibility.contains("field"));
    }

    #[test]
    fn deselect_does_not_touch_layers() {
        let mut s = ViewerState::new();
        s.select_row(row("r"), GeometryKind::Points);
        s.visibility.remove("stp");
        s.select_row(row("r"), GeometryKind::Points);
        assert!(!s.visibility.contains("stp"));
    }

    #[test]
    fn hover_is_independent_of_selection() {
        let mut s = ViewerState::new();
        s.select_row(row("r"), GeometryKind::Points);
        s.hover_feature(Some(Feature::new("sta", row("h"))));
        assert!(s.selected_row.is_some());
        s.hover_feature(None);
        assert!(s.hovered_feature.is_none());
    }

    #[test]
    fn clear_selection_resets_highlights() {
        let mut s = ViewerState::new();
        let features = [Feature::new("stp", row("1")), Feature::new("sta", row("2"))];
        s.buckets = AttributeBuckets::aggregate(&features).0;
        s.toggle_highlight(GeometryKind::Points);
        s.toggle_highlight(GeometryKind::Polygons);
        s.select_row(row("1"), GeometryKind::Points);

        s.clear_selection();
        assert!(s.selected_row.is_none());
        assert!(s.selected_feature.is_none());
        assert!(s.highlights.is_empty());
    }
}

use foundation::Aabb2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::AttributeRow;
use crate::kind::GeometryKind;
use crate::state::ViewerState;

/// Context-menu actions offered on every attribute-table row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    ShowOnMap,
    ShowBoundingBox,
    IsolateToThis,
    ShowAll,
    OpenReportCard,
}

impl RowAction {
    pub const ALL: [RowAction; 5] = [
        RowAction::ShowOnMap,
        RowAction::ShowBoundingBox,
        RowAction::IsolateToThis,
        RowAction::ShowAll,
        RowAction::OpenReportCard,
    ];
}

/// What the host has to do after a row action, beyond the state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum RowActionEffect {
    None,
    FitBounds { bounds: Aabb2 },
    OpenReport { archive_number: String },
}

impl ViewerState {
    /// Actions that make sense for `row` right now.
    ///
    /// `ShowAll` only while a filter is active; `OpenReportCard` only when the
    /// row carries an archive number.
    pub fn available_row_actions(&self, row: &AttributeRow) -> Vec<RowAction> {
        RowAction::ALL
            .into_iter()
            .filter(|a| match a {
                RowAction::ShowAll => self.is_filtering(),
                RowAction::OpenReportCard => row.archive_key().is_some(),
                _ => true,
            })
            .collect()
    }

    pub fn apply_row_action(
        &mut self,
        action: RowAction,
        row: AttributeRow,
        kind: GeometryKind,
    ) -> RowActionEffect {
        debug!(?action, id = ?row.id, %kind, "row action");
        match action {
            RowAction::ShowOnMap => {
                self.select_row(row, kind);
                RowActionEffect::None
            }
            RowAction::ShowBoundingBox => {
                let bounds = row
                    .id()
                    .and_then(|id| self.buckets.extent(kind, id))
                    .unwrap_or_else(Aabb2::zero);
                self.visibility.add(kind.layer_id());
                self.fit_bounds = Some(bounds);
                RowActionEffect::FitBounds { bounds }
            }
            RowAction::IsolateToThis => {
                self.isolate_to(row, kind);
                RowActionEffect::None
            }
            RowAction::ShowAll => {
                self.clear_filter();
                RowActionEffect::None
            }
            RowAction::OpenReportCard => match row.archive_key() {
                Some(archive_number) => RowActionEffect::OpenReport { archive_number },
                None => RowActionEffect::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RowAction, RowActionEffect};
    use crate::feature::{AttrValue, AttributeRow, Feature, Geometry};
    use crate::kind::GeometryKind;
    use crate::state::ViewerState;
    use foundation::{Aabb2, LngLat};
    use pretty_assertions::assert_eq;

    fn reported_row(id: &str) -> AttributeRow {
        let mut row = AttributeRow::with_id(id);
        row.archive_number = Some(AttrValue::from("A-100"));
        row
    }

    #[test]
    fn show_all_only_offered_while_filtering() {
        let mut s = ViewerState::new();
        let row = reported_row("1");
        assert!(!s.available_row_actions(&row).contains(&RowAction::ShowAll));
        s.isolate_to(row.clone(), GeometryKind::Points);
        assert_eq!(s.available_row_actions(&row), RowAction::ALL.to_vec());

        let bare = AttributeRow::with_id("2");
        assert!(!s.available_row_actions(&bare).contains(&RowAction::OpenReportCard));
    }

    #[test]
    fn bounding_box_uses_reported_geometry() {
        let mut s = ViewerState::new();
        s.refresh_attributes(&[Feature::new("stl", AttributeRow::with_id("l1"))
            .with_geometry(Geometry::LineString(vec![
                LngLat::new(10.0, 50.0),
                LngLat::new(12.0, 51.0),
            ]))]);
        let effect = s.apply_row_action(
            RowAction::ShowBoundingBox,
            AttributeRow::with_id("l1"),
            GeometryKind::Lines,
        );
        let expected = Aabb2::new([10.0, 50.0], [12.0, 51.0]);
        assert_eq!(effect, RowActionEffect::FitBounds { bounds: expected });
        assert_eq!(s.take_fit_bounds(), Some(expected));
        assert_eq!(s.take_fit_bounds(), None);
    }

    #[test]
    fn bounding_box_of_unknown_row_is_zero() {
        let mut s = ViewerState::new();
        let effect = s.apply_row_action(
            RowAction::ShowBoundingBox,
            AttributeRow::with_id("ghost"),
            GeometryKind::Polygons,
        );
        assert_eq!(effect, RowActionEffect::FitBounds { bounds: Aabb2::zero() });
    }

    #[test]
    fn isolate_then_show_all_round_trip() {
        let mut s = ViewerState::new();
        s.visibility.replace(["field"]);
        s.apply_row_action(RowAction::IsolateToThis, reported_row("1"), GeometryKind::Polygons);
        assert!(s.is_filtering());
        assert!(s.visibility.contains("sta"));
        s.apply_row_action(RowAction::ShowAll, reported_row("1"), GeometryKind::Polygons);
        assert!(!s.is_filtering());
        assert_eq!(s.visibility.len(), 5);
    }

    #[test]
    fn show_on_map_selects_and_report_card_requests_fetch() {
        let mut s = ViewerState::new();
        s.apply_row_action(RowAction::ShowOnMap, reported_row("1"), GeometryKind::Points);
        assert!(s.selected_row.is_some());

        let effect = s.apply_row_action(
            RowAction::OpenReportCard,
            reported_row("1"),
            GeometryKind::Points,
        );
        assert_eq!(
            effect,
            RowActionEffect::OpenReport {
                archive_number: "A-100".to_string()
            }
        );
        // Opening the card is not a selection change.
        assert!(s.selected_row.is_some());
    }
}

//! License-area picking: pick an area, pick it again to drop a marker on it.
//!
//! ```text
//! NoSelection  --select(a)-----------> Selected(a)
//! Selected(a)  --select(a)-----------> MarkerPlaced(a, pos, show_info)
//! Selected(a)  --select(b)-----------> Selected(b)
//! MarkerPlaced(a) --select(a)--------> MarkerPlaced(a, pos, show_info)
//! MarkerPlaced(a) --select(b)--------> Selected(b)
//! *            --select(None)--------> NoSelection
//! ```
//!
//! Every transition except marker (re)placement empties the attribute buckets.

use foundation::LngLat;
use serde::Serialize;
use tracing::debug;

use crate::feature::{Feature, Geometry};
use crate::state::{ActiveTool, ViewerState};

/// Attribute holding a license area's display name.
pub const LU_NAME_FIELD: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseArea {
    pub feature: Feature,
}

impl LicenseArea {
    pub fn new(feature: Feature) -> Self {
        Self { feature }
    }

    pub fn id(&self) -> Option<&str> {
        self.feature.id()
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> String {
        match self.feature.properties.extra.get(LU_NAME_FIELD) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => self.id().unwrap_or_default().to_string(),
        }
    }

    /// Where the marker goes: the point itself, or the centre of the
    /// geometry's bounding box.
    pub fn marker_position(&self) -> LngLat {
        if let Some(Geometry::Point(p)) = &self.feature.geometry {
            return *p;
        }
        self.feature.bbox().center()
    }
}

impl From<Feature> for LicenseArea {
    fn from(feature: Feature) -> Self {
        Self::new(feature)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LuSelection {
    #[default]
    NoSelection,
    Selected {
        area: LicenseArea,
    },
    MarkerPlaced {
        area: LicenseArea,
        position: LngLat,
        info_visible: bool,
    },
}

impl LuSelection {
    pub fn area(&self) -> Option<&LicenseArea> {
        match self {
            LuSelection::NoSelection => None,
            LuSelection::Selected { area } | LuSelection::MarkerPlaced { area, .. } => Some(area),
        }
    }

    pub fn marker(&self) -> Option<LngLat> {
        match self {
            LuSelection::MarkerPlaced { position, .. } => Some(*position),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LuSelection::NoSelection => "no_selection",
            LuSelection::Selected { .. } => "selected",
            LuSelection::MarkerPlaced { .. } => "marker_placed",
        }
    }
}

impl ViewerState {
    /// Drives the license-area state machine.
    ///
    /// Ids are compared as options, so two id-less areas count as the same.
    pub fn select_lu(&mut self, area: Option<LicenseArea>, show_info: bool) {
        let from = self.lu.name();

        let Some(area) = area else {
            self.lu = LuSelection::NoSelection;
            self.marker_label = None;
            self.buckets.clear();
            debug!(from, to = "no_selection", "lu selection");
            return;
        };

        let same = self.lu.area().is_some_and(|cur| cur.id() == area.id());
        if same {
            let position = area.marker_position();
            self.marker_label = Some(area.name());
            if show_info {
                self.active_tool = Some(ActiveTool::Info);
            }
            self.lu = LuSelection::MarkerPlaced {
                area,
                position,
                info_visible: show_info,
            };
        } else {
            self.marker_label = None;
            self.buckets.clear();
            self.lu = LuSelection::Selected { area };
        }
        debug!(from, to = self.lu.name(), id = ?self.lu.area().and_then(LicenseArea::id), "lu selection");
    }

    /// Closes the info popup while keeping the marker.
    pub fn hide_lu_info(&mut self) {
        if let LuSelection::MarkerPlaced { info_visible, .. } = &mut self.lu {
            *info_visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LicenseArea, LuSelection};
    use crate::feature::{AttrValue, AttributeRow, Feature, Geometry};
    use crate::state::{ActiveTool, ViewerState};
    use foundation::LngLat;
    use pretty_assertions::assert_eq;

    fn square(id: &str) -> LicenseArea {
        let ring = vec![
            LngLat::new(0.0, 0.0),
            LngLat::new(2.0, 0.0),
            LngLat::new(2.0, 2.0),
            LngLat::new(0.0, 2.0),
        ];
        let mut props = AttributeRow::with_id(id);
        props
            .extra
            .insert("name".to_string(), AttrValue::from("North block"));
        LicenseArea::new(Feature::new("lu", props).with_geometry(Geometry::Polygon(vec![ring])))
    }

    fn point(id: &str, lng: f64, lat: f64) -> LicenseArea {
        LicenseArea::new(
            Feature::new("lu", AttributeRow::with_id(id))
                .with_geometry(Geometry::Point(LngLat::new(lng, lat))),
        )
    }

    fn with_buckets() -> ViewerState {
        let mut s = ViewerState::new();
        s.refresh_attributes(&[
            Feature::new("stp", AttributeRow::with_id("1")),
            Feature::new("stl", AttributeRow::with_id("2")),
            Feature::new("sta", AttributeRow::with_id("3")),
        ]);
        s
    }

    #[test]
    fn full_scenario() {
        let mut s = with_buckets();
        let a = square("A");

        s.select_lu(Some(a.clone()), true);
        assert_eq!(s.lu, LuSelection::Selected { area: a.clone() });
        assert!(s.buckets.is_empty());

        s.select_lu(Some(a.clone()), true);
        assert_eq!(
            s.lu,
            LuSelection::MarkerPlaced {
                area: a.clone(),
                position: LngLat::new(1.0, 1.0),
                info_visible: true,
            }
        );
        assert_eq!(s.active_tool, Some(ActiveTool::Info));
        assert_eq!(s.marker_label.as_deref(), Some("North block"));

        let b = square("B");
        s.select_lu(Some(b.clone()), true);
        assert_eq!(s.lu, LuSelection::Selected { area: b });
        assert_eq!(s.lu.marker(), None);
        assert_eq!(s.marker_label, None);

        s.refresh_attributes(&[Feature::new("stp", AttributeRow::with_id("9"))]);
        s.select_lu(None, true);
        assert_eq!(s.lu, LuSelection::NoSelection);
        assert!(s.buckets.is_empty());
        assert_eq!(s.marker_label, None);
    }

    #[test]
    fn replacing_marker_is_stable() {
        let mut s = ViewerState::new();
        let a = square("A");
        s.select_lu(Some(a.clone()), true);
        s.select_lu(Some(a.clone()), true);
        let placed = s.lu.clone();
        s.select_lu(Some(a), true);
        assert_eq!(s.lu, placed);
    }

    #[test]
    fn marker_placement_keeps_buckets() {
        let mut s = ViewerState::new();
        let a = square("A");
        s.select_lu(Some(a.clone()), true);
        s.refresh_attributes(&[Feature::new("stp", AttributeRow::with_id("1"))]);
        s.select_lu(Some(a), false);
        assert_eq!(s.buckets.points.len(), 1);
    }

    #[test]
    fn point_area_uses_its_own_position_and_show_info_false_leaves_tool() {
        let mut s = ViewerState::new();
        let p = point("P", 37.6, 55.7);
        s.select_lu(Some(p.clone()), false);
        s.select_lu(Some(p), false);
        assert_eq!(s.lu.marker(), Some(LngLat::new(37.6, 55.7)));
        assert_eq!(s.active_tool, None);
        assert!(matches!(
            s.lu,
            LuSelection::MarkerPlaced {
                info_visible: false,
                ..
            }
        ));
        // Unnamed areas are labelled by id.
        assert_eq!(s.marker_label.as_deref(), Some("P"));
    }

    #[test]
    fn marker_placed_then_other_area_goes_to_selected() {
        let mut s = ViewerState::new();
        let a = square("A");
        s.select_lu(Some(a.clone()), true);
        s.select_lu(Some(a), true);
        let c = point("C", 1.0, 1.0);
        s.select_lu(Some(c.clone()), true);
        assert_eq!(s.lu, LuSelection::Selected { area: c });
    }

    #[test]
    fn degenerate_area_marker_falls_back_to_origin() {
        let mut s = ViewerState::new();
        let empty = LicenseArea::new(
            Feature::new("lu", AttributeRow::with_id("E"))
                .with_geometry(Geometry::Polygon(vec![Vec::new()])),
        );
        s.select_lu(Some(empty.clone()), true);
        s.select_lu(Some(empty), true);
        assert_eq!(s.lu.marker(), Some(LngLat::new(0.0, 0.0)));
    }

    #[test]
    fn hide_info_keeps_marker() {
        let mut s = ViewerState::new();
        let a = square("A");
        s.select_lu(Some(a.clone()), true);
        s.select_lu(Some(a), true);
        s.hide_lu_info();
        assert!(matches!(
            s.lu,
            LuSelection::MarkerPlaced {
                info_visible: false,
                ..
            }
        ));
        assert_eq!(s.lu.marker(), Some(LngLat::new(1.0, 1.0)));
    }
}

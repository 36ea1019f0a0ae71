use foundation::{Aabb2, LngLat};
use serde::{Deserialize, Serialize};

use crate::aggregator::AttributeBuckets;
use crate::feature::Feature;
use crate::filter::FilteredFeature;
use crate::highlight::HighlightSets;
use crate::lu::LuSelection;
use crate::selection::SelectedAttributeRow;
use crate::visibility::LayerVisibilitySet;

/// Camera as last reported by the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub lng: f64,
    pub lat: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl ViewState {
    pub fn center(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            lng: 60.0,
            lat: 60.0,
            zoom: 3.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTool {
    Info,
}

/// Single source of truth for the viewer.
///
/// Every controller is a set of `&mut self` transitions on this value (see
/// `selection`, `filter`, `highlight`, `lu` and `aggregator`). A transition
/// is fully applied before it returns, so hosts can run their reactions
/// (layer reconciliation, bucket refresh) right after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    pub visibility: LayerVisibilitySet,
    pub buckets: AttributeBuckets,
    pub highlights: HighlightSets,
    pub selected_feature: Option<Feature>,
    pub hovered_feature: Option<Feature>,
    pub selected_row: Option<SelectedAttributeRow>,
    pub filtered: Option<FilteredFeature>,
    pub lu: LuSelection,
    pub marker_label: Option<String>,
    pub active_tool: Option<ActiveTool>,
    pub view: ViewState,
    /// Pending fit-bounds request from the "show bounding box" row action.
    pub fit_bounds: Option<Aabb2>,
    pub style: String,
}

pub const DEFAULT_STYLE: &str = "basic";

impl ViewerState {
    pub fn new() -> Self {
        Self::with_view(ViewState::default())
    }

    pub fn with_view(view: ViewState) -> Self {
        Self {
            visibility: LayerVisibilitySet::default_universe(),
            buckets: AttributeBuckets::new(),
            highlights: HighlightSets::default(),
            selected_feature: None,
            hovered_feature: None,
            selected_row: None,
            filtered: None,
            lu: LuSelection::NoSelection,
            marker_label: None,
            active_tool: None,
            view,
            fit_bounds: None,
            style: DEFAULT_STYLE.to_string(),
        }
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Takes the pending fit-bounds request, if any.
    pub fn take_fit_bounds(&mut self) -> Option<Aabb2> {
        self.fit_bounds.take()
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

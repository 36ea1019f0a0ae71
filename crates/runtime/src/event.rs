use report::ReportCard;
use scene::{AttributeRow, Feature, GeometryKind, RowAction, ViewState};
use serde::{Deserialize, Serialize};

/// Everything the host can tell the viewer: map signals, UI actions and
/// report-fetch completions.
///
/// Serialized with an `event` tag so sessions can be scripted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewerEvent {
    MapLoaded,
    /// Features under the cursor; `click` selects the first, otherwise it is
    /// hovered.
    FeaturesAtPoint {
        features: Vec<Feature>,
        #[serde(default)]
        click: bool,
    },
    /// Features intersecting the visible layers, feeding the attribute tables.
    FeaturesQueried {
        features: Vec<Feature>,
    },
    ViewChanged {
        view: ViewState,
    },
    ToggleLayer {
        id: String,
    },
    SetLayers {
        ids: Vec<String>,
    },
    SelectRow {
        row: AttributeRow,
        kind: GeometryKind,
    },
    SelectFeature {
        feature: Option<Feature>,
    },
    HoverFeature {
        feature: Option<Feature>,
    },
    ClearSelection,
    IsolateTo {
        row: AttributeRow,
        kind: GeometryKind,
    },
    ClearFilter,
    ToggleHighlight {
        kind: GeometryKind,
    },
    SelectLu {
        area: Option<Feature>,
        #[serde(default = "show_info_default")]
        show_info: bool,
    },
    HideLuInfo,
    RowAction {
        action: RowAction,
        row: AttributeRow,
        kind: GeometryKind,
    },
    SetStyle {
        style: String,
    },
    CloseReport,
    ReportLoaded {
        archive_number: String,
        card: ReportCard,
    },
    ReportFailed {
        archive_number: String,
        message: String,
    },
}

fn show_info_default() -> bool {
    true
}

impl ViewerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::MapLoaded => "map_loaded",
            ViewerEvent::FeaturesAtPoint { .. } => "features_at_point",
            ViewerEvent::FeaturesQueried { .. } => "features_queried",
            ViewerEvent::ViewChanged { .. } => "view_changed",
            ViewerEvent::ToggleLayer { .. } => "toggle_layer",
            ViewerEvent::SetLayers { .. } => "set_layers",
            ViewerEvent::SelectRow { .. } => "select_row",
            ViewerEvent::SelectFeature { .. } => "select_feature",
            ViewerEvent::HoverFeature { .. } => "hover_feature",
            ViewerEvent::ClearSelection => "clear_selection",
            ViewerEvent::IsolateTo { .. } => "isolate_to",
            ViewerEvent::ClearFilter => "clear_filter",
            ViewerEvent::ToggleHighlight { .. } => "toggle_highlight",
            ViewerEvent::SelectLu { .. } => "select_lu",
            ViewerEvent::HideLuInfo => "hide_lu_info",
            ViewerEvent::RowAction { .. } => "row_action",
            ViewerEvent::SetStyle { .. } => "set_style",
            ViewerEvent::CloseReport => "close_report",
            ViewerEvent::ReportLoaded { .. } => "report_loaded",
            ViewerEvent::ReportFailed { .. } => "report_failed",
        }
    }

    /// Parses a session script: a JSON array of events.
    pub fn session_from_json_str(raw: &str) -> Result<Vec<ViewerEvent>, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

//! The viewer host: owns the one live `ViewerState` and runs the map
//! reactions after every transition.

use catalog::LayerCatalog;
use layers::{LayerSynchronizer, MapSurface, SyncReport};
use report::{ReportCard, ReportError};
use scene::{LicenseArea, RowActionEffect, ViewerState};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::event::ViewerEvent;
use crate::event_bus::{Event, EventBus};

/// Report dialog state. Never feeds back into selection, filter or highlight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportPanel {
    #[default]
    Closed,
    Loading {
        archive_number: String,
    },
    Loaded {
        archive_number: String,
        card: ReportCard,
    },
    Failed {
        archive_number: String,
        message: String,
    },
}

/// Serializable snapshot of a viewer, for hosts and logs.
#[derive(Debug, Serialize)]
pub struct ViewerSummary<'a> {
    pub state: &'a ViewerState,
    pub report: &'a ReportPanel,
    pub events: &'a [Event],
}

pub struct Viewer<M: MapSurface> {
    state: ViewerState,
    sync: LayerSynchronizer,
    map: M,
    bus: EventBus,
    report: ReportPanel,
    report_requests: Vec<String>,
    synced_revision: Option<u64>,
}

impl<M: MapSurface> Viewer<M> {
    pub fn new(config: &ViewerConfig, catalog: LayerCatalog, map: M) -> Self {
        let mut state = ViewerState::with_view(config.initial_view);
        state.set_style(config.base_style.clone());
        Self {
            state,
            sync: LayerSynchronizer::new(catalog, config.tiles_base_url.clone()),
            map,
            bus: EventBus::new(),
            report: ReportPanel::Closed,
            report_requests: Vec::new(),
            synced_revision: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn report(&self) -> &ReportPanel {
        &self.report
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn summary(&self) -> ViewerSummary<'_> {
        ViewerSummary {
            state: &self.state,
            report: &self.report,
            events: self.bus.events(),
        }
    }

    /// Archive numbers whose report card should be fetched, oldest first.
    pub fn take_report_requests(&mut self) -> Vec<String> {
        std::mem::take(&mut self.report_requests)
    }

    /// Applies one event and the map reactions it triggers.
    ///
    /// Returns the row-action effect when the event was a row action.
    pub fn dispatch(&mut self, event: ViewerEvent) -> Option<RowActionEffect> {
        let seq = self.bus.advance();
        debug!(seq, event = event.name(), "dispatch");

        let mut effect = None;
        match event {
            ViewerEvent::MapLoaded => {
                let report = self.sync.on_map_loaded(&self.state, &mut self.map);
                self.record_sync(&report);
                return None;
            }
            ViewerEvent::FeaturesAtPoint { features, click } => {
                let first = features.into_iter().next();
                if click {
                    self.state.select_feature(first);
                } else {
                    self.state.hover_feature(first);
                }
            }
            ViewerEvent::FeaturesQueried { features } => {
                let summary = self.state.refresh_attributes(&features);
                self.bus.emit(
                    "attributes",
                    format!(
                        "{} points, {} lines, {} polygons, {} dropped",
                        summary.points, summary.lines, summary.polygons, summary.dropped
                    ),
                );
            }
            ViewerEvent::ViewChanged { view } => self.state.set_view(view),
            ViewerEvent::ToggleLayer { id } => {
                let on = self.state.visibility.toggle(&id);
                self.bus
                    .emit("visibility", format!("{id} {}", if on { "on" } else { "off" }));
            }
            ViewerEvent::SetLayers { ids } => {
                self.state.visibility.replace(ids);
            }
            ViewerEvent::SelectRow { row, kind } => self.state.select_row(row, kind),
            ViewerEvent::SelectFeature { feature } => self.state.select_feature(feature),
            ViewerEvent::HoverFeature { feature } => self.state.hover_feature(feature),
            ViewerEvent::ClearSelection => self.state.clear_selection(),
            ViewerEvent::IsolateTo { row, kind } => self.state.isolate_to(row, kind),
            ViewerEvent::ClearFilter => self.state.clear_filter(),
            ViewerEvent::ToggleHighlight { kind } => {
                self.state.toggle_highlight(kind);
                self.bus.emit(
                    "highlight",
                    format!("{kind}: {}", self.state.highlights.get(kind).len()),
                );
            }
            ViewerEvent::SelectLu { area, show_info } => {
                self.state.select_lu(area.map(LicenseArea::from), show_info);
            }
            ViewerEvent::HideLuInfo => self.state.hide_lu_info(),
            ViewerEvent::RowAction { action, row, kind } => {
                let result = self.state.apply_row_action(action, row, kind);
                match &result {
                    RowActionEffect::OpenReport { archive_number } => {
                        self.open_report(archive_number.clone());
                    }
                    RowActionEffect::FitBounds { bounds } => {
                        self.bus.emit("fit_bounds", format!("{bounds:?}"));
                    }
                    RowActionEffect::None => {}
                }
                effect = Some(result);
            }
            ViewerEvent::SetStyle { style } => self.state.set_style(style),
            ViewerEvent::CloseReport => self.report = ReportPanel::Closed,
            ViewerEvent::ReportLoaded {
                archive_number,
                card,
            } => self.apply_report_result(archive_number, Ok(card)),
            ViewerEvent::ReportFailed {
                archive_number,
                message,
            } => self.apply_report_result(archive_number, Err(message)),
        }

        self.react();
        effect
    }

    fn open_report(&mut self, archive_number: String) {
        self.bus.emit("report", format!("requested {archive_number}"));
        self.report_requests.push(archive_number.clone());
        self.report = ReportPanel::Loading { archive_number };
    }

    /// Stores a finished report fetch.
    ///
    /// Results overwrite the panel in arrival order, even when a newer
    /// request is still in flight.
    pub fn apply_report_result(&mut self, archive_number: String, result: Result<ReportCard, String>) {
        self.report = match result {
            Ok(card) => {
                self.bus.emit("report", format!("loaded {archive_number}"));
                ReportPanel::Loaded {
                    archive_number,
                    card,
                }
            }
            Err(message) => {
                warn!(%archive_number, %message, "report fetch failed");
                self.bus.emit("report", format!("failed {archive_number}: {message}"));
                ReportPanel::Failed {
                    archive_number,
                    message,
                }
            }
        };
    }

    /// Convenience for hosts that get a typed client result.
    pub fn apply_report_fetch(&mut self, archive_number: String, result: Result<ReportCard, ReportError>) {
        self.apply_report_result(archive_number, result.map_err(|e| e.to_string()));
    }

    /// Map reactions after a transition: full reconciliation when the
    /// visible set changed or the last pass had failures, otherwise only the
    /// cheap idempotent checks.
    fn react(&mut self) {
        let revision = self.state.visibility.revision();
        if self.synced_revision != Some(revision) {
            let report = self.sync.sync(&self.state, &mut self.map);
            self.record_sync(&report);
        } else {
            if let Err(err) = self.sync.sync_style(&self.state.style, &mut self.map) {
                warn!(style = %self.state.style, %err, "base style failed");
            }
            self.sync.sync_filters(&self.state, &mut self.map);
        }
    }

    fn record_sync(&mut self, report: &SyncReport) {
        if report.deferred {
            self.bus.emit("sync", "deferred until map is loaded");
            return;
        }
        // Failed overlays keep the revision unsynced so the next event retries them.
        if report.failed.is_empty() {
            self.synced_revision = Some(self.state.visibility.revision());
        }
        for id in &report.created {
            self.bus.emit("sync", format!("added {id}"));
        }
        for id in &report.removed {
            self.bus.emit("sync", format!("removed {id}"));
        }
        for id in &report.failed {
            self.bus.emit("sync", format!("failed {id}"));
        }
    }
}

//! Diff-and-patch reconciliation of the visible-layer set against the map.

use std::collections::BTreeMap;

use catalog::LayerCatalog;
use scene::{GeometryKind, LayerVisibilitySet, ViewerState};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::layer::{OverlayIds, paint_layer, vector_source};
use crate::surface::{MapError, MapSurface};

/// Outcome of one reconciliation pass, by catalog layer id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub removed: Vec<String>,
    pub failed: Vec<String>,
    /// The map was not loaded; nothing was touched.
    pub deferred: bool,
}

impl SyncReport {
    fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    /// `true` when the pass changed nothing on the map.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Keeps the map's overlay sources and layers in line with a
/// `LayerVisibilitySet`.
///
/// Every pass walks the whole catalog and checks the map before creating or
/// removing anything, so it can run after any state change. Passes issued
/// before the map is loaded are recorded and replayed by `on_map_loaded`.
#[derive(Debug)]
pub struct LayerSynchronizer {
    catalog: LayerCatalog,
    tiles_base_url: String,
    pending: bool,
    applied_filters: BTreeMap<String, String>,
    applied_style: Option<String>,
}

impl LayerSynchronizer {
    pub fn new(catalog: LayerCatalog, tiles_base_url: impl Into<String>) -> Self {
        Self {
            catalog,
            tiles_base_url: tiles_base_url.into(),
            pending: false,
            applied_filters: BTreeMap::new(),
            applied_style: None,
        }
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// A pass was skipped because the map was not loaded yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reconcile(
        &mut self,
        visible: &LayerVisibilitySet,
        map: &mut dyn MapSurface,
    ) -> SyncReport {
        if !map.is_loaded() {
            debug!(revision = visible.revision(), "map not loaded, deferring layer sync");
            self.pending = true;
            return SyncReport::deferred();
        }
        self.pending = false;

        let mut report = SyncReport::default();
        for descriptor in self.catalog.layers() {
            let ids = OverlayIds::for_layer_id(&descriptor.id);
            let outcome = if visible.contains(&descriptor.id) {
                self.create(descriptor, &ids, map)
            } else {
                remove_overlay(&ids, map)
            };
            match outcome {
                Ok(false) => {}
                Ok(true) if visible.contains(&descriptor.id) => {
                    info!(layer = %descriptor.id, "overlay added");
                    report.created.push(descriptor.id.clone());
                }
                Ok(true) => {
                    info!(layer = %descriptor.id, "overlay removed");
                    self.applied_filters.remove(&ids.layer);
                    report.removed.push(descriptor.id.clone());
                }
                Err(err) => {
                    warn!(layer = %descriptor.id, %err, "overlay sync failed");
                    report.failed.push(descriptor.id.clone());
                }
            }
        }
        report
    }

    fn create(
        &self,
        descriptor: &catalog::LayerDescriptor,
        ids: &OverlayIds,
        map: &mut dyn MapSurface,
    ) -> Result<bool, MapError> {
        let mut changed = false;
        if !map.has_source(&ids.source) {
            map.add_source(vector_source(descriptor, &self.tiles_base_url))?;
            changed = true;
        }
        if !map.has_layer(&ids.layer) {
            map.add_layer(paint_layer(descriptor))?;
            changed = true;
        }
        Ok(changed)
    }

    /// Applies the isolation filter of `state` to the point, line and polygon
    /// overlays. Returns the number of layers whose filter changed.
    ///
    /// An isolated row without an id puts no restriction on its layer.
    pub fn sync_filters(&mut self, state: &ViewerState, map: &mut dyn MapSurface) -> usize {
        if !map.is_loaded() {
            self.pending = true;
            return 0;
        }
        let mut changed = 0;
        for kind in GeometryKind::ALL {
            let layer = OverlayIds::for_layer_id(kind.layer_id()).layer;
            if !map.has_layer(&layer) {
                self.applied_filters.remove(&layer);
                continue;
            }
            let wanted = state.filter_for(kind).and_then(|f| f.id);
            if self.applied_filters.get(&layer) == wanted.as_ref() {
                continue;
            }
            match map.set_layer_filter(&layer, wanted.as_deref()) {
                Ok(()) => {
                    debug!(%layer, id = ?wanted, "layer filter set");
                    match wanted {
                        Some(id) => self.applied_filters.insert(layer, id),
                        None => self.applied_filters.remove(&layer),
                    };
                    changed += 1;
                }
                Err(err) => warn!(%layer, %err, "layer filter failed"),
            }
        }
        changed
    }

    /// Switches the base style if it differs from the last one applied.
    pub fn sync_style(&mut self, style: &str, map: &mut dyn MapSurface) -> Result<bool, MapError> {
        if self.applied_style.as_deref() == Some(style) {
            return Ok(false);
        }
        if !map.is_loaded() {
            self.pending = true;
            return Ok(false);
        }
        map.set_style(style)?;
        info!(style, "base style applied");
        self.applied_style = Some(style.to_string());
        Ok(true)
    }

    /// Brings the map fully in line with `state`: style, overlays, filters.
    pub fn sync(&mut self, state: &ViewerState, map: &mut dyn MapSurface) -> SyncReport {
        if let Err(err) = self.sync_style(&state.style, map) {
            warn!(style = %state.style, %err, "base style failed");
        }
        let report = self.reconcile(&state.visibility, map);
        if !report.deferred {
            self.sync_filters(state, map);
        }
        report
    }

    /// Replays everything skipped while the map was loading.
    pub fn on_map_loaded(&mut self, state: &ViewerState, map: &mut dyn MapSurface) -> SyncReport {
        debug!(pending = self.pending, "map loaded");
        self.sync(state, map)
    }
}

fn remove_overlay(ids: &OverlayIds, map: &mut dyn MapSurface) -> Result<bool, MapError> {
    let mut changed = false;
    if map.has_layer(&ids.layer) {
        map.remove_layer(&ids.layer)?;
        changed = true;
    }
    if map.has_source(&ids.source) {
        map.remove_source(&ids.source)?;
        changed = true;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::LayerSynchronizer;
    use crate::headless::{HeadlessMap, MapOp};
    use crate::surface::MapSurface;
    use catalog::LayerCatalog;
    use pretty_assertions::assert_eq;
    use scene::{AttributeRow, GeometryKind, LayerVisibilitySet, ViewerState};

    fn sync() -> LayerSynchronizer {
        LayerSynchronizer::new(LayerCatalog::default(), "http://tiles")
    }

    #[test]
    fn creates_visible_overlays_then_does_nothing() {
        let mut map = HeadlessMap::loaded();
        let mut s = sync();
        let visible = LayerVisibilitySet::default_universe();

        let first = s.reconcile(&visible, &mut map);
        assert_eq!(first.created, vec!["field", "lu", "sta", "stl", "stp"]);
        assert!(first.removed.is_empty());
        assert_eq!(map.take_ops().len(), 10);

        let second = s.reconcile(&visible, &mut map);
        assert!(second.is_noop());
        assert!(map.ops().is_empty());
    }

    #[test]
    fn removes_layer_before_source() {
        let mut map = HeadlessMap::loaded();
        let mut s = sync();
        let mut visible = LayerVisibilitySet::default_universe();
        s.reconcile(&visible, &mut map);
        map.take_ops();

        visible.remove("stl");
        let report = s.reconcile(&visible, &mut map);
        assert_eq!(report.removed, vec!["stl"]);
        assert_eq!(
            map.ops(),
            &[
                MapOp::RemoveLayer("stl-line".into()),
                MapOp::RemoveSource("stl".into()),
            ]
        );
        assert!(!map.has_source("stl"));
    }

    #[test]
    fn defers_until_loaded_then_replays() {
        let mut map = HeadlessMap::new();
        let mut s = sync();
        let mut state = ViewerState::new();
        state.visibility.replace(["lu", "stp"]);

        let report = s.reconcile(&state.visibility, &mut map);
        assert!(report.deferred);
        assert!(s.is_pending());
        assert!(map.ops().is_empty());

        map.set_loaded(true);
        let report = s.on_map_loaded(&state, &mut map);
        assert!(!s.is_pending());
        assert_eq!(report.created, vec!["lu", "stp"]);
        assert_eq!(map.style(), Some("basic"));
        assert_eq!(map.layer_ids().collect::<Vec<_>>(), vec!["lu-fill", "stp-circle"]);
    }

    #[test]
    fn ids_outside_the_catalog_are_ignored() {
        let mut map = HeadlessMap::loaded();
        let mut s = sync();
        let mut visible = LayerVisibilitySet::empty();
        visible.add("not-a-layer");
        let report = s.reconcile(&visible, &mut map);
        assert!(report.is_noop());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn failure_is_counted_and_pass_continues() {
        let mut map = HeadlessMap::loaded();
        map.reject_id("sta");
        let mut s = sync();
        let report = s.reconcile(&LayerVisibilitySet::default_universe(), &mut map);
        assert_eq!(report.failed, vec!["sta"]);
        assert_eq!(report.created, vec!["field", "lu", "stl", "stp"]);
    }

    #[test]
    fn filters_follow_isolation_and_are_idempotent() {
        let mut map = HeadlessMap::loaded();
        let mut s = sync();
        let mut state = ViewerState::new();
        s.sync(&state, &mut map);
        // Nothing isolated: no filter calls at all.
        assert_eq!(s.sync_filters(&state, &mut map), 0);

        state.isolate_to(AttributeRow::with_id("42"), GeometryKind::Lines);
        assert_eq!(s.sync_filters(&state, &mut map), 1);
        assert_eq!(map.filter("stl-line"), Some("42"));
        assert_eq!(s.sync_filters(&state, &mut map), 0);

        state.clear_filter();
        assert_eq!(s.sync_filters(&state, &mut map), 1);
        assert_eq!(map.filter("stl-line"), None);
    }

    #[test]
    fn style_is_applied_once() {
        let mut map = HeadlessMap::loaded();
        let mut s = sync();
        assert_eq!(s.sync_style("basic", &mut map), Ok(true));
        assert_eq!(s.sync_style("basic", &mut map), Ok(false));
        assert_eq!(s.sync_style("satellite", &mut map), Ok(true));
    }
}

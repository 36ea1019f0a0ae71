use std::collections::BTreeMap;

use serde::Serialize;

use crate::layer::{PaintLayer, VectorSource};
use crate::surface::{MapError, MapSurface};

/// One call made against a `HeadlessMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "id", rename_all = "snake_case")]
pub enum MapOp {
    AddSource(String),
    AddLayer(String),
    RemoveLayer(String),
    RemoveSource(String),
    SetFilter(String),
    SetStyle(String),
}

/// In-memory map surface.
///
/// Behaves like a strict imperative map API (duplicate adds and unknown
/// removes fail) and records every successful call. Used by the native
/// viewer and by tests.
#[derive(Debug, Default, Serialize)]
pub struct HeadlessMap {
    loaded: bool,
    style: Option<String>,
    sources: BTreeMap<String, VectorSource>,
    layers: BTreeMap<String, PaintLayer>,
    filters: BTreeMap<String, String>,
    #[serde(skip)]
    ops: Vec<MapOp>,
    #[serde(skip)]
    reject: Option<String>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded() -> Self {
        Self {
            loaded: true,
            ..Self::default()
        }
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Makes every call touching `id` fail with `MapError::Rejected`.
    pub fn reject_id(&mut self, id: impl Into<String>) {
        self.reject = Some(id.into());
    }

    pub fn accept_all(&mut self) {
        self.reject = None;
    }

    pub fn ops(&self) -> &[MapOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<MapOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.keys().map(String::as_str)
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.keys().map(String::as_str)
    }

    pub fn layer(&self, id: &str) -> Option<&PaintLayer> {
        self.layers.get(id)
    }

    pub fn filter(&self, layer_id: &str) -> Option<&str> {
        self.filters.get(layer_id).map(String::as_str)
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    fn check(&self, op: &'static str, id: &str) -> Result<(), MapError> {
        if !self.loaded {
            return Err(MapError::NotLoaded);
        }
        if self.reject.as_deref() == Some(id) {
            return Err(MapError::Rejected {
                op,
                id: id.to_string(),
                message: "rejected".to_string(),
            });
        }
        Ok(())
    }
}

impl MapSurface for HeadlessMap {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn add_source(&mut self, source: VectorSource) -> Result<(), MapError> {
        self.check("add_source", &source.id)?;
        if self.sources.contains_key(&source.id) {
            return Err(MapError::AlreadyExists(source.id));
        }
        self.ops.push(MapOp::AddSource(source.id.clone()));
        self.sources.insert(source.id.clone(), source);
        Ok(())
    }

    fn add_layer(&mut self, layer: PaintLayer) -> Result<(), MapError> {
        self.check("add_layer", &layer.id)?;
        if self.layers.contains_key(&layer.id) {
            return Err(MapError::AlreadyExists(layer.id));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::Unknown(layer.source));
        }
        self.ops.push(MapOp::AddLayer(layer.id.clone()));
        self.layers.insert(layer.id.clone(), layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        self.check("remove_layer", id)?;
        if self.layers.remove(id).is_none() {
            return Err(MapError::Unknown(id.to_string()));
        }
        self.filters.remove(id);
        self.ops.push(MapOp::RemoveLayer(id.to_string()));
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapError> {
        self.check("remove_source", id)?;
        if self.layers.values().any(|l| l.source == id) {
            return Err(MapError::Rejected {
                op: "remove_source",
                id: id.to_string(),
                message: "source still in use by a layer".to_string(),
            });
        }
        if self.sources.remove(id).is_none() {
            return Err(MapError::Unknown(id.to_string()));
        }
        self.ops.push(MapOp::RemoveSource(id.to_string()));
        Ok(())
    }

    fn set_layer_filter(
        &mut self,
        layer_id: &str,
        feature_id: Option<&str>,
    ) -> Result<(), MapError> {
        self.check("set_layer_filter", layer_id)?;
        if !self.layers.contains_key(layer_id) {
            return Err(MapError::Unknown(layer_id.to_string()));
        }
        match feature_id {
            Some(id) => self.filters.insert(layer_id.to_string(), id.to_string()),
            None => self.filters.remove(layer_id),
        };
        self.ops.push(MapOp::SetFilter(layer_id.to_string()));
        Ok(())
    }

    fn set_style(&mut self, style: &str) -> Result<(), MapError> {
        self.check("set_style", style)?;
        self.style = Some(style.to_string());
        self.ops.push(MapOp::SetStyle(style.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessMap, MapOp};
    use crate::layer::{paint_layer, vector_source};
    use crate::surface::{MapError, MapSurface};
    use catalog::LayerCatalog;

    #[test]
    fn strict_about_duplicates_and_order() {
        let catalog = LayerCatalog::default();
        let lu = catalog.get("lu").unwrap();
        let mut map = HeadlessMap::loaded();

        // A layer needs its source first.
        assert!(matches!(map.add_layer(paint_layer(lu)), Err(MapError::Unknown(_))));

        map.add_source(vector_source(lu, "t")).unwrap();
        assert_eq!(
            map.add_source(vector_source(lu, "t")),
            Err(MapError::AlreadyExists("lu".to_string()))
        );
        map.add_layer(paint_layer(lu)).unwrap();

        // Source removal while a layer still uses it is refused.
        assert!(map.remove_source("lu").is_err());
        map.remove_layer("lu-fill").unwrap();
        map.remove_source("lu").unwrap();

        assert_eq!(
            map.ops(),
            &[
                MapOp::AddSource("lu".into()),
                MapOp::AddLayer("lu-fill".into()),
                MapOp::RemoveLayer("lu-fill".into()),
                MapOp::RemoveSource("lu".into()),
            ]
        );
    }

    #[test]
    fn unloaded_map_refuses_calls() {
        let mut map = HeadlessMap::new();
        assert_eq!(map.set_style("basic"), Err(MapError::NotLoaded));
        map.set_loaded(true);
        map.set_style("basic").unwrap();
        assert_eq!(map.style(), Some("basic"));
    }
}

//! Overlay layer catalog.
//!
//! The catalog is the fixed list of vector overlays the viewer knows about. It
//! is loaded once at startup (from JSON, or the built-in default) and treated
//! as immutable afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Layers switched on at startup and restored whenever a filter is cleared.
pub const DEFAULT_LAYER_UNIVERSE: [&str; 5] = ["field", "lu", "sta", "stl", "stp"];

/// Placeholder in tile templates that is replaced by the configured tile base URL.
pub const TILES_BASE_PLACEHOLDER: &str = "{tiles}";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerGeometry {
    Point,
    Line,
    Polygon,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: u8,
    pub max: u8,
}

impl ZoomRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::new(0, 14)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Informational; the paint kind comes from the layer id.
    pub geometry_type: LayerGeometry,
    #[serde(rename = "tileURLTemplate")]
    pub tile_url_template: String,
    #[serde(default)]
    pub zoom_range: ZoomRange,
}

impl LayerDescriptor {
    /// Tile URL template with the `{tiles}` placeholder resolved.
    ///
    /// The `{z}/{x}/{y}` placeholders are left for the map surface.
    pub fn tile_url(&self, tiles_base_url: &str) -> String {
        self.tile_url_template
            .replace(TILES_BASE_PLACEHOLDER, tiles_base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("layer catalog corrupt: {0}")]
    Corrupt(String),
    #[error("duplicate layer id in catalog: {0}")]
    DuplicateLayer(String),
    #[error("layer catalog has no layers")]
    Empty,
}

/// Ordered, duplicate-free list of known overlay layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerCatalog {
    layers: Vec<LayerDescriptor>,
}

impl LayerCatalog {
    pub fn new(layers: Vec<LayerDescriptor>) -> Result<Self, CatalogError> {
        if layers.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for layer in &layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(CatalogError::DuplicateLayer(layer.id.clone()));
            }
        }
        Ok(Self { layers })
    }

    /// Parses a JSON array of layer descriptors.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let layers = serde_json::from_str::<Vec<LayerDescriptor>>(raw)
            .map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        let catalog = Self::new(layers)?;
        debug!(layers = catalog.len(), "loaded layer catalog");
        Ok(catalog)
    }

    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerCatalog {
    /// The five overlays the viewer ships with.
    fn default() -> Self {
        let layer = |id: &str, title: &str, description: &str, geometry_type| LayerDescriptor {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            geometry_type,
            tile_url_template: format!("{TILES_BASE_PLACEHOLDER}/{id}/{{z}}/{{x}}/{{y}}.pbf"),
            zoom_range: ZoomRange::default(),
        };
        Self {
            layers: vec![
                layer("field", "Fields", "Deposit field outlines", LayerGeometry::Polygon),
                layer("lu", "License areas", "Subsoil license areas", LayerGeometry::Polygon),
                layer("sta", "Study areas", "Report study polygons", LayerGeometry::Polygon),
                layer("stl", "Study lines", "Report profiles and traverses", LayerGeometry::Line),
                layer("stp", "Study points", "Report observation points", LayerGeometry::Point),
            ],
        }
    }
}

use catalog::{LayerDescriptor, ZoomRange};
use serde::Serialize;

use crate::symbology::LayerStyle;

/// How an overlay is painted on the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintKind {
    Fill,
    Line,
    Circle,
}

impl PaintKind {
    /// Paint kind for an overlay id: `stp` layers are circles, `stl` layers
    /// are lines, everything else is filled.
    pub fn for_layer_id(id: &str) -> Self {
        if id.ends_with("stp") {
            PaintKind::Circle
        } else if id.ends_with("stl") {
            PaintKind::Line
        } else {
            PaintKind::Fill
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PaintKind::Fill => "fill",
            PaintKind::Line => "line",
            PaintKind::Circle => "circle",
        }
    }
}

/// Vector tile source registered on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorSource {
    pub id: String,
    pub tiles: Vec<String>,
    pub zoom: ZoomRange,
}

/// Paint layer drawing one source-layer of a vector source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintLayer {
    pub id: String,
    pub source: String,
    pub source_layer: String,
    pub kind: PaintKind,
    pub style: LayerStyle,
}

/// Map object ids owned by one catalog overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayIds {
    pub source: String,
    pub layer: String,
}

impl OverlayIds {
    pub fn for_layer_id(id: &str) -> Self {
        Self {
            source: id.to_string(),
            layer: format!("{id}-{}", PaintKind::for_layer_id(id).as_str()),
        }
    }
}

pub fn vector_source(descriptor: &LayerDescriptor, tiles_base_url: &str) -> VectorSource {
    VectorSource {
        id: OverlayIds::for_layer_id(&descriptor.id).source,
        tiles: vec![descriptor.tile_url(tiles_base_url)],
        zoom: descriptor.zoom_range,
    }
}

pub fn paint_layer(descriptor: &LayerDescriptor) -> PaintLayer {
    let ids = OverlayIds::for_layer_id(&descriptor.id);
    let kind = PaintKind::for_layer_id(&descriptor.id);
    PaintLayer {
        id: ids.layer,
        source: ids.source,
        source_layer: descriptor.id.clone(),
        kind,
        style: LayerStyle::for_layer(&descriptor.id, kind),
    }
}

//! Interface to the external map surface.
//!
//! Only `LayerSynchronizer` is meant to call this; everything else expresses
//! intent through `scene::ViewerState` and lets reconciliation apply it.

use crate::layer::{PaintLayer, VectorSource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map is not loaded yet")]
    NotLoaded,
    #[error("map object already exists: {0}")]
    AlreadyExists(String),
    #[error("unknown map object: {0}")]
    Unknown(String),
    #[error("map rejected {op} for {id}: {message}")]
    Rejected {
        op: &'static str,
        id: String,
        message: String,
    },
}

/// Imperative map API the viewer reconciles against.
///
/// Implementations are not expected to be idempotent: adding an existing
/// source or removing a missing layer may fail. Callers check first.
pub trait MapSurface {
    fn is_loaded(&self) -> bool;

    fn has_source(&self, id: &str) -> bool;
    fn has_layer(&self, id: &str) -> bool;

    fn add_source(&mut self, source: VectorSource) -> Result<(), MapError>;
    fn add_layer(&mut self, layer: PaintLayer) -> Result<(), MapError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), MapError>;
    fn remove_source(&mut self, id: &str) -> Result<(), MapError>;

    /// Restricts a paint layer to the feature with `feature_id`; `None` lifts
    /// the restriction.
    fn set_layer_filter(&mut self, layer_id: &str, feature_id: Option<&str>)
    -> Result<(), MapError>;

    fn set_style(&mut self, style: &str) -> Result<(), MapError>;
}

//! Viewer state: the single source of truth for overlay visibility,
//! selection, highlighting, isolation and license-area picking.

pub mod actions;
pub mod aggregator;
pub mod feature;
pub mod filter;
pub mod highlight;
pub mod kind;
pub mod lu;
pub mod selection;
pub mod state;
pub mod visibility;

pub use actions::*;
pub use aggregator::*;
pub use feature::*;
pub use filter::*;
pub use highlight::*;
pub use kind::*;
pub use lu::*;
pub use selection::*;
pub use state::*;
pub use visibility::*;

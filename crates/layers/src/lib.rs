pub mod headless;
pub mod layer;
pub mod surface;
pub mod symbology;
pub mod sync;

pub use headless::{HeadlessMap, MapOp};
pub use layer::*;
pub use surface::{MapError, MapSurface};
pub use symbology::LayerStyle;
pub use sync::{LayerSynchronizer, SyncReport};

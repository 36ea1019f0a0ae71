pub mod config;
pub mod event;
pub mod event_bus;
pub mod viewer;

pub use config::*;
pub use event::*;
pub use event_bus::*;
pub use viewer::*;

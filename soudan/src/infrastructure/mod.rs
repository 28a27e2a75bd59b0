// Infrastructure - 跨模块的基础设施

mod event_bus;
mod state;

pub use event_bus::*;
pub use state::*;

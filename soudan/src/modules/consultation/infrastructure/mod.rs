// Consultation Infrastructure Layer
//
// 远端服务适配器与音频设备实现

pub mod adapters;
pub mod devices;

pub use adapters::*;
pub use devices::*;

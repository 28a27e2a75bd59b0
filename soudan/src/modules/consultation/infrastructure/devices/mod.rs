// 音频设备实现

mod fake;

pub use fake::*;

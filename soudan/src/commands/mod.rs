// Host Bridge Commands
//
// 宿主 UI 调用的命令入口：参数和返回值都是可序列化的 DTO，错误统一为 `AppError`

pub mod config;
pub mod consultation;

pub use config::*;
pub use consultation::*;

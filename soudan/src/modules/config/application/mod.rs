// Config Application Layer
//
// 应用层提供配置读取、合并更新和重置

pub mod service;

pub use service::*;

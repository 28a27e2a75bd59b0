// Config Infrastructure Layer
//
// 配置仓储的具体实现

mod file_repository;
mod memory_repository;

pub use file_repository::*;
pub use memory_repository::*;

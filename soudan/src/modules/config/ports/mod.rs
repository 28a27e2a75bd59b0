// Config Ports Layer
//
// 端口层定义配置存储的抽象接口

mod config_repository;

pub use config_repository::*;

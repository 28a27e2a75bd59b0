// Consultation Queries - 查询定义和处理器

mod get_session;
mod list_languages;
mod list_messages;

pub use get_session::*;
pub use list_languages::*;
pub use list_messages::*;

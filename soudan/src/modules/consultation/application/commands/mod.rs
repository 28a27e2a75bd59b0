// Consultation Commands - 命令定义和处理器

mod change_language;
mod send_message;
mod update_composer;

pub use change_language::*;
pub use send_message::*;
pub use update_composer::*;

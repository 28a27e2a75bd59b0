// Consultation Domain - Entities
// 实体通过唯一标识符来识别

mod message;
mod session;
mod transcript;

pub use message::*;
pub use session::*;
pub use transcript::*;

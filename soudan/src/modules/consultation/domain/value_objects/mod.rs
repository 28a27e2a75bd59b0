// Consultation Domain - Value Objects
// 值对象是不可变的，通过值而非标识来比较

mod language;
mod message_id;
mod recording_state;
mod session_id;
mod urgency;

pub use language::*;
pub use message_id::*;
pub use recording_state::*;
pub use session_id::*;
pub use urgency::*;

// Consultation Ports Layer
// 端口定义了模块与外部世界的接口

mod actor_port;
mod audio_port;
mod consultation_port;
mod transcription_port;

pub use actor_port::*;
pub use audio_port::*;
pub use consultation_port::*;
pub use transcription_port::*;

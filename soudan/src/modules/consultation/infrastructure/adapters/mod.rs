// 远端咨询与语音识别服务适配器

mod http_consultation;
mod http_transcription;
mod scripted;

#[cfg(test)]
mod log_capture;

pub use http_consultation::*;
pub use http_transcription::*;
pub use scripted::*;

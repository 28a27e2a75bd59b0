use async_trait::async_trait;
use thiserror::Error;

/// 音频设备错误类型
///
/// 都是可恢复错误：录音状态保持 `Idle`，用户可以重试
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("No audio input device found")]
    NoDevice,

    #[error("Audio input is not supported in this environment")]
    Unsupported,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// 音频设备端口 - 宿主环境提供的麦克风能力
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// 请求音频输入流
    async fn acquire_audio_input(&self) -> Result<Box<dyn AudioInput>, DeviceError>;
}

/// 已获取的音频输入流
///
/// 录音期间由录音管线独占，结束后必须调用一次 `release`
#[async_trait]
pub trait AudioInput: Send {
    /// 开始采集
    fn begin_capture(&mut self) -> Result<(), DeviceError>;

    /// 停止采集并交出采集到的全部数据块（按采集顺序）
    async fn end_capture(&mut self) -> Result<Vec<Vec<u8>>, DeviceError>;

    /// 释放设备（停止所有音轨）
    fn release(&mut self);
}

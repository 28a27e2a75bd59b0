// 测试用音频设备

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::modules::consultation::ports::{AudioDevice, AudioInput, DeviceError};

/// 设备使用计数
#[derive(Debug, Default)]
pub struct DeviceStats {
    acquisitions: AtomicUsize,
    captures: AtomicUsize,
    releases: AtomicUsize,
}

impl DeviceStats {
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// 假麦克风：每次采集返回预设的数据块
pub struct FakeAudioDevice {
    chunks: Vec<Vec<u8>>,
    failure: Option<DeviceError>,
    capture_failure: Option<DeviceError>,
    stats: Arc<DeviceStats>,
}

impl FakeAudioDevice {
    pub fn new() -> Self {
        Self::with_chunks(vec![b"RIFF".to_vec(), b"fake-audio".to_vec()])
    }

    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            failure: None,
            capture_failure: None,
            stats: Arc::new(DeviceStats::default()),
        }
    }

    /// 获取设备时失败（例如权限被拒绝）
    pub fn failing(error: DeviceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// 获取成功但开始采集失败
    pub fn failing_capture(error: DeviceError) -> Self {
        Self {
            capture_failure: Some(error),
            ..Self::new()
        }
    }

    pub fn stats(&self) -> Arc<DeviceStats> {
        self.stats.clone()
    }
}

impl Default for FakeAudioDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioDevice for FakeAudioDevice {
    async fn acquire_audio_input(&self) -> Result<Box<dyn AudioInput>, DeviceError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        self.stats.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeAudioInput {
            chunks: self.chunks.clone(),
            capture_failure: self.capture_failure.clone(),
            capturing: false,
            stats: self.stats.clone(),
        }))
    }
}

struct FakeAudioInput {
    chunks: Vec<Vec<u8>>,
    capture_failure: Option<DeviceError>,
    capturing: bool,
    stats: Arc<DeviceStats>,
}

#[async_trait]
impl AudioInput for FakeAudioInput {
    fn begin_capture(&mut self) -> Result<(), DeviceError> {
        if let Some(error) = &self.capture_failure {
            return Err(error.clone());
        }
        self.capturing = true;
        self.stats.captures.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn end_capture(&mut self) -> Result<Vec<Vec<u8>>, DeviceError> {
        if !self.capturing {
            return Err(DeviceError::CaptureFailed("capture not started".to_string()));
        }
        self.capturing = false;
        Ok(std::mem::take(&mut self.chunks))
    }

    fn release(&mut self) {
        self.capturing = false;
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// 没有麦克风能力的宿主环境
#[derive(Debug, Default)]
pub struct UnsupportedAudioDevice;

#[async_trait]
impl AudioDevice for UnsupportedAudioDevice {
    async fn acquire_audio_input(&self) -> Result<Box<dyn AudioInput>, DeviceError> {
        Err(DeviceError::Unsupported)
    }
}

// Voice Capture Pipeline
//
// 录音状态机的驱动部分：获取麦克风、按秒计时、到达上限自动停止、
// 把录音交给语音识别并把结果写入输入框。
//
// 麦克风在一次录音期间由管线独占，每次录音恰好释放一次。

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::SharedSession;
use crate::infrastructure::EventBus;
use crate::modules::config::ConsultationConfig;
use crate::modules::consultation::domain::{ConsultationEvent, NoticeKind, RecordingState};
use crate::modules::consultation::ports::{
    AudioClip, AudioDevice, AudioInput, DeviceError, TranscriptionPort,
};

/// 录音参数
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// 到达该秒数时自动停止
    pub max_recording_secs: u32,
    pub tick: Duration,
    pub mime_type: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::from(&ConsultationConfig::default())
    }
}

impl From<&ConsultationConfig> for CaptureSettings {
    fn from(config: &ConsultationConfig) -> Self {
        Self {
            max_recording_secs: config.max_recording_secs.max(1),
            tick: Duration::from_millis(config.tick_millis.max(1)),
            mime_type: config.audio_mime_type.clone(),
        }
    }
}

/// 录音为什么结束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 用户点击停止
    Manual,
    /// 到达时长上限
    MaxDuration,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::Manual => "manual_stop",
            StopReason::MaxDuration => "max_duration",
        }
    }
}

/// 开始录音的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// 正在录音、识别或发送中
    Busy,
    /// 设备不可用，状态保持 `Idle`
    DeviceUnavailable(DeviceError),
}

/// 一次录音的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// 识别成功，文字已写入输入框
    Transcribed(String),
    /// 识别失败或没有识别出文字，输入框不变
    TranscriptionFailed(String),
    /// 没有进行中的录音
    NotRecording,
    /// 录音被取消，没有提交识别
    Cancelled,
}

/// 录音按钮的结果：空闲时开始，录音中停止
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Start(StartOutcome),
    Stop(CaptureOutcome),
}

/// 进行中的录音
struct ActiveRecording {
    input: Option<Box<dyn AudioInput>>,
    stop_ticker: watch::Sender<bool>,
}

impl ActiveRecording {
    fn take_input(&mut self) -> Option<Box<dyn AudioInput>> {
        let _ = self.stop_ticker.send(true);
        self.input.take()
    }
}

impl Drop for ActiveRecording {
    fn drop(&mut self) {
        if let Some(mut input) = self.take_input() {
            input.release();
        }
    }
}

/// 录音管线
pub struct VoiceCapturePipeline {
    session: SharedSession,
    device: Arc<dyn AudioDevice>,
    transcription: Arc<dyn TranscriptionPort>,
    event_bus: Arc<EventBus>,
    settings: CaptureSettings,
    active: Mutex<Option<ActiveRecording>>,
}

impl VoiceCapturePipeline {
    pub fn new(
        session: SharedSession,
        device: Arc<dyn AudioDevice>,
        transcription: Arc<dyn TranscriptionPort>,
        event_bus: Arc<EventBus>,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            session,
            device,
            transcription,
            event_bus,
            settings,
            active: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// 开始录音
    ///
    /// 获取设备期间再次调用会直接返回 `Busy`
    pub async fn start(self: &Arc<Self>) -> StartOutcome {
        let Ok(mut slot) = self.active.try_lock() else {
            return StartOutcome::Busy;
        };
        if slot.is_some() || !self.session.read().await.can_start_recording() {
            return StartOutcome::Busy;
        }

        let mut input = match self.device.acquire_audio_input().await {
            Ok(input) => input,
            Err(e) => return self.device_unavailable(e).await,
        };
        if let Err(e) = input.begin_capture() {
            input.release();
            return self.device_unavailable(e).await;
        }

        {
            let mut session = self.session.write().await;
            if !session.begin_recording() {
                // 获取设备期间开始了发送
                input.release();
                return StartOutcome::Busy;
            }
            self.event_bus.publish(ConsultationEvent::recording_state_changed(
                session.id(),
                session.recording_state(),
            ));
        }

        let (stop_ticker, stop_rx) = watch::channel(false);
        *slot = Some(ActiveRecording {
            input: Some(input),
            stop_ticker,
        });
        drop(slot);

        info!(
            "[VoiceCapture] Recording started (limit {}s)",
            self.settings.max_recording_secs
        );
        tokio::spawn(Self::run_ticker(
            Arc::downgrade(self),
            stop_rx,
            self.settings.tick,
        ));

        StartOutcome::Started
    }

    /// 用户停止录音并提交识别
    pub async fn stop(&self) -> CaptureOutcome {
        self.finish(StopReason::Manual).await
    }

    /// 录音中则停止，空闲则开始
    pub async fn toggle(self: &Arc<Self>) -> ToggleOutcome {
        let recording = self.session.read().await.recording_state().is_recording();
        if recording {
            ToggleOutcome::Stop(self.stop().await)
        } else {
            ToggleOutcome::Start(self.start().await)
        }
    }

    /// 放弃当前录音，不提交识别
    pub async fn cancel(&self) -> CaptureOutcome {
        let Some(mut active) = self.active.lock().await.take() else {
            return CaptureOutcome::NotRecording;
        };
        if let Some(mut input) = active.take_input() {
            input.release();
        }

        let mut session = self.session.write().await;
        session.abort_recording();
        self.event_bus.publish(ConsultationEvent::recording_state_changed(
            session.id(),
            RecordingState::Idle,
        ));
        info!("[VoiceCapture] Recording cancelled");

        CaptureOutcome::Cancelled
    }

    /// 同步放弃录音：释放设备并停止计时，不提交识别也不发布事件
    ///
    /// 模块被丢弃时使用；录音槽正被占用时返回 `false`
    pub fn abandon(&self) -> bool {
        let Ok(mut slot) = self.active.try_lock() else {
            return false;
        };
        if slot.take().is_some() {
            debug!("[VoiceCapture] Recording abandoned, device released");
        }
        true
    }

    async fn device_unavailable(&self, error: DeviceError) -> StartOutcome {
        warn!("[VoiceCapture] Audio input unavailable: {}", error);
        let session = self.session.read().await;
        self.event_bus.publish(ConsultationEvent::notice(
            session.id(),
            NoticeKind::DeviceUnavailable,
            error.to_string(),
        ));
        StartOutcome::DeviceUnavailable(error)
    }

    /// 按真实经过的时间更新计时，到达上限时自动停止
    ///
    /// 只持有管线的弱引用：管线被丢弃后计时任务随之退出
    async fn run_ticker(
        pipeline: Weak<Self>,
        mut stop_rx: watch::Receiver<bool>,
        tick: Duration,
    ) {
        let started = Instant::now();
        let mut interval = interval_at(started + tick, tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = interval.tick() => {
                    let Some(pipeline) = pipeline.upgrade() else {
                        break;
                    };
                    if !pipeline.on_tick(started.elapsed()).await {
                        break;
                    }
                }
            }
        }
    }

    /// 返回是否继续计时
    async fn on_tick(&self, elapsed: Duration) -> bool {
        let secs = u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX);
        let recorded = {
            let mut session = self.session.write().await;
            let before = session.recording_state().elapsed_secs();
            let recorded = session.record_elapsed(secs);
            if recorded.is_some() && recorded != before {
                self.event_bus.publish(ConsultationEvent::recording_state_changed(
                    session.id(),
                    session.recording_state(),
                ));
            }
            recorded
        };

        let limit = Duration::from_secs(u64::from(self.settings.max_recording_secs));
        match recorded {
            Some(secs) if elapsed >= limit => {
                info!("[VoiceCapture] Reached {}s, stopping automatically", secs);
                self.finish(StopReason::MaxDuration).await;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// 结束录音：释放设备、提交识别、写入输入框
    async fn finish(&self, reason: StopReason) -> CaptureOutcome {
        let Some(mut active) = self.active.lock().await.take() else {
            return CaptureOutcome::NotRecording;
        };
        let Some(mut input) = active.take_input() else {
            return CaptureOutcome::NotRecording;
        };

        let language = {
            let mut session = self.session.write().await;
            session.begin_transcribing();
            self.event_bus.publish(ConsultationEvent::recording_state_changed(
                session.id(),
                RecordingState::Transcribing,
            ));
            session.active_language().clone()
        };

        let captured = input.end_capture().await;
        input.release();
        debug!("[VoiceCapture] Device released ({})", reason.label());

        let result = match captured {
            Ok(chunks) => {
                let clip = AudioClip::from_chunks(chunks, self.settings.mime_type.clone());
                debug!(
                    "[VoiceCapture] Submitting {} bytes for transcription ({})",
                    clip.len(),
                    language
                );
                match self.transcription.transcribe(clip, &language).await {
                    Ok(response) => match response.recognized_text() {
                        Some(text) => Ok(text.to_string()),
                        None => Err(response
                            .error
                            .clone()
                            .unwrap_or_else(|| "no speech recognized".to_string())),
                    },
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(e.to_string()),
        };

        let mut session = self.session.write().await;
        match result {
            Ok(text) => {
                session.finish_transcription(Some(text.clone()));
                self.event_bus.publish(ConsultationEvent::recording_state_changed(
                    session.id(),
                    RecordingState::Idle,
                ));
                self.event_bus
                    .publish(ConsultationEvent::composer_changed(session.id(), text.as_str()));
                info!(
                    "[VoiceCapture] Transcribed {} chars",
                    text.chars().count()
                );
                CaptureOutcome::Transcribed(text)
            }
            Err(reason) => {
                session.finish_transcription(None);
                self.event_bus.publish(ConsultationEvent::recording_state_changed(
                    session.id(),
                    RecordingState::Idle,
                ));
                self.event_bus.publish(ConsultationEvent::notice(
                    session.id(),
                    NoticeKind::TranscriptionFailed,
                    reason.as_str(),
                ));
                warn!("[VoiceCapture] Transcription failed: {}", reason);
                CaptureOutcome::TranscriptionFailed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppEvent;
    use crate::modules::consultation::domain::{ConsultationSession, LanguageCode};
    use crate::modules::consultation::infrastructure::{
        DeviceStats, FakeAudioDevice, ScriptedTranscriptionAdapter, UnsupportedAudioDevice,
    };
    use crate::modules::consultation::ports::{TranscriptionError, TranscriptionResponse};
    use tokio::sync::RwLock;

    struct Fixture {
        session: SharedSession,
        transcription: Arc<ScriptedTranscriptionAdapter>,
        event_bus: Arc<EventBus>,
        pipeline: Arc<VoiceCapturePipeline>,
    }

    fn fixture(device: Arc<dyn AudioDevice>, transcription: ScriptedTranscriptionAdapter) -> Fixture {
        let session = Arc::new(RwLock::new(ConsultationSession::new(
            LanguageCode::from("en"),
            "Hello!",
        )));
        let transcription = Arc::new(transcription);
        let event_bus = Arc::new(EventBus::new());
        let pipeline = Arc::new(VoiceCapturePipeline::new(
            session.clone(),
            device,
            transcription.clone(),
            event_bus.clone(),
            CaptureSettings::default(),
        ));
        Fixture {
            session,
            transcription,
            event_bus,
            pipeline,
        }
    }

    fn fake_device() -> (Arc<FakeAudioDevice>, Arc<DeviceStats>) {
        let device = Arc::new(FakeAudioDevice::with_chunks(vec![vec![1, 2], vec![3, 4]]));
        let stats = device.stats();
        (device, stats)
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_stop_fills_composer() {
        let (device, stats) = fake_device();
        let f = fixture(
            device,
            ScriptedTranscriptionAdapter::new().then_recognize("I lost my wallet"),
        );
        f.session.write().await.set_composer("half typed");

        assert_eq!(f.pipeline.start().await, StartOutcome::Started);
        assert!(!f.session.read().await.composer_enabled());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(
            f.session.read().await.recording_state().elapsed_secs(),
            Some(2)
        );

        let outcome = f.pipeline.stop().await;
        assert_eq!(
            outcome,
            CaptureOutcome::Transcribed("I lost my wallet".to_string())
        );

        let session = f.session.read().await;
        assert_eq!(session.composer(), "I lost my wallet");
        assert!(session.recording_state().is_idle());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(stats.acquisitions(), 1);
        assert_eq!(stats.releases(), 1);

        let calls = f.transcription.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].clip.data, vec![1, 2, 3, 4]);
        assert_eq!(calls[0].clip.mime_type, "audio/webm");
        assert_eq!(calls[0].language.code(), "en");
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_stop_at_limit_releases_once() {
        let (device, stats) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new().then_recognize("auto"));
        let mut rx = f.event_bus.subscribe();

        assert_eq!(f.pipeline.start().await, StartOutcome::Started);
        tokio::time::sleep(Duration::from_secs(31)).await;

        let mut max_elapsed = 0;
        let mut saw_transcribing = false;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Consultation(ConsultationEvent::RecordingStateChanged(e)) = event {
                match e.state {
                    RecordingState::Recording { elapsed_secs } => {
                        max_elapsed = max_elapsed.max(elapsed_secs)
                    }
                    RecordingState::Transcribing => saw_transcribing = true,
                    RecordingState::Idle => {}
                }
            }
        }
        assert_eq!(max_elapsed, 30);
        assert!(saw_transcribing);

        assert_eq!(f.session.read().await.composer(), "auto");
        assert!(f.session.read().await.recording_state().is_idle());
        assert_eq!(stats.releases(), 1);

        // 自动停止后再点停止没有任何效果
        assert_eq!(f.pipeline.stop().await, CaptureOutcome::NotRecording);
        assert_eq!(stats.releases(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_transcription_leaves_composer() {
        let (device, stats) = fake_device();
        let f = fixture(
            device,
            ScriptedTranscriptionAdapter::new()
                .then_respond(TranscriptionResponse::failed("no speech")),
        );
        f.session.write().await.set_composer("draft");
        let mut rx = f.event_bus.subscribe();

        f.pipeline.start().await;
        let outcome = f.pipeline.stop().await;
        assert_eq!(
            outcome,
            CaptureOutcome::TranscriptionFailed("no speech".to_string())
        );

        let session = f.session.read().await;
        assert_eq!(session.composer(), "draft");
        assert_eq!(session.transcript().len(), 1);
        assert!(session.recording_state().is_idle());
        assert_eq!(stats.releases(), 1);

        let mut notices = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Consultation(ConsultationEvent::Notice(n)) = event {
                notices.push(n);
            }
        }
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::TranscriptionFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_or_errored_transcription_is_failure() {
        let (device, _) = fake_device();
        let f = fixture(
            device,
            ScriptedTranscriptionAdapter::new()
                .then_recognize("   ")
                .then_fail(TranscriptionError::NetworkError("offline".to_string())),
        );

        f.pipeline.start().await;
        assert!(matches!(
            f.pipeline.stop().await,
            CaptureOutcome::TranscriptionFailed(_)
        ));

        f.pipeline.start().await;
        assert!(matches!(
            f.pipeline.stop().await,
            CaptureOutcome::TranscriptionFailed(_)
        ));
        assert_eq!(f.session.read().await.composer(), "");
    }

    #[tokio::test]
    async fn test_device_denied_stays_idle() {
        let device = Arc::new(FakeAudioDevice::failing(DeviceError::PermissionDenied));
        let f = fixture(device, ScriptedTranscriptionAdapter::new());
        let mut rx = f.event_bus.subscribe();

        let outcome = f.pipeline.start().await;
        assert_eq!(
            outcome,
            StartOutcome::DeviceUnavailable(DeviceError::PermissionDenied)
        );
        assert!(f.session.read().await.recording_state().is_idle());
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::Consultation(ConsultationEvent::Notice(_))
        ));

        let unsupported = fixture(Arc::new(UnsupportedAudioDevice), ScriptedTranscriptionAdapter::new());
        assert_eq!(
            unsupported.pipeline.start().await,
            StartOutcome::DeviceUnavailable(DeviceError::Unsupported)
        );
    }

    #[tokio::test]
    async fn test_capture_failure_releases_device() {
        let device = Arc::new(FakeAudioDevice::failing_capture(DeviceError::CaptureFailed(
            "busy".to_string(),
        )));
        let stats = device.stats();
        let f = fixture(device, ScriptedTranscriptionAdapter::new());

        assert!(matches!(
            f.pipeline.start().await,
            StartOutcome::DeviceUnavailable(_)
        ));
        assert_eq!(stats.acquisitions(), 1);
        assert_eq!(stats.releases(), 1);
        assert!(f.session.read().await.recording_state().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_recording_is_busy() {
        let (device, stats) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new());

        assert_eq!(f.pipeline.start().await, StartOutcome::Started);
        assert_eq!(f.pipeline.start().await, StartOutcome::Busy);
        assert_eq!(stats.acquisitions(), 1);

        f.pipeline.cancel().await;
        assert_eq!(stats.releases(), 1);
    }

    #[tokio::test]
    async fn test_start_while_sending_is_busy() {
        let (device, stats) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new());
        f.session.write().await.begin_dispatch("hello").unwrap();

        assert_eq!(f.pipeline.start().await, StartOutcome::Busy);
        assert_eq!(stats.acquisitions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_skips_transcription() {
        let (device, stats) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new().then_recognize("x"));

        f.pipeline.start().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(f.pipeline.cancel().await, CaptureOutcome::Cancelled);

        assert!(f.transcription.calls().await.is_empty());
        assert!(f.session.read().await.recording_state().is_idle());
        assert_eq!(stats.releases(), 1);

        // 计时任务已经退出，时间继续流逝不会再触发自动停止
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(stats.releases(), 1);
        assert!(f.transcription.calls().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_starts_then_stops() {
        let (device, _) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new().then_recognize("toggled"));

        assert_eq!(
            f.pipeline.toggle().await,
            ToggleOutcome::Start(StartOutcome::Started)
        );
        assert!(f.session.read().await.recording_state().is_recording());
        assert_eq!(
            f.pipeline.toggle().await,
            ToggleOutcome::Stop(CaptureOutcome::Transcribed("toggled".to_string()))
        );
    }

    #[tokio::test]
    async fn test_toggle_reports_start_failure() {
        let device = Arc::new(FakeAudioDevice::failing(DeviceError::NoDevice));
        let f = fixture(device, ScriptedTranscriptionAdapter::new());
        assert_eq!(
            f.pipeline.toggle().await,
            ToggleOutcome::Start(StartOutcome::DeviceUnavailable(DeviceError::NoDevice))
        );

        let (device, _) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new());
        f.session.write().await.begin_dispatch("hello").unwrap();
        assert_eq!(
            f.pipeline.toggle().await,
            ToggleOutcome::Start(StartOutcome::Busy)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_counts_seconds_with_short_tick() {
        let (device, stats) = fake_device();
        let session = Arc::new(RwLock::new(ConsultationSession::new(
            LanguageCode::from("en"),
            "Hello!",
        )));
        let transcription = Arc::new(ScriptedTranscriptionAdapter::new().then_recognize("quick"));
        let settings = CaptureSettings {
            max_recording_secs: 3,
            tick: Duration::from_millis(250),
            mime_type: "audio/webm".to_string(),
        };
        let pipeline = Arc::new(VoiceCapturePipeline::new(
            session.clone(),
            device,
            transcription.clone(),
            Arc::new(EventBus::new()),
            settings,
        ));

        pipeline.start().await;
        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(session.read().await.recording_state().elapsed_secs(), Some(1));

        // 上限按秒计算，而不是按 tick 次数
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(session.read().await.recording_state().is_recording());
        assert!(transcription.calls().await.is_empty());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(session.read().await.composer(), "quick");
        assert_eq!(stats.releases(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_pipeline_releases_device() {
        let (device, stats) = fake_device();
        let f = fixture(device, ScriptedTranscriptionAdapter::new().then_recognize("late"));
        assert_eq!(f.pipeline.start().await, StartOutcome::Started);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        drop(f.pipeline);
        assert_eq!(stats.releases(), 1);

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(stats.releases(), 1);
        assert!(f.transcription.calls().await.is_empty());
    }
}

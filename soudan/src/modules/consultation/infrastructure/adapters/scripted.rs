// 脚本化适配器
//
// 按预设顺序返回结果，并记录收到的每次调用，用于测试和离线演示

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::modules::consultation::domain::{LanguageCode, Urgency};
use crate::modules::consultation::ports::{
    AudioClip, ConsultationError, ConsultationPort, ConsultationRequest, ConsultationResult,
    TranscriptionError, TranscriptionPort, TranscriptionResponse,
};

/// 脚本化咨询适配器
///
/// 队列耗尽后返回 `fallback`
pub struct ScriptedConsultationAdapter {
    script: Mutex<VecDeque<Result<ConsultationResult, ConsultationError>>>,
    fallback: ConsultationResult,
    delay: Option<Duration>,
    requests: Mutex<Vec<ConsultationRequest>>,
}

impl ScriptedConsultationAdapter {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: ConsultationResult::new("OK", Urgency::None),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 追加一个成功结果
    pub fn then_reply(self, result: ConsultationResult) -> Self {
        self.then(Ok(result))
    }

    /// 追加一个失败结果
    pub fn then_fail(self, error: ConsultationError) -> Self {
        self.then(Err(error))
    }

    fn then(mut self, outcome: Result<ConsultationResult, ConsultationError>) -> Self {
        self.script.get_mut().push_back(outcome);
        self
    }

    pub fn with_fallback(mut self, fallback: ConsultationResult) -> Self {
        self.fallback = fallback;
        self
    }

    /// 每次调用前等待一段时间，模拟慢响应
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn requests(&self) -> Vec<ConsultationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for ScriptedConsultationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsultationPort for ScriptedConsultationAdapter {
    fn service_id(&self) -> &str {
        "scripted"
    }

    async fn consult(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationResult, ConsultationError> {
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.script.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// 一次识别调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionCall {
    pub clip: AudioClip,
    pub language: LanguageCode,
}

/// 脚本化语音识别适配器
pub struct ScriptedTranscriptionAdapter {
    script: Mutex<VecDeque<Result<TranscriptionResponse, TranscriptionError>>>,
    fallback: TranscriptionResponse,
    calls: Mutex<Vec<TranscriptionCall>>,
}

impl ScriptedTranscriptionAdapter {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: TranscriptionResponse::failed("no speech"),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then_recognize(mut self, text: impl Into<String>) -> Self {
        self.script
            .get_mut()
            .push_back(Ok(TranscriptionResponse::recognized(text)));
        self
    }

    pub fn then_respond(mut self, response: TranscriptionResponse) -> Self {
        self.script.get_mut().push_back(Ok(response));
        self
    }

    pub fn then_fail(mut self, error: TranscriptionError) -> Self {
        self.script.get_mut().push_back(Err(error));
        self
    }

    pub async fn calls(&self) -> Vec<TranscriptionCall> {
        self.calls.lock().await.clone()
    }
}

impl Default for ScriptedTranscriptionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionPort for ScriptedTranscriptionAdapter {
    async fn transcribe(
        &self,
        clip: AudioClip,
        language: &LanguageCode,
    ) -> Result<TranscriptionResponse, TranscriptionError> {
        self.calls.lock().await.push(TranscriptionCall {
            clip,
            language: language.clone(),
        });

        match self.script.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.fallback.clone()),
        }
    }
}

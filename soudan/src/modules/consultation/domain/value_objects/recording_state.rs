use serde::{Deserialize, Serialize};

/// 录音状态机
///
/// `Idle → Recording → Transcribing → Idle`，只有 `Recording` 携带计时
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordingState {
    #[default]
    Idle,
    Recording {
        #[serde(rename = "elapsedSeconds")]
        elapsed_secs: u32,
    },
    Transcribing,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }

    /// 录音或识别中
    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    pub fn elapsed_secs(&self) -> Option<u32> {
        match self {
            RecordingState::Recording { elapsed_secs } => Some(*elapsed_secs),
            _ => None,
        }
    }

    /// 录音计时显示，格式 `MM:SS`
    pub fn display_elapsed(&self) -> Option<String> {
        self.elapsed_secs().map(format_mm_ss)
    }
}

fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// 发送状态标签
///
/// 同一会话内最多一个在途请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchState {
    #[default]
    Idle,
    Sending,
}

impl DispatchState {
    pub fn is_sending(&self) -> bool {
        matches!(self, DispatchState::Sending)
    }
}

use futures::stream::{self, Stream};
use tokio::sync::broadcast;

use crate::modules::config::AppConfig;
use crate::modules::consultation::domain::ConsultationEvent;

/// 应用事件
///
/// 渲染层订阅这些事件来重绘并滚动到最新消息
#[derive(Clone, Debug)]
pub enum AppEvent {
    Consultation(ConsultationEvent),
    ConfigChanged(Box<AppConfig>),
}

impl From<ConsultationEvent> for AppEvent {
    fn from(event: ConsultationEvent) -> Self {
        AppEvent::Consultation(event)
    }
}

pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 发布事件；没有订阅者时直接丢弃
    pub fn publish(&self, event: impl Into<AppEvent>) {
        let event = event.into();
        match &event {
            AppEvent::Consultation(inner) => {
                tracing::debug!("[EventBus] Publishing {}", inner.event_type());
            }
            AppEvent::ConfigChanged(_) => {
                tracing::debug!("[EventBus] Publishing config.changed");
            }
        }
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// 以 `Stream` 形式订阅；落后太多时跳过丢失的事件继续读取
    pub fn stream(&self) -> impl Stream<Item = AppEvent> + Send + 'static {
        stream::unfold(self.sender.subscribe(), |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[EventBus] Subscriber lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::consultation::domain::{
        ConsultationSession, LanguageCode, RecordingState,
    };

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let session = ConsultationSession::new(LanguageCode::from("en"), "hi");

        bus.publish(ConsultationEvent::recording_state_changed(
            session.id(),
            RecordingState::Recording { elapsed_secs: 3 },
        ));

        match rx.recv().await.unwrap() {
            AppEvent::Consultation(ConsultationEvent::RecordingStateChanged(e)) => {
                assert_eq!(e.state.elapsed_secs(), Some(3));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stream_skips_lagged_events() {
        use futures::StreamExt;

        let bus = EventBus::with_capacity(2);
        let events = bus.stream();
        futures::pin_mut!(events);

        for max in [10, 20, 30] {
            let mut config = AppConfig::default();
            config.consultation.max_recording_secs = max;
            bus.publish(AppEvent::ConfigChanged(Box::new(config)));
        }

        match events.next().await {
            Some(AppEvent::ConfigChanged(config)) => {
                assert_eq!(config.consultation.max_recording_secs, 20)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(AppEvent::ConfigChanged(Box::default()));
    }
}

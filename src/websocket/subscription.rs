//! Live Update Subscription
//!
//! Owns the background task that reads `/ws/activities` and forwards each
//! parsed event to an [`EventSink`]. The subscription is opened once with
//! [`ActivitySubscription::connect`] and closed with
//! [`ActivitySubscription::disconnect`]; it never reconnects on its own.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::messages::ActivityEvent;
use super::transport::{Connector, SubscriptionError, Transport};

/// Receives parsed activity events
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: ActivityEvent);
}

/// Handle to one live-update connection
pub struct ActivitySubscription {
    url: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ActivitySubscription {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shutdown: None,
            task: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the reader task is still running
    pub fn is_connected(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Open the stream and start forwarding events to `sink`
    pub async fn connect(
        &mut self,
        connector: &dyn Connector,
        sink: Arc<dyn EventSink>,
    ) -> Result<(), SubscriptionError> {
        if self.is_connected() {
            return Err(SubscriptionError::AlreadyConnected);
        }

        let transport = connector.connect(&self.url).await?;
        tracing::info!(url = %self.url, "Live updates connected");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let url = self.url.clone();
        self.shutdown = Some(shutdown_tx);
        self.task = Some(tokio::spawn(read_events(transport, sink, shutdown_rx, url)));

        Ok(())
    }

    /// Close the stream and wait for the reader task to finish
    pub async fn disconnect(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Live update task ended abnormally");
            }
        }
    }
}

impl ActivitySubscription {
    /// Wait until the reader task ends on its own (server close or stream error)
    ///
    /// Returns immediately when not connected. Safe to cancel.
    pub async fn closed(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Live update task ended abnormally");
            }
            self.task = None;
            self.shutdown = None;
        }
    }
}

impl Drop for ActivitySubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn read_events(
    mut transport: Box<dyn Transport>,
    sink: Arc<dyn EventSink>,
    mut shutdown: oneshot::Receiver<()>,
    url: String,
) {
    loop {
        tokio::select! {
            // Fires on an explicit disconnect or when the handle is dropped
            _ = &mut shutdown => {
                transport.close().await;
                tracing::info!(url = %url, "Live updates disconnected");
                return;
            }
            frame = transport.next_text() => match frame {
                Some(Ok(text)) => match ActivityEvent::parse(&text) {
                    Ok(event) => {
                        tracing::debug!(
                            event = ?event.event,
                            id = %event.id(),
                            "Live update received"
                        );
                        sink.deliver(event).await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping malformed live update");
                    }
                },
                Some(Err(e)) => {
                    tracing::warn!(url = %url, error = %e, "Live update stream failed");
                    return;
                }
                None => {
                    tracing::info!(url = %url, "Live update stream closed by server");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::transport::ChannelConnector;
    use crate::websocket::EventKind;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ForwardSink(mpsc::UnboundedSender<ActivityEvent>);

    #[async_trait]
    impl EventSink for ForwardSink {
        async fn deliver(&self, event: ActivityEvent) {
            let _ = self.0.send(event);
        }
    }

    const CREATED: &str = r#"{"event": "created", "activity": {"id": 1, "title": "Gym", "date": "2024-06-10"}}"#;
    const DELETED: &str = r#"{"event": "deleted", "activity": {"id": 1, "title": "Gym", "date": "2024-06-10"}}"#;

    #[tokio::test]
    async fn test_forwards_events_and_drops_malformed() {
        let (connector, feed) = ChannelConnector::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut subscription = ActivitySubscription::new("ws://test/ws/activities");
        subscription
            .connect(&connector, Arc::new(ForwardSink(tx)))
            .await
            .unwrap();
        assert!(subscription.is_connected());

        feed.send(CREATED.to_string()).unwrap();
        feed.send("{broken".to_string()).unwrap();
        feed.send(r#"{"event": "created"}"#.to_string()).unwrap();
        feed.send(DELETED.to_string()).unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.event, EventKind::Created);
        assert_eq!(second.event, EventKind::Deleted);

        subscription.disconnect().await;
        assert!(!subscription.is_connected());
        assert!(connector.was_closed());
    }

    #[tokio::test]
    async fn test_server_close_ends_task() {
        let (connector, feed) = ChannelConnector::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut subscription = ActivitySubscription::new("ws://test/ws/activities");
        subscription
            .connect(&connector, Arc::new(ForwardSink(tx)))
            .await
            .unwrap();

        drop(feed);
        tokio::time::timeout(Duration::from_secs(2), subscription.closed())
            .await
            .unwrap();
        assert!(!subscription.is_connected());
        // Closed by the server, not by us
        assert!(!connector.was_closed());
    }

    #[tokio::test]
    async fn test_closed_waits_for_the_stream() {
        let (connector, feed) = ChannelConnector::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut subscription = ActivitySubscription::new("ws://test/ws/activities");
        subscription.closed().await;

        subscription
            .connect(&connector, Arc::new(ForwardSink(tx)))
            .await
            .unwrap();
        let pending = tokio::time::timeout(Duration::from_millis(50), subscription.closed()).await;
        assert!(pending.is_err());
        assert!(subscription.is_connected());

        drop(feed);
        tokio::time::timeout(Duration::from_secs(2), subscription.closed())
            .await
            .unwrap();
        assert!(!subscription.is_connected());
        subscription.disconnect().await;
    }

    #[tokio::test]
    async fn test_connect_twice_is_rejected() {
        let (connector, _feed) = ChannelConnector::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn EventSink> = Arc::new(ForwardSink(tx));

        let mut subscription = ActivitySubscription::new("ws://test/ws/activities");
        subscription.connect(&connector, Arc::clone(&sink)).await.unwrap();
        assert!(matches!(
            subscription.connect(&connector, sink).await,
            Err(SubscriptionError::AlreadyConnected)
        ));
        subscription.disconnect().await;
    }
}

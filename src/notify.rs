//! Outbound notifications, dispatched fire-and-forget. Delivery failures are logged, never returned.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Welcome { to: String, display_name: String },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::Welcome { to, .. } => to,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notification::Welcome { .. } => "Welcome to Concord".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Records notifications in the log instead of delivering them.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            to = notification.recipient(),
            subject = %notification.subject(),
            "notification queued"
        );
        Ok(())
    }
}

/// Spawn delivery on a detached task.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!(to = notification.recipient(), error = %e, "notification not delivered");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct Recording {
        seen: Mutex<Vec<Notification>>,
        done: Notify,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, n: &Notification) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(n.clone());
            self.done.notify_one();
            if self.fail {
                Err(NotifyError::Delivery("smtp down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn welcome() -> Notification {
        Notification::Welcome {
            to: "a@b.com".into(),
            display_name: "a".into(),
        }
    }

    #[tokio::test]
    async fn dispatch_delivers_on_detached_task() {
        let rec = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            done: Notify::new(),
            fail: false,
        });
        dispatch(rec.clone(), welcome());
        rec.done.notified().await;
        assert_eq!(rec.seen.lock().unwrap().as_slice(), &[welcome()]);
    }

    #[tokio::test]
    async fn dispatch_swallows_failures() {
        let rec = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            done: Notify::new(),
            fail: true,
        });
        dispatch(rec.clone(), welcome());
        rec.done.notified().await;
        assert_eq!(rec.seen.lock().unwrap().len(), 1);
    }
}

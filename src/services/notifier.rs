use crate::domain::interfaces::NotificationSurface;
use crate::domain::models::{Notification, NotificationRequest, Severity};
use log::{debug, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

struct ActiveNotification {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

/// Shows one message at a time. A new message replaces the visible one
/// immediately; each message removes itself after `DISMISS_AFTER`.
#[derive(Clone)]
pub struct TransientNotifier {
    surface: Arc<dyn NotificationSurface>,
    slot: Arc<Mutex<Option<ActiveNotification>>>,
    dismiss_after: Duration,
}

impl TransientNotifier {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Self {
        Self {
            surface,
            slot: Arc::new(Mutex::new(None)),
            dismiss_after: DISMISS_AFTER,
        }
    }

    pub fn with_dismiss_after(mut self, dismiss_after: Duration) -> Self {
        self.dismiss_after = dismiss_after;
        self
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        self.notify(NotificationRequest {
            message: message.into(),
            severity,
        });
    }

    pub fn notify(&self, request: NotificationRequest) {
        let notification = Notification::new(request);
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(previous) = slot.take() {
            if let Some(timer) = previous.timer {
                timer.abort();
            }
            self.surface.remove(previous.notification.id);
        }

        debug!(
            "Showing {} notification {}",
            notification.severity.as_str(),
            notification.id
        );
        self.surface.render(&notification);
        let timer = self.schedule_removal(notification.id);
        *slot = Some(ActiveNotification {
            notification,
            timer,
        });
    }

    pub fn current(&self) -> Option<Notification> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|active| active.notification.clone())
    }

    /// Removes the visible notification ahead of its timer.
    pub fn dismiss(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(active) = slot.take() {
            if let Some(timer) = active.timer {
                timer.abort();
            }
            self.surface.remove(active.notification.id);
        }
    }

    fn schedule_removal(&self, id: Uuid) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; notification {} stays until replaced", id);
                return None;
            }
        };

        let slot = self.slot.clone();
        let surface = self.surface.clone();
        let delay = self.dismiss_after;
        Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            remove_if_current(&slot, surface.as_ref(), id);
        }))
    }
}

// A timer whose notification was already replaced does nothing.
fn remove_if_current(
    slot: &Mutex<Option<ActiveNotification>>,
    surface: &dyn NotificationSurface,
    id: Uuid,
) {
    let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
    if slot.as_ref().map(|active| active.notification.id) == Some(id) {
        slot.take();
        surface.remove(id);
        debug!("Notification {} expired", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        visible: Mutex<Vec<Notification>>,
        most_visible: Mutex<usize>,
        rendered: Mutex<Vec<String>>,
    }

    impl RecordingSurface {
        fn visible_messages(&self) -> Vec<String> {
            self.visible
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.message.clone())
                .collect()
        }
    }

    impl NotificationSurface for RecordingSurface {
        fn render(&self, notification: &Notification) {
            let mut visible = self.visible.lock().unwrap();
            visible.push(notification.clone());
            let mut most = self.most_visible.lock().unwrap();
            *most = (*most).max(visible.len());
            self.rendered.lock().unwrap().push(notification.message.clone());
        }

        fn remove(&self, id: Uuid) {
            self.visible.lock().unwrap().retain(|n| n.id != id);
        }
    }

    fn notifier() -> (Arc<RecordingSurface>, TransientNotifier) {
        let surface = Arc::new(RecordingSurface::default());
        (surface.clone(), TransientNotifier::new(surface))
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_replaces_visible_one() {
        let (surface, notifier) = notifier();

        notifier.show("a", Severity::Info);
        notifier.show("b", Severity::Success);

        assert_eq!(surface.visible_messages(), vec!["b".to_string()]);
        assert_eq!(*surface.most_visible.lock().unwrap(), 1);
        assert_eq!(notifier.current().unwrap().message, "b");
        assert_eq!(notifier.current().unwrap().color, "#28a745");

        tokio::time::sleep(DISMISS_AFTER + Duration::from_millis(1)).await;
        assert!(surface.visible_messages().is_empty());
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_timer_does_not_remove_newer_message() {
        let (surface, notifier) = notifier();

        notifier.show("first", Severity::Warning);
        tokio::time::sleep(Duration::from_millis(2000)).await;
        notifier.show("second", Severity::Error);

        // first's deadline passes here
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(surface.visible_messages(), vec!["second".to_string()]);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(surface.visible_messages().is_empty());
        assert_eq!(
            *surface.rendered.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_early() {
        let (surface, notifier) = notifier();
        notifier.show("bye", Severity::Info);
        notifier.dismiss();
        assert!(surface.visible_messages().is_empty());

        // the aborted timer has nothing left to do
        tokio::time::sleep(DISMISS_AFTER * 2).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay() {
        let surface = Arc::new(RecordingSurface::default());
        let notifier =
            TransientNotifier::new(surface.clone()).with_dismiss_after(Duration::from_millis(500));
        notifier.show("quick", Severity::Info);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(surface.visible_messages().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(surface.visible_messages().is_empty());
    }

    #[test]
    fn test_without_runtime_message_stays_until_replaced() {
        let (surface, notifier) = notifier();
        notifier.show("a", Severity::from("unknown"));
        assert_eq!(notifier.current().unwrap().severity, Severity::Info);

        notifier.show("b", Severity::Info);
        assert_eq!(surface.visible_messages(), vec!["b".to_string()]);
    }
}

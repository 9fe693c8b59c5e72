use crate::domain::errors::{StorageError, TransportFailure};
use crate::domain::models::{HttpRequest, HttpResponse, Notification};
use futures_util::future::BoxFuture;
use uuid::Uuid;

/// Persistent string-keyed store, shaped like browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'static, Result<HttpResponse, TransportFailure>>;
}

/// Something that can put a notification in front of the user and take it away.
pub trait NotificationSurface: Send + Sync {
    fn render(&self, notification: &Notification);
    /// Removing an id that is no longer displayed must be a no-op.
    fn remove(&self, id: Uuid);
}

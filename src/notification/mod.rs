//! Desktop notification integration.
//!
//! Permission is requested once at startup; afterwards notifications are
//! posted only while it is [`NotificationPermission::Granted`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pomodoro_clock::notification::{DesktopNotifier, Notifier, NotificationPermission};
//!
//! let notifier = DesktopNotifier::new(true);
//! if notifier.request_permission() == NotificationPermission::Granted {
//!     let _ = notifier.notify("Pomodoro Clock", "Break started!");
//! }
//! ```

pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use notify_rust::{Notification, Timeout};
use tracing::{debug, warn};

pub use self::error::NotificationError;

/// Application name reported to the notification server.
pub const APP_NAME: &str = "Pomodoro Clock";

/// How long a notification stays on screen.
const NOTIFICATION_TIMEOUT_MS: u32 = 5_000;

/// Outcome of the one-time permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not requested yet.
    #[default]
    Default,
    /// Notifications may be shown.
    Granted,
    /// Notifications must not be shown.
    Denied,
}

impl NotificationPermission {
    /// Returns true if notifications may be shown.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Trait for notification backends.
pub trait Notifier {
    /// Asks the platform for permission to show notifications.
    fn request_permission(&self) -> NotificationPermission;

    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification server rejects the request.
    fn notify(&self, summary: &str, body: &str) -> Result<(), NotificationError>;
}

/// Notifier backed by the desktop notification server (notify-rust).
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    /// Creates a notifier; a disabled notifier always reports `Denied`.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> NotificationPermission {
        if self.enabled {
            NotificationPermission::Granted
        } else {
            debug!("Notifications disabled by configuration");
            NotificationPermission::Denied
        }
    }

    fn notify(&self, summary: &str, body: &str) -> Result<(), NotificationError> {
        if !self.enabled {
            return Err(NotificationError::PermissionDenied);
        }

        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(summary)
            .body(body)
            .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS));

        let body = body.to_string();
        dispatch(move || {
            notification
                .show()
                .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
            debug!("Notification sent: {}", body);
            Ok(())
        })
    }
}

/// Runs a blocking send off the async runtime.
///
/// Inside a tokio runtime the send goes to the blocking pool and its failure
/// is only logged; the tick loop never waits on the notification server.
/// Without a runtime the send runs inline and its error is returned.
fn dispatch<F>(send: F) -> Result<(), NotificationError>
where
    F: FnOnce() -> Result<(), NotificationError> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(move || {
                if let Err(e) = send() {
                    warn!("Failed to send notification: {} ({})", e, e.suggestion());
                }
            });
            Ok(())
        }
        Err(_) => send(),
    }
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    permission: Mutex<NotificationPermission>,
    sent: Mutex<Vec<(String, String)>>,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new(NotificationPermission::Granted)
    }
}

impl MockNotifier {
    /// Creates a mock that answers permission requests with `permission`.
    #[must_use]
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission: Mutex::new(permission),
            sent: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for MockNotifier {
    fn request_permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn notify(&self, summary: &str, body: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((summary.to_string(), body.to_string()));
        Ok(())
    }
}

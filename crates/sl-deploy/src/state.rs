//! Observable "script creation in progress" flag

use std::sync::Arc;
use tokio::sync::watch;

/// Shared in-progress flag for script creation.
///
/// Cloning yields a handle to the same flag. Callers are expected to avoid
/// starting a second run while [`is_in_progress`](Self::is_in_progress) is
/// true; the flag itself does not block anything.
#[derive(Debug, Clone)]
pub struct CreationState {
    sender: Arc<watch::Sender<bool>>,
}

impl CreationState {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        *self.sender.borrow()
    }

    /// Receiver notified whenever the flag changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Raise the flag until the returned guard is dropped
    pub(crate) fn begin(&self) -> InProgressGuard {
        self.sender.send_replace(true);
        InProgressGuard {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl Default for CreationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowers the in-progress flag on drop
#[derive(Debug)]
pub(crate) struct InProgressGuard {
    sender: Arc<watch::Sender<bool>>,
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.sender.send_replace(false);
    }
}

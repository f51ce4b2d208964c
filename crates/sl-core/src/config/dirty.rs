//! Tracks whether a live configuration differs from the last saved one.

use super::{ConfigurationField, ConfigurationModel, ConfigurationObserver, ConfigurationSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Observer that flags a configuration as dirty once it diverges from the
/// last saved settings.
///
/// Until [`mark_saved`](Self::mark_saved) is called there is no baseline and
/// every configuration counts as dirty.
#[derive(Debug)]
pub struct DirtyTracker {
    saved: Mutex<Option<ConfigurationSettings>>,
    dirty: AtomicBool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(None),
            dirty: AtomicBool::new(true),
        }
    }

    /// Record `model` as the saved baseline
    pub fn mark_saved(&self, model: &ConfigurationModel) {
        let mut saved = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        *saved = Some(model.settings().clone());
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Compare `model` against the baseline
    pub fn refresh(&self, model: &ConfigurationModel) {
        let saved = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        let dirty = saved.as_ref() != Some(model.settings());
        self.dirty.store(dirty, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationObserver for DirtyTracker {
    fn configuration_changed(&self, model: &ConfigurationModel, field: ConfigurationField) {
        self.refresh(model);
        log::debug!(
            "Configuration field {} changed (dirty: {})",
            field,
            self.is_dirty()
        );
    }
}

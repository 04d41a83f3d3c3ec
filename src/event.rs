//! Lifecycle events and the event bus
//!
//! All five lifecycle event kinds travel through one channel as a tagged
//! union. Listeners receive every event and can filter on [`UploadEvent::kind`];
//! emission is synchronous, in-process, and best-effort: there is no
//! buffering and no replay for late subscribers.

use crate::file::FileHandle;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Upload progress as reported by the built-in transport
#[derive(Debug, Clone, Serialize)]
pub struct UploadProgress {
    /// Bytes of the file body sent so far
    pub loaded: u64,
    /// Total file size in bytes
    pub total: u64,
    /// Fraction completed, 0.0 to 1.0
    pub percent: f64,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        let percent = if total > 0 {
            (loaded as f64 / total as f64).min(1.0)
        } else {
            0.0
        };

        Self {
            loaded,
            total,
            percent,
        }
    }
}

/// Snapshot of a file that passed selection, carried by [`UploadEvent::Selected`]
#[derive(Debug, Clone, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub key: String,
}

impl From<&FileHandle> for SelectedFile {
    fn from(file: &FileHandle) -> Self {
        Self {
            name: file.name().to_string(),
            size: file.size(),
            key: file.key(),
        }
    }
}

/// Discriminant for [`UploadEvent`], for listeners that filter by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Select,
    Progress,
    Error,
    Success,
    Retry,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Select => write!(f, "select"),
            EventKind::Progress => write!(f, "progress"),
            EventKind::Error => write!(f, "error"),
            EventKind::Success => write!(f, "success"),
            EventKind::Retry => write!(f, "retry"),
        }
    }
}

/// A lifecycle event emitted by the uploader
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A selection completed; carries every file that passed validation,
    /// possibly none
    Selected { files: Vec<SelectedFile> },

    /// Progress on the built-in transport path
    Progress(UploadProgress),

    /// A failure: an oversized selection batch, or a failed upload attempt
    Error { message: String },

    /// An upload finished; carries the parsed response body
    Success { response: serde_json::Value },

    /// A failed attempt will be retried after backoff
    Retry { attempt: u32, error: String },
}

impl UploadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UploadEvent::Selected { .. } => EventKind::Select,
            UploadEvent::Progress(_) => EventKind::Progress,
            UploadEvent::Error { .. } => EventKind::Error,
            UploadEvent::Success { .. } => EventKind::Success,
            UploadEvent::Retry { .. } => EventKind::Retry,
        }
    }
}

/// Listener callback type
pub type EventListener = Arc<dyn Fn(&UploadEvent) + Send + Sync>;

/// Synchronous fan-out of [`UploadEvent`]s to registered listeners
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<EventListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every subsequent event
    pub fn on<F>(&self, listener: F)
    where
        F: Fn(&UploadEvent) + Send + Sync + 'static,
    {
        self.listeners.write().unwrap().push(Arc::new(listener));
    }

    /// Deliver an event to every registered listener, in registration order
    pub fn emit(&self, event: &UploadEvent) {
        let listeners = self.listeners.read().unwrap().clone();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

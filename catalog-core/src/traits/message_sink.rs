//! `MessageSink` — the messaging transport collaborator (spec §1, §6).

use std::sync::Arc;

use crate::errors::CatalogError;
use crate::events::Event;

/// Emits a catalog event. The concrete implementation (a message bus
/// producer, a test spy, ...) is supplied by the caller; this crate only
/// calls `emit` from inside the same transaction that produced the event,
/// per spec §5 ("all side-effects ... commit atomically with the data
/// change").
pub trait MessageSink: Send + Sync {
    fn emit(&self, event: Event) -> Result<(), CatalogError>;
}

impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    fn emit(&self, event: Event) -> Result<(), CatalogError> {
        (**self).emit(event)
    }
}

/// A sink that records every event in memory, for tests.
#[derive(Default)]
pub struct RecordingMessageSink {
    events: std::sync::Mutex<Vec<Event>>,
}

impl RecordingMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("poisoned").clone()
    }
}

impl MessageSink for RecordingMessageSink {
    fn emit(&self, event: Event) -> Result<(), CatalogError> {
        self.events.lock().expect("poisoned").push(event);
        Ok(())
    }
}

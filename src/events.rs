//! Domain events and their fan-out to connected viewers.

use std::num::NonZeroUsize;

use tokio::sync::broadcast;

use crate::db::{FeedMessage, Room};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A public room was created. Private rooms never announce themselves.
    RoomCreated(Room),
    MessageCreated(FeedMessage),
}

/// The outcome of a write: the stored record and the events it should cause.
#[derive(Debug)]
pub struct Created<T> {
    pub record: T,
    pub events: Vec<Event>,
}

impl<T> Created<T> {
    pub fn quiet(record: T) -> Self {
        Self { record, events: Vec::new() }
    }

    pub fn announced(record: T, event: Event) -> Self {
        Self { record, events: vec![event] }
    }
}

#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<Event>,
}

impl Notifier {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { tx: broadcast::channel(capacity.get()).0 }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Fire and forget: nobody listening is not an error.
    pub fn publish(&self, events: Vec<Event>) {
        for event in events {
            let viewers = self.tx.send(event).unwrap_or(0);
            tracing::debug!(viewers, "published event");
        }
    }
}

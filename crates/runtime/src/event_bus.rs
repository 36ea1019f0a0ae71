use serde::Serialize;

/// One entry of the viewer's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Index of the dispatched `ViewerEvent` that produced this entry.
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only log of what the viewer did, in dispatch order.
#[derive(Debug, Default)]
pub struct EventBus {
    seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the entries of the next dispatched event.
    pub fn advance(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            seq: self.seq,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

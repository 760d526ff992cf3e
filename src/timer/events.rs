use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::Cycle;

use super::{CountdownDisplay, TimerSnapshot};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    Tick(CountdownDisplay),
    CycleFinished(Cycle),
    CycleInterrupted(Cycle),
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::StateChanged(_) => "timer-state-changed",
            TimerEvent::Tick(_) => "timer-tick",
            TimerEvent::CycleFinished(_) => "cycle-finished",
            TimerEvent::CycleInterrupted(_) => "cycle-interrupted",
        }
    }
}

/// Receives timer events on behalf of the hosting surface (renderer, title).
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TimerEvent);
}

/// Forwards events over an unbounded channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: TimerEvent) {
        let _ = self.tx.send(event);
    }
}

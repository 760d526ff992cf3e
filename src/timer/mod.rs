pub mod clock;
pub mod commands;
pub mod controller;
pub mod events;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{advance, TickOutcome, TimerController, DEFAULT_TICK_INTERVAL};
pub use events::{ChannelSink, EventSink, TimerEvent};
pub use state::{CountdownDisplay, TimerSnapshot, TimerStatus};

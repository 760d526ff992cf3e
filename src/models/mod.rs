pub mod cycle;

pub use cycle::{Cycle, CycleId, CycleStatus, MAX_MINUTES_AMOUNT, MIN_MINUTES_AMOUNT};

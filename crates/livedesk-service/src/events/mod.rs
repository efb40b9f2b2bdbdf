//! Event bus for presence change events

mod bus;

pub use bus::{EventBus, EventReceiver};

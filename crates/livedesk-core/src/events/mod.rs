//! Domain events - presence state changes

mod presence_changed;

pub use presence_changed::{PresenceChanged, PRESENCE_UPDATE};

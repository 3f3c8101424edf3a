//! Session entry events, emitted events and the bus that carries the latter

mod bus;
mod input;
mod output;

pub use bus::{EventBus, SubscriptionId};
pub use input::InputEvent;
pub use output::{EngineEvent, EventKind};

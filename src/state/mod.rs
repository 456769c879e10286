//! Observable, immutable-snapshot application state.

mod snapshot;
mod store;

pub use snapshot::{AppState, StateKey, StatePatch};
pub use store::{StateStore, SubscriptionId};

//! Observable application state store.
//!
//! Single-threaded: interior mutability via `RefCell`, shared by `Rc`.
//! Every `set_state` replaces the snapshot and runs exactly one
//! notification cycle; there is no batching and no transactions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::snapshot::{AppState, StateKey, StatePatch};

/// Identifies a registered listener for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&AppState, &AppState)>;

struct Subscriber {
    id: u64,
    /// `None` subscribes to every change; `Some` filters to watched keys.
    keys: Option<Vec<StateKey>>,
    listener: Listener,
}

struct Inner {
    state: AppState,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// The observable snapshot store.
pub struct StateStore {
    inner: RefCell<Inner>,
}

impl StateStore {
    #[must_use]
    pub fn new(initial: AppState) -> Self {
        Self {
            inner: RefCell::new(Inner {
                state: initial,
                subscribers: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Current snapshot, as an owned clone.
    ///
    /// Mutating the returned value has no effect on the store; the live
    /// state is only replaced through [`Self::set_state`].
    #[must_use]
    pub fn get_state(&self) -> AppState {
        self.inner.borrow().state.clone()
    }

    /// Shallow-merge a patch and synchronously notify subscribers with
    /// `(new, prev)`. `source` labels the change origin in logs.
    pub fn set_state(&self, patch: StatePatch, source: &str) {
        let (prev, next, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let prev = inner.state.clone();
            let next = patch.merge_into(prev.clone());
            inner.state = next.clone();
            // Clone the listener handles out of the borrow so a listener
            // may call back into the store without re-entrancy panics.
            let listeners: Vec<(Option<Vec<StateKey>>, Listener)> = inner
                .subscribers
                .iter()
                .map(|s| (s.keys.clone(), Rc::clone(&s.listener)))
                .collect();
            (prev, next, listeners)
        };

        let changed = AppState::changed_keys(&prev, &next);
        tracing::debug!(source, ?changed, "state updated");

        for (keys, listener) in listeners {
            let interested = match &keys {
                None => true,
                Some(watched) => watched.iter().any(|key| changed.contains(key)),
            };
            if interested {
                listener(&next, &prev);
            }
        }
    }

    /// Subscribe to every state change.
    pub fn subscribe(&self, listener: impl Fn(&AppState, &AppState) + 'static) -> SubscriptionId {
        self.register(None, Rc::new(listener))
    }

    /// Subscribe to changes of the given keys only. The listener fires when
    /// any watched key's value actually changed (field equality), not on
    /// every `set_state` call.
    pub fn subscribe_to_keys(
        &self,
        keys: &[StateKey],
        listener: impl Fn(&AppState, &AppState) + 'static,
    ) -> SubscriptionId {
        self.register(Some(keys.to_vec()), Rc::new(listener))
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|s| s.id != id.0);
    }

    fn register(&self, keys: Option<Vec<StateKey>>, listener: Listener) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber { id, keys, listener });
        SubscriptionId(id)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::core::{NetworkStatus, Quadrant, Task};

    #[test]
    fn test_snapshot_mutation_does_not_affect_store() {
        let store = StateStore::default();
        let mut snapshot = store.get_state();
        snapshot
            .tasks
            .get_mut(&Quadrant::UrgentImportant)
            .unwrap()
            .push(Task::new("rogue", Quadrant::UrgentImportant, 0));

        assert_eq!(store.get_state().task_count(), 0);
    }

    #[test]
    fn test_subscribe_receives_new_and_prev() {
        let store = Rc::new(StateStore::default());
        let seen = Rc::new(Cell::new(false));
        let seen_clone = Rc::clone(&seen);
        store.subscribe(move |new, prev| {
            assert_eq!(new.network_status, NetworkStatus::Online);
            assert_eq!(prev.network_status, NetworkStatus::Offline);
            seen_clone.set(true);
        });

        store.set_state(StatePatch::network(NetworkStatus::Online), "test");
        assert!(seen.get());
    }

    #[test]
    fn test_key_filtered_subscription_skips_unrelated_changes() {
        let store = StateStore::default();
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = Rc::clone(&fired);
        store.subscribe_to_keys(&[StateKey::Tasks], move |_, _| {
            fired_clone.set(fired_clone.get() + 1);
        });

        // Two updates to unrelated keys: zero notifications.
        store.set_state(StatePatch::network(NetworkStatus::Online), "test");
        store.set_state(StatePatch::drag_cleared(), "test");
        assert_eq!(fired.get(), 0);

        // A tasks change fires exactly once.
        let mut tasks = store.get_state().tasks;
        tasks
            .get_mut(&Quadrant::ImportantOnly)
            .unwrap()
            .push(Task::new("T", Quadrant::ImportantOnly, 0));
        store.set_state(StatePatch::tasks(tasks), "test");
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_identical_value_does_not_fire_key_subscription() {
        let store = StateStore::default();
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = Rc::clone(&fired);
        store.subscribe_to_keys(&[StateKey::NetworkStatus], move |_, _| {
            fired_clone.set(fired_clone.get() + 1);
        });

        store.set_state(StatePatch::network(NetworkStatus::Offline), "test");
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let store = StateStore::default();
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = Rc::clone(&fired);
        let id = store.subscribe(move |_, _| {
            fired_clone.set(fired_clone.get() + 1);
        });

        store.set_state(StatePatch::network(NetworkStatus::Online), "test");
        store.unsubscribe(id);
        store.set_state(StatePatch::network(NetworkStatus::Offline), "test");
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_listener_may_reenter_store() {
        let store = Rc::new(StateStore::default());
        let store_clone = Rc::clone(&store);
        store.subscribe_to_keys(&[StateKey::NetworkStatus], move |new, _| {
            if new.network_status.is_online() {
                // Reading back from inside a notification must not panic.
                let _ = store_clone.get_state();
            }
        });
        store.set_state(StatePatch::network(NetworkStatus::Online), "test");
    }
}

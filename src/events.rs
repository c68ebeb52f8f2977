//! Stats and lifecycle broadcast
//!
//! Two closed topics, `stats` and `state`, each with an ordered list of
//! subscribers. Delivery is synchronous: every listener has run by the time
//! `emit_*` returns. The bus is shared (`Rc<EventBus>`) between the core,
//! which publishes, and the presentation shell, which owns the subscriptions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Lifecycle state published on the `state` topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Before the first run; controls inert
    Idle,
    /// Active play
    Running,
    /// Run ended, stats frozen, restart available
    Over,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Over => "over",
        }
    }
}

/// Snapshot published on the `stats` topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub score: u32,
    pub best: u32,
    pub combo: u32,
    pub gates: u32,
    pub streak: u32,
    pub near_misses: u32,
}

/// Handle returned by `subscribe_*`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Topic<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T> Topic<T> {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

/// Typed observer registry with the two fixed topics
pub struct EventBus {
    stats: RefCell<Topic<GameStats>>,
    state: RefCell<Topic<GamePhase>>,
    next_id: Cell<u64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            stats: RefCell::new(Topic::new()),
            state: RefCell::new(Topic::new()),
            next_id: Cell::new(1),
        }
    }

    fn allocate_id(&self) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        SubscriptionId(id)
    }

    pub fn subscribe_stats(&self, listener: impl FnMut(&GameStats) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        let listener: Listener<GameStats> = Rc::new(RefCell::new(listener));
        self.stats.borrow_mut().listeners.push((id, listener));
        id
    }

    pub fn subscribe_state(&self, listener: impl FnMut(&GamePhase) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        let listener: Listener<GamePhase> = Rc::new(RefCell::new(listener));
        self.state.borrow_mut().listeners.push((id, listener));
        id
    }

    /// Remove a subscription from whichever topic holds it.
    /// Returns false if the id was unknown (already removed).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.stats.borrow_mut().remove(id) || self.state.borrow_mut().remove(id)
    }

    pub fn emit_stats(&self, stats: &GameStats) {
        let listeners = Self::snapshot(&self.stats);
        Self::deliver(&listeners, stats, "stats");
    }

    pub fn emit_state(&self, phase: GamePhase) {
        let listeners = Self::snapshot(&self.state);
        Self::deliver(&listeners, &phase, "state");
    }

    pub fn listener_count(&self) -> usize {
        self.stats.borrow().listeners.len() + self.state.borrow().listeners.len()
    }

    // Listeners may (un)subscribe while being called, so deliver from a copy.
    fn snapshot<T>(topic: &RefCell<Topic<T>>) -> Vec<Listener<T>> {
        topic
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect()
    }

    fn deliver<T>(listeners: &[Listener<T>], value: &T, topic: &str) {
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(value),
                Err(_) => log::warn!("Skipping re-entrant '{}' listener", topic),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            bus.subscribe_state(move |_| seen.borrow_mut().push(tag));
        }
        bus.emit_state(GamePhase::Running);

        assert_eq!(*seen.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_topics_are_independent() {
        let bus = EventBus::new();
        let stats_hits = Rc::new(Cell::new(0));
        let state_hits = Rc::new(Cell::new(0));
        {
            let stats_hits = stats_hits.clone();
            bus.subscribe_stats(move |_| stats_hits.set(stats_hits.get() + 1));
        }
        {
            let state_hits = state_hits.clone();
            bus.subscribe_state(move |_| state_hits.set(state_hits.get() + 1));
        }

        bus.emit_stats(&GameStats::default());
        bus.emit_stats(&GameStats::default());
        bus.emit_state(GamePhase::Over);

        assert_eq!(stats_hits.get(), 2);
        assert_eq!(state_hits.get(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let id = {
            let hits = hits.clone();
            bus.subscribe_stats(move |_| hits.set(hits.get() + 1))
        };

        bus.emit_stats(&GameStats::default());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit_stats(&GameStats::default());

        assert_eq!(hits.get(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself_during_emit() {
        let bus = Rc::new(EventBus::new());
        let own_id = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));
        let id = {
            let bus = bus.clone();
            let own_id = own_id.clone();
            let hits = hits.clone();
            bus.clone().subscribe_state(move |_| {
                hits.set(hits.get() + 1);
                if let Some(id) = own_id.get() {
                    bus.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(id));

        bus.emit_state(GamePhase::Running);
        bus.emit_state(GamePhase::Over);

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stats_serialize_as_camel_case() {
        let stats = GameStats {
            near_misses: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"nearMisses\":3"));
        assert_eq!(serde_json::to_string(&GamePhase::Over).unwrap(), "\"over\"");
    }
}

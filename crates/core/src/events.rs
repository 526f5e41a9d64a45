//! Domain events and the listener registry types.
//!
//! Events are transient notifications: they are dispatched synchronously to
//! registered listeners and never persisted.

use crate::types::{KeyColor, Vector2D};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { from: Vector2D, to: Vector2D },
    PlayerDied { position: Vector2D },
    ChipCollected { position: Vector2D, chips_left: u32 },
    KeyCollected { position: Vector2D, color: KeyColor },
    DoorUnlocked { position: Vector2D, color: KeyColor },
    ExitLockUnlocked { position: Vector2D },
    CountDown { seconds_left: i64 },
    Tick { tick_no: u64 },
    Timeout,
    GameOver,
}

/// Handle returned by listener registration, used for removal. Ids are
/// transient: the registry is not persisted, and a loaded game restarts
/// numbering from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

pub trait GameEventListener {
    /// Called once per fired event, in registration order, on the thread
    /// driving the game. Registry changes must go through `ops`; they take
    /// effect only after the in-progress update has fired all its events.
    fn on_game_event(&mut self, event: &GameEvent, ops: &mut ListenerOps);
}

/// Staging buffer for listener registry changes.
///
/// Changes requested while events are being dispatched are merged into the
/// live registry only between dispatch cycles, so the set of listeners
/// notified during one `update` call is fixed when that call starts firing.
#[derive(Default)]
pub struct ListenerOps {
    next_id: u64,
    add: Vec<(ListenerId, Box<dyn GameEventListener>)>,
    remove: Vec<ListenerId>,
}

impl ListenerOps {
    pub fn add_listener(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.add.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) {
        self.remove.push(id);
    }

    pub(crate) fn apply_to(
        &mut self,
        listeners: &mut Vec<(ListenerId, Box<dyn GameEventListener>)>,
    ) {
        for id in self.remove.drain(..) {
            listeners.retain(|(listener_id, _)| *listener_id != id);
        }
        listeners.append(&mut self.add);
    }
}

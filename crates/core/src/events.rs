use crate::{DestroyCause, Location, MovementClass, Pos, SymbolId, SymbolInstance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub u64);

/// Where a texture hint applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Spot {
    Cell(Pos),
    Slot(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SymbolCreated {
        id: SymbolId,
        key: String,
        value: i64,
        at: Location,
    },
    SymbolMoved {
        id: SymbolId,
        from: Location,
        to: Location,
        animation: AnimationHandle,
    },
    SymbolValueChanged {
        id: SymbolId,
        value: i64,
    },
    SymbolDestroyed {
        id: SymbolId,
        key: String,
        cause: DestroyCause,
        animation: AnimationHandle,
    },
    CellTextureHint {
        spot: Spot,
        movement: Option<MovementClass>,
    },
    ShieldTriggered {
        protector: SymbolId,
        protected: SymbolId,
    },
    ValueReset {
        id: SymbolId,
    },
    GameStarted {
        day: u32,
        goal: i64,
        coins: u32,
    },
    TurnCharged {
        turn_value: i64,
        score: i64,
        coins_remaining: u32,
    },
    TurnSettled {
        score: i64,
        coins_remaining: u32,
    },
    DayCleared {
        day: u32,
        score: i64,
        goal: i64,
    },
    DayStarted {
        day: u32,
        goal: i64,
        coins: u32,
    },
    GameOver {
        day: u32,
        score: i64,
        goal: i64,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Counting barrier over dispatched animations. Each handle is released at
/// most once; unknown handles are ignored.
#[derive(Debug, Default)]
pub struct AnimationBarrier {
    next: u64,
    pending: BTreeSet<AnimationHandle>,
}

impl AnimationBarrier {
    pub fn dispatch(&mut self) -> AnimationHandle {
        self.next = self.next.wrapping_add(1);
        let handle = AnimationHandle(self.next);
        self.pending.insert(handle);
        handle
    }

    pub fn complete(&mut self, handle: AnimationHandle) -> bool {
        self.pending.remove(&handle)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_clear(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn outstanding(&self) -> Vec<AnimationHandle> {
        self.pending.iter().copied().collect()
    }
}

/// Pairs the event queue with the animation barrier so every event that
/// asks the presentation to animate also takes a handle.
pub struct Dispatch<'a> {
    pub events: &'a mut EventBus,
    pub barrier: &'a mut AnimationBarrier,
}

impl<'a> Dispatch<'a> {
    pub fn new(events: &'a mut EventBus, barrier: &'a mut AnimationBarrier) -> Self {
        Self { events, barrier }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn created(&mut self, symbol: &SymbolInstance) {
        self.events.push(Event::SymbolCreated {
            id: symbol.id,
            key: symbol.key.clone(),
            value: symbol.value,
            at: symbol.location,
        });
    }

    pub fn moved(&mut self, id: SymbolId, from: Location, to: Location) -> AnimationHandle {
        let animation = self.barrier.dispatch();
        self.events.push(Event::SymbolMoved {
            id,
            from,
            to,
            animation,
        });
        animation
    }

    pub fn value_changed(&mut self, symbol: &SymbolInstance) {
        self.events.push(Event::SymbolValueChanged {
            id: symbol.id,
            value: symbol.value,
        });
    }

    pub fn destroyed(&mut self, symbol: &SymbolInstance, cause: DestroyCause) -> AnimationHandle {
        let animation = self.barrier.dispatch();
        self.events.push(Event::SymbolDestroyed {
            id: symbol.id,
            key: symbol.key.clone(),
            cause,
            animation,
        });
        animation
    }

    pub fn texture(&mut self, spot: Spot, movement: Option<MovementClass>) {
        self.events.push(Event::CellTextureHint { spot, movement });
    }
}

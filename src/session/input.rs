use std::collections::VecDeque;

/// Intake queue capacity.
pub const INPUT_QUEUE_CAPACITY: usize = 256;

/// A host input event, accepted but not routed by the core.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum InputEvent {
    /// Pointer action at surface coordinates.
    Pointer {
        /// Host action code (down/move/up...).
        action: i32,
        /// X in surface pixels.
        x: f32,
        /// Y in surface pixels.
        y: f32,
        /// Pressed-button bitmask.
        buttons: i32,
    },
    /// Key transition.
    Key {
        /// Host key code.
        keycode: i32,
        /// `true` on press, `false` on release.
        down: bool,
        /// Modifier bitmask.
        mods: i32,
    },
}

/// Bounded FIFO of input events. When full, the oldest event is dropped.
#[derive(Debug, Clone)]
pub struct InputQueue {
    items: VecDeque<InputEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(INPUT_QUEUE_CAPACITY)
    }
}

impl InputQueue {
    /// Queue holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueue, evicting the oldest event when full. Returns `true` if an event was evicted.
    pub fn push(&mut self, event: InputEvent) -> bool {
        let evicted = self.items.len() == self.capacity;
        if evicted {
            let _ = self.items.pop_front();
            self.dropped += 1;
        }
        self.items.push_back(event);
        evicted
    }

    /// Dequeue the oldest event.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.items.pop_front()
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.items.drain(..)
    }

    /// Queued event count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Events evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/input.rs"]
mod tests;

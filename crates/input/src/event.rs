use std::collections::VecDeque;

/// Movement keys the controller understands (W, S, A, D on a QWERTY layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// A discrete input event produced by the host.
///
/// Hosts translate their native events into these and push them onto an
/// [`InputQueue`]; the simulation never sees raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A movement key changed state.
    Key { key: MovementKey, pressed: bool },
    /// Relative pointer motion in pixels.
    PointerMotion { dx: f32, dy: f32 },
    /// Primary button press (shoot while captured, request capture otherwise).
    PrimaryAction,
    /// The host gained or lost pointer capture.
    CaptureChanged(bool),
}

/// FIFO of pending input events, drained once per frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PrimaryAction);
        q.push(InputEvent::Key {
            key: MovementKey::Forward,
            pressed: true,
        });
        q.push(InputEvent::PointerMotion { dx: 1.0, dy: 2.0 });
        assert_eq!(q.len(), 3);

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained[0], InputEvent::PrimaryAction);
        assert!(matches!(drained[1], InputEvent::Key { .. }));
        assert!(matches!(drained[2], InputEvent::PointerMotion { .. }));
        assert!(q.is_empty());
    }
}

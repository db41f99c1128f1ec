use crate::navigation::navigator::ViewPreset;

/// Navigation requests from the UI shell (buttons, moon panel, presets).
#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    /// Track a body by name (case-insensitive).
    Focus(String),
    StopTracking,
    Preset(ViewPreset),
}

/// Input event types the viewer understands.
/// Pointer coordinates are CSS pixels relative to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// Mouse wheel; negative is away from the user (zoom in).
    Wheel { delta_y: f32 },
    /// The canvas was resized.
    Resize { width: f32, height: f32 },
    Command(NavCommand),
}

/// Events pushed by the host between ticks, drained once at the start of each tick.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Consecutive pointer moves collapse into the latest one.
    pub fn push(&mut self, event: InputEvent) {
        if let (InputEvent::PointerMove { .. }, Some(InputEvent::PointerMove { .. })) = (&event, self.events.last()) {
            self.events.pop();
        }
        self.events.push(event);
    }

    /// Take every pending event in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Wheel { delta_y: -100.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn pointer_moves_coalesce() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 1.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 5.0, y: 2.0 });
        assert_eq!(q.len(), 2);
        assert_eq!(q.drain()[1], InputEvent::PointerMove { x: 5.0, y: 2.0 });
    }

    #[test]
    fn command_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Command(NavCommand::Focus("Saturn".into())));
        q.push(InputEvent::Command(NavCommand::Preset(ViewPreset::Top)));
        let events = q.drain();
        match &events[0] {
            InputEvent::Command(NavCommand::Focus(name)) => assert_eq!(name, "Saturn"),
            other => panic!("Expected Focus command, got {:?}", other),
        }
        assert_eq!(events[1], InputEvent::Command(NavCommand::Preset(ViewPreset::Top)));
    }
}

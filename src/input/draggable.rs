use crate::{
    core::geo::Point,
    dom::element::Element,
    input::pointer::{PointerEvent, PointerPhase},
};

/// Configuration for the drag gesture engine
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// Minimum cumulative displacement before a gesture counts as a drag
    /// rather than a click
    pub click_tolerance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            click_tolerance: 3.0,
        }
    }
}

/// Lifecycle events emitted by the gesture engine.
///
/// For any pointer-down/move/up sequence the engine emits exactly one
/// `Start`, zero or more `Move`, and one `End`, in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// A gesture began at the given pointer position
    Start { pointer: Point },
    /// The bound element was repositioned
    Move { position: Point },
    /// The gesture ended; `moved` is true if it exceeded the click tolerance
    End { moved: bool },
}

#[derive(Debug, Clone)]
struct Gesture {
    pointer_start: Point,
    element_start: Point,
}

/// Screen-space drag gesture engine.
///
/// Bound to exactly one element for its lifetime; it tracks pointer
/// down/move/up, applies the cumulative pixel offset to the element, and
/// emits start/move/end lifecycle events. It owns no domain semantics.
pub struct Draggable {
    element: Element,
    config: DragConfig,
    enabled: bool,
    gesture: Option<Gesture>,
    moved: bool,
}

impl Draggable {
    pub fn new(element: Element) -> Self {
        Self::with_config(element, DragConfig::default())
    }

    pub fn with_config(element: Element, config: DragConfig) -> Self {
        Self {
            element,
            config,
            enabled: false,
            gesture: None,
            moved: false,
        }
    }

    /// The element this engine is bound to
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Starts listening for pointer events. Idempotent.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops listening for pointer events. Idempotent.
    ///
    /// Disabling mid-gesture returns the terminal end event so consumers
    /// never observe a start without a matching end.
    pub fn disable(&mut self) -> Option<DragEvent> {
        self.enabled = false;
        self.gesture.take().map(|_| DragEvent::End { moved: self.moved })
    }

    /// True iff the most recent gesture exceeded the click tolerance
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// True while a gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Feeds a raw pointer event through the engine, returning the gesture
    /// lifecycle events it produced.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<DragEvent> {
        if !self.enabled {
            return Vec::new();
        }

        match event.phase {
            PointerPhase::Down => self.on_down(event.position),
            PointerPhase::Move => self.on_move(event.position),
            PointerPhase::Up => self.on_up(),
        }
    }

    fn on_down(&mut self, pointer: Point) -> Vec<DragEvent> {
        // No nested gestures
        if self.gesture.is_some() {
            return Vec::new();
        }

        log::trace!("drag gesture started at ({}, {})", pointer.x, pointer.y);
        self.moved = false;
        self.gesture = Some(Gesture {
            pointer_start: pointer,
            element_start: self.element.position(),
        });

        vec![DragEvent::Start { pointer }]
    }

    fn on_move(&mut self, pointer: Point) -> Vec<DragEvent> {
        let Some(gesture) = &self.gesture else {
            return Vec::new();
        };

        let offset = pointer.subtract(&gesture.pointer_start);
        if offset.distance_to(&Point::default()) > self.config.click_tolerance {
            self.moved = true;
        }

        let position = gesture.element_start.add(&offset);
        self.element.set_position(position);

        vec![DragEvent::Move { position }]
    }

    fn on_up(&mut self) -> Vec<DragEvent> {
        if self.gesture.take().is_none() {
            return Vec::new();
        }

        log::trace!("drag gesture ended, moved={}", self.moved);
        vec![DragEvent::End { moved: self.moved }]
    }
}

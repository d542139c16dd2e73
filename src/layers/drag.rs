use crate::{
    dom::element::{Element, ElementId},
    input::{
        draggable::{DragEvent, Draggable},
        pointer::PointerEvent,
    },
};

/// Visual class applied to an icon element while its marker is draggable
pub const DRAGGABLE_CLASS: &str = "marker-draggable";

/// Drag controller for a single marker.
///
/// Wraps the screen-space gesture engine bound to the marker's icon element.
/// The state machine is idle -> dragging -> idle, driven entirely by the
/// engine's start/move/end events; the owning marker turns those into its
/// domain event sequence (movestart/dragstart, move/drag, moveend/dragend)
/// because it owns the geographic position and the shadow element.
pub struct MarkerDragHandler {
    draggable: Draggable,
    enabled: bool,
}

impl MarkerDragHandler {
    /// Builds a controller bound to the marker's current icon element
    pub fn new(icon_element: Element) -> Self {
        Self {
            draggable: Draggable::new(icon_element),
            enabled: false,
        }
    }

    /// Identity of the element the underlying engine is bound to. Used to
    /// detect icon swaps that require rebuilding the controller.
    pub fn element_id(&self) -> ElementId {
        self.draggable.element().id()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Arms the gesture engine and marks the icon as draggable. Idempotent.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.draggable.enable();
        self.draggable.element().add_class(DRAGGABLE_CLASS);
        self.enabled = true;
    }

    /// Disarms the gesture engine and removes the draggable mark.
    ///
    /// Safe to call when never enabled. If a gesture is in flight, the
    /// terminal end event is returned so the marker can still fire
    /// moveend/dragend.
    pub fn disable(&mut self) -> Option<DragEvent> {
        if !self.enabled {
            return None;
        }
        let terminal = self.draggable.disable();
        self.draggable.element().remove_class(DRAGGABLE_CLASS);
        self.enabled = false;
        terminal
    }

    /// True iff the most recent gesture exceeded the drag tolerance.
    /// Consumers use this to suppress click handling after a real drag.
    pub fn moved(&self) -> bool {
        self.draggable.moved()
    }

    pub fn is_dragging(&self) -> bool {
        self.draggable.is_dragging()
    }

    /// Feeds a pointer event to the gesture engine
    pub fn process(&mut self, event: &PointerEvent) -> Vec<DragEvent> {
        if !self.enabled {
            return Vec::new();
        }
        self.draggable.process(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::input::pointer::PointerEvent;

    #[test]
    fn test_enable_disable_toggles_class() {
        let element = Element::new("img");
        let mut handler = MarkerDragHandler::new(element.clone());

        // Disable before any enable is safe
        assert!(handler.disable().is_none());

        handler.enable();
        handler.enable();
        assert!(handler.is_enabled());
        assert!(element.has_class(DRAGGABLE_CLASS));

        handler.disable();
        assert!(!handler.is_enabled());
        assert!(!element.has_class(DRAGGABLE_CLASS));
    }

    #[test]
    fn test_disabled_handler_ignores_pointer_events() {
        let mut handler = MarkerDragHandler::new(Element::new("img"));
        assert!(handler
            .process(&PointerEvent::down(Point::new(5.0, 5.0)))
            .is_empty());
    }

    #[test]
    fn test_disable_mid_gesture_returns_terminal_end() {
        let mut handler = MarkerDragHandler::new(Element::new("img"));
        handler.enable();
        handler.process(&PointerEvent::down(Point::new(0.0, 0.0)));
        handler.process(&PointerEvent::moved(Point::new(20.0, 0.0)));

        let terminal = handler.disable();
        assert!(matches!(terminal, Some(DragEvent::End { moved: true })));
        assert!(!handler.is_dragging());
    }
}

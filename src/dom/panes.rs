use crate::dom::element::{Element, ElementId};
use fxhash::FxHashSet;
use std::cell::RefCell;

/// Pane name for rectangular overlays
pub const OVERLAY_PANE: &str = "overlay";
/// Pane name for marker icons
pub const MARKER_PANE: &str = "marker";
/// Pane name for marker shadows, rendered below the marker pane
pub const SHADOW_PANE: &str = "shadow";

/// Named render-layer registry.
///
/// Each pane is a container element layers insert themselves into; panes are
/// created on first use so `pane` never fails.
pub struct Panes {
    root: Element,
    panes: RefCell<Vec<(String, Element)>>,
}

impl Panes {
    pub fn new() -> Self {
        let panes = Self {
            root: Element::new("div"),
            panes: RefCell::new(Vec::new()),
        };
        // Stacking order: shadows under overlays under markers
        panes.pane(SHADOW_PANE);
        panes.pane(OVERLAY_PANE);
        panes.pane(MARKER_PANE);
        panes
    }

    /// Gets the container element for a pane, creating it on first use
    pub fn pane(&self, name: &str) -> Element {
        if let Some((_, element)) = self.panes.borrow().iter().find(|(n, _)| n == name) {
            return element.clone();
        }

        let element = Element::new("div");
        element.add_class(&format!("{name}-pane"));
        self.root.append(&element);
        self.panes.borrow_mut().push((name.to_string(), element.clone()));
        element
    }

    /// The root element all panes hang off
    pub fn root(&self) -> Element {
        self.root.clone()
    }
}

impl Default for Panes {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of elements the hit-testing layer routes pointer events to.
///
/// Registration is idempotent both ways; unregistering an unknown element is
/// a no-op.
#[derive(Default)]
pub struct InteractiveTargets {
    targets: RefCell<FxHashSet<ElementId>>,
}

impl InteractiveTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, element: &Element) {
        self.targets.borrow_mut().insert(element.id());
    }

    pub fn unregister(&self, element: &Element) {
        self.targets.borrow_mut().remove(&element.id());
    }

    pub fn is_registered(&self, element: &Element) -> bool {
        self.targets.borrow().contains(&element.id())
    }

    pub fn len(&self) -> usize {
        self.targets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.borrow().is_empty()
    }
}

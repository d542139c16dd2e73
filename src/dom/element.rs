use crate::core::geo::Point;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of an element, stable for the element's lifetime
pub type ElementId = u64;

/// A zoom-animation transform applied on top of an element's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTransform {
    pub translate: Point,
    pub scale: f64,
}

#[derive(Debug)]
struct ElementState {
    id: ElementId,
    tag: String,
    classes: Vec<String>,
    position: Point,
    size: Option<Point>,
    transform: Option<ElementTransform>,
    opacity: f64,
    z_index: Option<f64>,
    tab_index: Option<i32>,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    parent: Option<Weak<RefCell<ElementState>>>,
}

/// Handle to a retained visual element.
///
/// Clones share the same underlying element; a layer keeps one handle as the
/// owner while the gesture engine holds another to move it around. The tree
/// is single-threaded, matching the event-driven execution model.
#[derive(Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementState>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementState {
                id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed),
                tag: tag.to_string(),
                classes: Vec::new(),
                position: Point::default(),
                size: None,
                transform: None,
                opacity: 1.0,
                z_index: None,
                tab_index: None,
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
            })),
        }
    }

    pub fn id(&self) -> ElementId {
        self.inner.borrow().id
    }

    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    /// Adds a CSS-style class if not already present
    pub fn add_class(&self, class: &str) {
        let mut state = self.inner.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// Sets the element's 2D position within its pane
    pub fn set_position(&self, position: Point) {
        self.inner.borrow_mut().position = position;
    }

    pub fn position(&self) -> Point {
        self.inner.borrow().position
    }

    pub fn set_size(&self, size: Point) {
        self.inner.borrow_mut().size = Some(size);
    }

    pub fn size(&self) -> Option<Point> {
        self.inner.borrow().size
    }

    /// Applies a combined translate+scale transform, used while a zoom
    /// animation is in flight
    pub fn set_transform(&self, translate: Point, scale: f64) {
        self.inner.borrow_mut().transform = Some(ElementTransform { translate, scale });
    }

    pub fn transform(&self) -> Option<ElementTransform> {
        self.inner.borrow().transform
    }

    pub fn clear_transform(&self) {
        self.inner.borrow_mut().transform = None;
    }

    pub fn set_opacity(&self, opacity: f64) {
        self.inner.borrow_mut().opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn opacity(&self) -> f64 {
        self.inner.borrow().opacity
    }

    pub fn set_z_index(&self, z_index: f64) {
        self.inner.borrow_mut().z_index = Some(z_index);
    }

    pub fn z_index(&self) -> Option<f64> {
        self.inner.borrow().z_index
    }

    pub fn set_tab_index(&self, tab_index: i32) {
        self.inner.borrow_mut().tab_index = Some(tab_index);
    }

    pub fn tab_index(&self) -> Option<i32> {
        self.inner.borrow().tab_index
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut state = self.inner.borrow_mut();
        if let Some(entry) = state.attributes.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            state.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Appends a child element, detaching it from any previous parent first.
    /// Re-appending an existing child moves it to the end.
    pub fn append(&self, child: &Element) {
        child.remove();
        child.inner.borrow_mut().parent = Some(Rc::downgrade(&self.inner));
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Detaches this element from its parent. No-op when already detached.
    pub fn remove(&self) {
        let parent = self.inner.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|weak| weak.upgrade()) {
            let id = self.id();
            parent.borrow_mut().children.retain(|c| c.id() != id);
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .map(|inner| Element { inner })
    }

    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    pub fn contains(&self, child: &Element) -> bool {
        let id = child.id();
        self.inner.borrow().children.iter().any(|c| c.id() == id)
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Moves this element to the end of its parent's children (rendered on top)
    pub fn to_front(&self) {
        if let Some(parent) = self.parent() {
            let id = self.id();
            let mut state = parent.inner.borrow_mut();
            if let Some(index) = state.children.iter().position(|c| c.id() == id) {
                let element = state.children.remove(index);
                state.children.push(element);
            }
        }
    }

    /// Moves this element to the start of its parent's children (rendered below)
    pub fn to_back(&self) {
        if let Some(parent) = self.parent() {
            let id = self.id();
            let mut state = parent.inner.borrow_mut();
            if let Some(index) = state.children.iter().position(|c| c.id() == id) {
                let element = state.children.remove(index);
                state.children.insert(0, element);
            }
        }
    }

    /// Index of this element among its siblings, if attached
    pub fn sibling_index(&self) -> Option<usize> {
        let parent = self.parent()?;
        let id = self.id();
        let state = parent.inner.borrow();
        state.children.iter().position(|c| c.id() == id)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Element")
            .field("id", &state.id)
            .field("tag", &state.tag)
            .field("classes", &state.classes)
            .field("position", &state.position)
            .field("children", &state.children.len())
            .finish()
    }
}

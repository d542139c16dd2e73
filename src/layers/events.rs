use crate::core::geo::{LatLng, Point};
use fxhash::FxHashMap;
use std::hash::Hash;

/// An event type with a fixed, enumerated kind set.
///
/// Each layer kind exposes its own event enum, so listeners subscribe against
/// a compile-time checked name set instead of free-form strings.
pub trait LayerEvent {
    type Kind: Copy + Eq + Hash;

    fn kind(&self) -> Self::Kind;
}

/// Callback invoked with a fired layer event
pub type Listener<E> = Box<dyn Fn(&E)>;

/// Per-layer typed event emitter.
///
/// Listeners run synchronously, in registration order, on the thread that
/// fired the event. A listener for the first event of a paired sequence can
/// observe (and cause) state changes before the second fires.
pub struct EventEmitter<E: LayerEvent> {
    listeners: FxHashMap<E::Kind, Vec<Listener<E>>>,
}

impl<E: LayerEvent> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: FxHashMap::default(),
        }
    }

    /// Registers a listener for one event kind
    pub fn on<F>(&mut self, kind: E::Kind, callback: F)
    where
        F: Fn(&E) + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(callback));
    }

    /// Fires an event to every listener registered for its kind
    pub fn fire(&self, event: &E) {
        if let Some(callbacks) = self.listeners.get(&event.kind()) {
            for callback in callbacks {
                callback(event);
            }
        }
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl<E: LayerEvent> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Kinds of events a marker can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerEventKind {
    MoveStart,
    DragStart,
    Move,
    Drag,
    MoveEnd,
    DragEnd,
}

/// Events fired by a marker.
///
/// During a drag gesture the ordering contract is: `MoveStart` precedes
/// `DragStart`, each `Move` precedes its paired `Drag`, and `MoveEnd`
/// precedes `DragEnd`. Generic move semantics always come before the
/// drag-specific ones.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerEvent {
    /// The marker is about to start moving
    MoveStart { lat_lng: LatLng },
    /// A drag gesture started on the marker
    DragStart,
    /// The marker's position changed
    Move { old_lat_lng: LatLng, lat_lng: LatLng },
    /// The marker was dragged to a new position
    Drag { lat_lng: LatLng, pixel: Point },
    /// The marker finished moving
    MoveEnd { lat_lng: LatLng },
    /// The drag gesture ended; `moved` distinguishes a real drag from a click
    DragEnd { moved: bool },
}

impl LayerEvent for MarkerEvent {
    type Kind = MarkerEventKind;

    fn kind(&self) -> MarkerEventKind {
        match self {
            MarkerEvent::MoveStart { .. } => MarkerEventKind::MoveStart,
            MarkerEvent::DragStart => MarkerEventKind::DragStart,
            MarkerEvent::Move { .. } => MarkerEventKind::Move,
            MarkerEvent::Drag { .. } => MarkerEventKind::Drag,
            MarkerEvent::MoveEnd { .. } => MarkerEventKind::MoveEnd,
            MarkerEvent::DragEnd { .. } => MarkerEventKind::DragEnd,
        }
    }
}

/// Kinds of events an object overlay can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEventKind {
    Load,
}

/// Events fired by an object overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// The embedded resource element was created and inserted
    Load { url: String },
}

impl LayerEvent for OverlayEvent {
    type Kind = OverlayEventKind;

    fn kind(&self) -> OverlayEventKind {
        match self {
            OverlayEvent::Load { .. } => OverlayEventKind::Load,
        }
    }
}

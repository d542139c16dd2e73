//! Prelude module for common pinlayer types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use pinlayer::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use crate::dom::{
    element::Element,
    panes::{InteractiveTargets, Panes},
};

pub use crate::input::{
    draggable::{DragConfig, DragEvent, Draggable},
    pointer::{PointerEvent, PointerPhase},
};

pub use crate::layers::{
    base::PositionedOverlay,
    events::{EventEmitter, LayerEvent, MarkerEvent, MarkerEventKind, OverlayEvent, OverlayEventKind},
    icon::{HtmlIcon, Icon, IconElement, PinIcon},
    marker::{Marker, MarkerOptions},
    object::{ObjectOverlay, ObjectOverlayOptions},
};

pub use crate::map::{Map, MapContext};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

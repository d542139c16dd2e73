//! # Pinlayer
//!
//! A positioned-overlay and marker-drag interaction layer, inspired by Leaflet.
//!
//! This library keeps geographic layers (markers, object/image overlays)
//! pinned to a map viewport through pan and zoom, and translates raw pointer
//! events into a layer-level event model that supports dragging.

pub mod core;
pub mod dom;
pub mod input;
pub mod layers;
pub mod map;
pub mod prelude;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use crate::layers::{
    base::PositionedOverlay,
    icon::{HtmlIcon, Icon, IconElement, PinIcon},
    marker::{Marker, MarkerOptions},
    object::{ObjectOverlay, ObjectOverlayOptions},
};

pub use crate::input::{
    draggable::{DragEvent, Draggable},
    pointer::{PointerEvent, PointerPhase},
};

pub use crate::map::{Map, MapContext};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs the process-wide diagnostic sink for `log` output.
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_diagnostics() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

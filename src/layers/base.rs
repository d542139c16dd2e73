use crate::{
    core::{geo::LatLng, viewport::Viewport},
    dom::element::Element,
    input::pointer::PointerEvent,
    map::MapContext,
    Result,
};

/// Shared lifecycle contract for layers whose screen placement derives from a
/// geographic anchor.
///
/// Implemented by the closed set of layer variants (markers, object
/// overlays); the map drives every mounted layer through `update` on view
/// changes and through `animate_zoom` while a zoom animation is in flight.
pub trait PositionedOverlay {
    /// Constructs the layer's element (first mount only), inserts it into
    /// its pane and computes the initial position. Mount-while-mounted is a
    /// no-op.
    fn mount(&mut self, ctx: &MapContext) -> Result<()>;

    /// Removes the layer's element from the render tree and clears its
    /// interactive-target registration. Unmount-while-unmounted is a no-op.
    fn unmount(&mut self, ctx: &MapContext) -> Result<()>;

    /// Recomputes screen position (and size) from the current geographic
    /// anchors. Idempotent for an unchanged view.
    fn update(&mut self, viewport: &Viewport);

    /// Applies a provisional translate/scale placement for an animated zoom
    /// towards the target view, without a full layout pass
    fn animate_zoom(&mut self, viewport: &Viewport, target_zoom: f64, target_center: &LatLng);

    fn set_opacity(&mut self, opacity: f64);

    fn is_mounted(&self) -> bool;

    /// The element pointer events are hit-tested against, if the layer has
    /// one. Only elements registered as interactive targets receive events.
    fn interactive_element(&self) -> Option<Element> {
        None
    }

    /// Routes a raw pointer event into the layer's interaction model
    fn handle_pointer(&mut self, _event: &PointerEvent, _viewport: &Viewport) {}

    /// Snapshot of the layer's configuration for debugging and persistence
    fn options(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

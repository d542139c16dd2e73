use crate::{
    core::{
        bounds::Bounds,
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    dom::{element::Element, panes},
    layers::{
        base::PositionedOverlay,
        events::{EventEmitter, OverlayEvent, OverlayEventKind},
    },
    map::MapContext,
    Result,
};

/// Configuration for an object overlay
pub struct ObjectOverlayOptions {
    pub opacity: f64,
    /// Whether the element is registered as an interactive target
    pub interactive: bool,
    pub pane: String,
}

impl Default for ObjectOverlayOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            interactive: false,
            pane: panes::OVERLAY_PANE.to_string(),
        }
    }
}

/// A rectangular layer bound to a geographic bounding box, rendered as an
/// embedded external-resource element.
///
/// The element exists exactly while the overlay is mounted; its screen
/// rectangle is recomputed from the bounds and the current transform on every
/// view change.
pub struct ObjectOverlay {
    url: String,
    bounds: LatLngBounds,
    options: ObjectOverlayOptions,
    element: Option<Element>,
    events: EventEmitter<OverlayEvent>,
    mounted: bool,
}

impl ObjectOverlay {
    pub fn new(url: &str, bounds: LatLngBounds) -> Self {
        Self {
            url: url.to_string(),
            bounds,
            options: ObjectOverlayOptions::default(),
            element: None,
            events: EventEmitter::new(),
            mounted: false,
        }
    }

    pub fn with_options(mut self, options: ObjectOverlayOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a listener for one overlay event kind
    pub fn on<F>(&mut self, kind: OverlayEventKind, callback: F)
    where
        F: Fn(&OverlayEvent) + 'static,
    {
        self.events.on(kind, callback);
    }

    pub fn get_bounds(&self) -> &LatLngBounds {
        &self.bounds
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }

    /// The live element, present only while mounted
    pub fn get_element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Points the overlay at a different resource
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        if let Some(element) = &self.element {
            element.set_attribute("data", url);
        }
    }

    /// Re-anchors the overlay to new geographic bounds and repositions it
    pub fn set_bounds(&mut self, bounds: LatLngBounds, viewport: &Viewport) {
        self.bounds = bounds;
        self.update(viewport);
    }

    pub fn bring_to_front(&self) {
        if let Some(element) = &self.element {
            element.to_front();
        }
    }

    pub fn bring_to_back(&self) {
        if let Some(element) = &self.element {
            element.to_back();
        }
    }

    /// The overlay's current screen rectangle, while mounted
    pub fn screen_rect(&self, viewport: &Viewport) -> Bounds {
        let nw = viewport.lat_lng_to_layer_point(&self.bounds.north_west());
        let se = viewport.lat_lng_to_layer_point(&self.bounds.south_east());
        Bounds::new(nw, se)
    }
}

impl PositionedOverlay for ObjectOverlay {
    fn mount(&mut self, ctx: &MapContext) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        log::debug!("mounting object overlay for {}", self.url);

        // One element per mount cycle
        if self.element.is_none() {
            let element = Element::new("object");
            element.add_class("object-overlay");
            element.set_attribute("data", &self.url);
            if self.options.opacity < 1.0 {
                element.set_opacity(self.options.opacity);
            }
            if self.options.interactive {
                element.add_class("interactive");
                ctx.interactive.register(&element);
            }
            self.element = Some(element);
        }

        if let Some(element) = &self.element {
            ctx.panes.pane(&self.options.pane).append(element);
        }
        self.mounted = true;

        self.events.fire(&OverlayEvent::Load {
            url: self.url.clone(),
        });
        self.update(&ctx.viewport);
        Ok(())
    }

    fn unmount(&mut self, ctx: &MapContext) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }

        if let Some(element) = self.element.take() {
            ctx.interactive.unregister(&element);
            element.remove();
        }
        self.mounted = false;
        Ok(())
    }

    fn update(&mut self, viewport: &Viewport) {
        let Some(element) = &self.element else {
            return;
        };

        let rect = self.screen_rect(viewport);
        element.clear_transform();
        element.set_position(rect.min);
        element.set_size(rect.size());
    }

    fn animate_zoom(&mut self, viewport: &Viewport, target_zoom: f64, target_center: &LatLng) {
        let Some(element) = &self.element else {
            return;
        };

        let offset = viewport.lat_lng_to_new_layer_point(
            &self.bounds.north_west(),
            target_zoom,
            target_center,
        );
        element.set_transform(offset, viewport.zoom_scale(target_zoom));
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.options.opacity = opacity.clamp(0.0, 1.0);
        if let Some(element) = &self.element {
            element.set_opacity(self.options.opacity);
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn interactive_element(&self) -> Option<Element> {
        self.element.clone()
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url": self.url,
            "bounds": {
                "south": self.bounds.south_west.lat,
                "west": self.bounds.south_west.lng,
                "north": self.bounds.north_east.lat,
                "east": self.bounds.north_east.lng
            },
            "opacity": self.options.opacity,
            "interactive": self.options.interactive
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

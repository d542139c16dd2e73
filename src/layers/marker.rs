use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    dom::{element::Element, panes},
    input::{draggable::DragEvent, pointer::PointerEvent},
    layers::{
        base::PositionedOverlay,
        drag::MarkerDragHandler,
        events::{EventEmitter, MarkerEvent, MarkerEventKind},
        icon::{Icon, PinIcon},
    },
    map::MapContext,
    Result,
};

/// Configuration for a marker layer
pub struct MarkerOptions {
    /// Whether the marker can be dragged with the pointer
    pub draggable: bool,
    /// Whether the icon element is keyboard focusable
    pub keyboard: bool,
    /// Whether the icon element is registered as an interactive target
    pub interactive: bool,
    pub opacity: f64,
    /// Static bias added to the screen-depth derived z-index
    pub z_index_offset: f64,
    /// Transiently raise the marker above others while hovered
    pub rise_on_hover: bool,
    pub rise_offset: f64,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub pane: String,
    pub shadow_pane: String,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            draggable: false,
            keyboard: true,
            interactive: true,
            opacity: 1.0,
            z_index_offset: 0.0,
            rise_on_hover: false,
            rise_offset: 250.0,
            title: None,
            alt: None,
            pane: panes::MARKER_PANE.to_string(),
            shadow_pane: panes::SHADOW_PANE.to_string(),
        }
    }
}

/// A point layer rendered as an icon element, with an optional shadow.
///
/// Created detached; the icon and shadow elements exist exactly while the
/// marker is mounted. The stored geographic position is the source of truth
/// for where the marker is, and is kept consistent with the icon's screen
/// position through pan, zoom, and drag gestures.
pub struct Marker {
    lat_lng: LatLng,
    icon: Box<dyn Icon>,
    options: MarkerOptions,
    icon_element: Option<Element>,
    shadow_element: Option<Element>,
    events: EventEmitter<MarkerEvent>,
    drag: Option<MarkerDragHandler>,
    popup_closer: Option<Box<dyn FnMut()>>,
    z_index_base: f64,
    hovered: bool,
    mounted: bool,
}

impl Marker {
    pub fn new(lat_lng: LatLng) -> Self {
        Self {
            lat_lng,
            icon: Box::new(PinIcon::default()),
            options: MarkerOptions::default(),
            icon_element: None,
            shadow_element: None,
            events: EventEmitter::new(),
            drag: None,
            popup_closer: None,
            z_index_base: 0.0,
            hovered: false,
            mounted: false,
        }
    }

    pub fn with_icon(mut self, icon: Box<dyn Icon>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_options(mut self, options: MarkerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.options.draggable = draggable;
        self
    }

    /// Registers a listener for one marker event kind
    pub fn on<F>(&mut self, kind: MarkerEventKind, callback: F)
    where
        F: Fn(&MarkerEvent) + 'static,
    {
        self.events.on(kind, callback);
    }

    pub fn get_lat_lng(&self) -> LatLng {
        self.lat_lng
    }

    /// The live icon element, present only while mounted
    pub fn get_element(&self) -> Option<&Element> {
        self.icon_element.as_ref()
    }

    pub fn get_shadow_element(&self) -> Option<&Element> {
        self.shadow_element.as_ref()
    }

    /// Offset a bound popup opens at, from the icon definition
    pub fn popup_anchor(&self) -> Point {
        self.icon.popup_anchor()
    }

    /// Installs the hook used to close a bound popup before a drag starts
    pub fn bind_popup_closer<F>(&mut self, closer: F)
    where
        F: FnMut() + 'static,
    {
        self.popup_closer = Some(Box::new(closer));
    }

    /// Closes any bound popup; a no-op when nothing is bound
    pub fn close_popup(&mut self) {
        if let Some(closer) = &mut self.popup_closer {
            closer();
        }
    }

    /// Moves the marker to a new position, repositioning the icon if mounted
    /// and firing `move` with the old and new coordinates
    pub fn set_lat_lng(&mut self, lat_lng: LatLng, viewport: &Viewport) {
        let old_lat_lng = self.lat_lng;
        self.lat_lng = lat_lng;
        self.update(viewport);
        self.events.fire(&MarkerEvent::Move {
            old_lat_lng,
            lat_lng,
        });
    }

    /// Replaces the icon definition. While mounted this re-initializes the
    /// icon and shadow elements (the definition may reuse the previous
    /// instances) and rebinds the drag controller, preserving its
    /// enabled/disabled state.
    pub fn set_icon(&mut self, icon: Box<dyn Icon>, ctx: &MapContext) {
        self.icon = icon;
        if self.mounted {
            self.init_icon(ctx);
            self.update(&ctx.viewport);
        }
    }

    /// Arms or disarms dragging. Disarming mid-gesture still delivers the
    /// terminal moveend/dragend pair.
    pub fn set_draggable(&mut self, enabled: bool) {
        self.options.draggable = enabled;
        if !self.mounted {
            return;
        }

        if enabled {
            if let Some(element) = &self.icon_element {
                let needs_build = self
                    .drag
                    .as_ref()
                    .map_or(true, |handler| handler.element_id() != element.id());
                if needs_build {
                    self.drag = Some(MarkerDragHandler::new(element.clone()));
                }
            }
            if let Some(handler) = &mut self.drag {
                handler.enable();
            }
        } else {
            let terminal = self.drag.as_mut().and_then(MarkerDragHandler::disable);
            if let Some(DragEvent::End { moved }) = terminal {
                self.fire_drag_end(moved);
            }
        }
    }

    pub fn is_draggable(&self) -> bool {
        self.drag.as_ref().is_some_and(MarkerDragHandler::is_enabled)
    }

    /// True iff the most recent gesture was a real drag rather than a click
    pub fn moved(&self) -> bool {
        self.drag.as_ref().is_some_and(MarkerDragHandler::moved)
    }

    /// Presentation-only hover bias: transiently raises the marker when
    /// `rise_on_hover` is configured
    pub fn set_hovered(&mut self, hovered: bool) {
        if !self.options.rise_on_hover {
            return;
        }
        self.hovered = hovered;
        self.apply_z_index();
    }

    pub fn set_z_index_offset(&mut self, offset: f64) {
        self.options.z_index_offset = offset;
        self.apply_z_index();
    }

    fn apply_z_index(&self) {
        if let Some(element) = &self.icon_element {
            let rise = if self.hovered {
                self.options.rise_offset
            } else {
                0.0
            };
            element.set_z_index(self.z_index_base + self.options.z_index_offset + rise);
        }
    }

    fn init_icon(&mut self, ctx: &MapContext) {
        let previous = self.icon_element.take();
        let drag_was_enabled = self.is_draggable();

        let created = self.icon.create_icon(previous.as_ref());
        if !created.reused {
            if let Some(old) = &previous {
                ctx.interactive.unregister(old);
                old.remove();
            }
        }

        let element = created.element;
        element.add_class("marker-icon");
        if self.options.keyboard {
            element.set_tab_index(0);
        }
        if let Some(title) = &self.options.title {
            element.set_attribute("title", title);
        }
        if let Some(alt) = &self.options.alt {
            element.set_attribute("alt", alt);
        }
        if self.options.opacity < 1.0 {
            element.set_opacity(self.options.opacity);
        }
        if self.options.interactive {
            element.add_class("interactive");
            ctx.interactive.register(&element);
        }
        if !created.reused || !element.is_attached() {
            ctx.panes.pane(&self.options.pane).append(&element);
        }

        // Rebind the drag controller when the icon element instance changed,
        // carrying the armed state across the swap
        let needs_rebuild = self
            .drag
            .as_ref()
            .is_some_and(|handler| handler.element_id() != element.id());
        if needs_rebuild {
            let mut handler = MarkerDragHandler::new(element.clone());
            if drag_was_enabled {
                handler.enable();
            }
            self.drag = Some(handler);
        }
        self.icon_element = Some(element);

        let previous_shadow = self.shadow_element.take();
        match self.icon.create_shadow(previous_shadow.as_ref()) {
            Some(created) => {
                if !created.reused {
                    if let Some(old) = &previous_shadow {
                        old.remove();
                    }
                }
                let shadow = created.element;
                shadow.add_class("marker-shadow");
                if self.options.opacity < 1.0 {
                    shadow.set_opacity(self.options.opacity);
                }
                if !created.reused || !shadow.is_attached() {
                    ctx.panes.pane(&self.options.shadow_pane).append(&shadow);
                }
                self.shadow_element = Some(shadow);
            }
            None => {
                if let Some(old) = &previous_shadow {
                    old.remove();
                }
            }
        }
    }

    fn fire_drag_start(&mut self) {
        // Unconditionally close any bound popup before announcing the drag
        self.close_popup();
        log::debug!(
            "marker drag started at ({}, {})",
            self.lat_lng.lat,
            self.lat_lng.lng
        );
        self.events.fire(&MarkerEvent::MoveStart {
            lat_lng: self.lat_lng,
        });
        self.events.fire(&MarkerEvent::DragStart);
    }

    fn fire_drag_move(&mut self, position: Point, viewport: &Viewport) {
        let anchored = position.add(&self.icon.anchor());
        let lat_lng = viewport.layer_point_to_lat_lng(&anchored);

        // The shadow tracks the icon's raw pixel position
        if let Some(shadow) = &self.shadow_element {
            shadow.set_position(position);
        }

        let old_lat_lng = self.lat_lng;
        self.lat_lng = lat_lng;

        self.events.fire(&MarkerEvent::Move {
            old_lat_lng,
            lat_lng,
        });
        self.events.fire(&MarkerEvent::Drag {
            lat_lng,
            pixel: position,
        });
    }

    fn fire_drag_end(&self, moved: bool) {
        self.events.fire(&MarkerEvent::MoveEnd {
            lat_lng: self.lat_lng,
        });
        self.events.fire(&MarkerEvent::DragEnd { moved });
    }
}

impl PositionedOverlay for Marker {
    fn mount(&mut self, ctx: &MapContext) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        log::debug!(
            "mounting marker at ({}, {})",
            self.lat_lng.lat,
            self.lat_lng.lng
        );

        self.init_icon(ctx);
        self.mounted = true;
        if self.options.draggable {
            self.set_draggable(true);
        }
        self.update(&ctx.viewport);
        Ok(())
    }

    fn unmount(&mut self, ctx: &MapContext) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }

        // Resolve any in-flight gesture before tearing the elements down
        let terminal = self.drag.as_mut().and_then(MarkerDragHandler::disable);
        if let Some(DragEvent::End { moved }) = terminal {
            self.fire_drag_end(moved);
        }
        self.drag = None;

        if let Some(element) = self.icon_element.take() {
            ctx.interactive.unregister(&element);
            element.remove();
        }
        if let Some(shadow) = self.shadow_element.take() {
            shadow.remove();
        }
        self.mounted = false;
        Ok(())
    }

    fn update(&mut self, viewport: &Viewport) {
        let Some(element) = &self.icon_element else {
            return;
        };

        element.clear_transform();
        let pos = viewport.lat_lng_to_layer_point(&self.lat_lng).round();
        element.set_position(pos.subtract(&self.icon.anchor()));

        if let Some(shadow) = &self.shadow_element {
            shadow.clear_transform();
            shadow.set_position(pos.subtract(&self.icon.shadow_anchor()));
        }

        self.z_index_base = pos.y;
        self.apply_z_index();
    }

    fn animate_zoom(&mut self, viewport: &Viewport, target_zoom: f64, target_center: &LatLng) {
        let Some(element) = &self.icon_element else {
            return;
        };

        let pos = viewport
            .lat_lng_to_new_layer_point(&self.lat_lng, target_zoom, target_center)
            .round();
        element.set_position(pos.subtract(&self.icon.anchor()));

        if let Some(shadow) = &self.shadow_element {
            shadow.set_position(pos.subtract(&self.icon.shadow_anchor()));
        }
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.options.opacity = opacity.clamp(0.0, 1.0);
        if let Some(element) = &self.icon_element {
            element.set_opacity(self.options.opacity);
        }
        if let Some(shadow) = &self.shadow_element {
            shadow.set_opacity(self.options.opacity);
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn interactive_element(&self) -> Option<Element> {
        self.icon_element.clone()
    }

    fn handle_pointer(&mut self, event: &PointerEvent, viewport: &Viewport) {
        let drag_events = match &mut self.drag {
            Some(handler) => handler.process(event),
            None => return,
        };

        for drag_event in drag_events {
            match drag_event {
                DragEvent::Start { .. } => self.fire_drag_start(),
                DragEvent::Move { position } => self.fire_drag_move(position, viewport),
                DragEvent::End { moved } => self.fire_drag_end(moved),
            }
        }
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.lat_lng.lat,
                "lng": self.lat_lng.lng
            },
            "draggable": self.options.draggable,
            "keyboard": self.options.keyboard,
            "interactive": self.options.interactive,
            "opacity": self.options.opacity,
            "z_index_offset": self.options.z_index_offset
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

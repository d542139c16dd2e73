use crate::{
    core::{
        bounds::Bounds,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    dom::panes::{InteractiveTargets, Panes},
    input::pointer::{PointerEvent, PointerPhase},
    layers::base::PositionedOverlay,
    MapError, Result,
};

/// Shared map state a layer needs while mounting and updating: the transform
/// provider, the render-layer registry and the hit-testing registry.
pub struct MapContext {
    pub viewport: Viewport,
    pub panes: Panes,
    pub interactive: InteractiveTargets,
}

impl MapContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            panes: Panes::new(),
            interactive: InteractiveTargets::new(),
        }
    }
}

/// Thin map facade that owns the view state and the mounted layer list.
///
/// View changes are not queued: each one recomputes every layer from current
/// state, so the most recent update always wins.
pub struct Map {
    ctx: MapContext,
    layers: Vec<Box<dyn PositionedOverlay>>,
    pointer_target: Option<usize>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            ctx: MapContext::new(Viewport::new(center, zoom, size)),
            layers: Vec::new(),
            pointer_target: None,
        }
    }

    pub fn ctx(&self) -> &MapContext {
        &self.ctx
    }

    pub fn viewport(&self) -> &Viewport {
        &self.ctx.viewport
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Mounts a layer and adds it to the layer list, returning its index
    pub fn add_layer(&mut self, mut layer: Box<dyn PositionedOverlay>) -> Result<usize> {
        layer.mount(&self.ctx)?;
        self.layers.push(layer);
        Ok(self.layers.len() - 1)
    }

    /// Unmounts and removes the layer at the given index
    pub fn remove_layer(&mut self, index: usize) -> Result<Box<dyn PositionedOverlay>> {
        if index >= self.layers.len() {
            return Err(MapError::Layer(format!("no layer at index {index}")));
        }
        let mut layer = self.layers.remove(index);
        layer.unmount(&self.ctx)?;

        // Keep any captured pointer target pointing at the same layer
        self.pointer_target = match self.pointer_target {
            Some(target) if target == index => None,
            Some(target) if target > index => Some(target - 1),
            other => other,
        };
        Ok(layer)
    }

    /// Mutable access to a mounted layer; downcast via `as_any_mut`
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Box<dyn PositionedOverlay>> {
        self.layers.get_mut(index)
    }

    /// Sets center and zoom, then repositions every layer
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.ctx.viewport.set_center(center);
        self.ctx.viewport.set_zoom(zoom);
        self.update_layers();
    }

    /// Pans by a pixel delta, then repositions every layer
    pub fn pan_by(&mut self, delta: Point) {
        self.ctx.viewport.pan(delta);
        self.update_layers();
    }

    pub fn set_size(&mut self, size: Point) {
        self.ctx.viewport.set_size(size);
        self.update_layers();
    }

    /// One frame of an animated zoom: layers receive a provisional
    /// translate/scale placement instead of a recomputed absolute position
    pub fn animate_zoom_frame(&mut self, target_zoom: f64, target_center: LatLng) {
        for layer in &mut self.layers {
            layer.animate_zoom(&self.ctx.viewport, target_zoom, &target_center);
        }
    }

    /// Commits an animated zoom: the view settles on the target and every
    /// layer is recomputed absolutely, clearing animation transforms
    pub fn end_zoom(&mut self, target_zoom: f64, target_center: LatLng) {
        self.ctx.viewport.set_zoom(target_zoom);
        self.ctx.viewport.set_center(target_center);
        self.update_layers();
    }

    /// Routes a raw pointer event to the layer under the pointer.
    ///
    /// A down event is hit-tested against the registered interactive elements
    /// (topmost layer first); the winning layer captures the pointer until
    /// the matching up, so moves that leave its element keep driving the same
    /// gesture. Events with no target are dropped.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let target = match event.phase {
            PointerPhase::Down => {
                self.pointer_target = self.hit_test(&event.position);
                self.pointer_target
            }
            PointerPhase::Move => self.pointer_target,
            PointerPhase::Up => self.pointer_target.take(),
        };

        if let Some(layer) = target.and_then(|index| self.layers.get_mut(index)) {
            layer.handle_pointer(event, &self.ctx.viewport);
        }
    }

    /// Finds the topmost layer whose registered interactive element contains
    /// the given layer-space point
    fn hit_test(&self, position: &Point) -> Option<usize> {
        self.layers.iter().enumerate().rev().find_map(|(index, layer)| {
            let element = layer.interactive_element()?;
            if !self.ctx.interactive.is_registered(&element) {
                return None;
            }
            let min = element.position();
            let max = min.add(&element.size().unwrap_or_default());
            Bounds::new(min, max).contains(position).then_some(index)
        })
    }

    fn update_layers(&mut self) {
        for layer in &mut self.layers {
            layer.update(&self.ctx.viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_layer_out_of_range() {
        let mut map = Map::new(
            LatLng::new(0.0, 0.0).unwrap(),
            3.0,
            Point::new(800.0, 600.0),
        );
        assert!(map.remove_layer(0).is_err());
        assert_eq!(map.layer_count(), 0);
    }
}

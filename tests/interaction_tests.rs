//! Integration tests for marker dragging and viewport synchronization,
//! driven through the map facade the way a host application would.

use pinlayer::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn test_map() -> Map {
    let _ = env_logger::builder().is_test(true).try_init();
    Map::new(
        LatLng::new(51.505, -0.09).unwrap(),
        13.0,
        Point::new(800.0, 600.0),
    )
}

fn marker_in(map: &mut Map, lat: f64, lng: f64, draggable: bool) -> usize {
    let marker = Marker::new(LatLng::new(lat, lng).unwrap()).draggable(draggable);
    map.add_layer(Box::new(marker)).unwrap()
}

fn marker_mut(map: &mut Map, index: usize) -> &mut Marker {
    map.layer_mut(index)
        .unwrap()
        .as_any_mut()
        .downcast_mut::<Marker>()
        .unwrap()
}

fn icon_position(map: &mut Map, index: usize) -> Point {
    marker_mut(map, index).get_element().unwrap().position()
}

#[test]
fn drag_gesture_fires_well_formed_event_sequence() {
    let mut map = test_map();
    let index = marker_in(&mut map, 51.5, -0.09, true);

    let order = Rc::new(RefCell::new(Vec::new()));
    {
        let marker = marker_mut(&mut map, index);
        for kind in [
            MarkerEventKind::MoveStart,
            MarkerEventKind::DragStart,
            MarkerEventKind::Move,
            MarkerEventKind::Drag,
            MarkerEventKind::MoveEnd,
            MarkerEventKind::DragEnd,
        ] {
            let log = order.clone();
            marker.on(kind, move |event| log.borrow_mut().push(event.kind()));
        }
    }

    let start = icon_position(&mut map, index);
    map.handle_pointer(&PointerEvent::down(start));
    map.handle_pointer(&PointerEvent::moved(start.add(&Point::new(10.0, 5.0))));
    map.handle_pointer(&PointerEvent::moved(start.add(&Point::new(20.0, 10.0))));
    map.handle_pointer(&PointerEvent::up(start.add(&Point::new(20.0, 10.0))));

    let order = order.borrow();
    assert_eq!(order[0], MarkerEventKind::MoveStart);
    assert_eq!(order[1], MarkerEventKind::DragStart);
    assert_eq!(
        &order[2..6],
        &[
            MarkerEventKind::Move,
            MarkerEventKind::Drag,
            MarkerEventKind::Move,
            MarkerEventKind::Drag,
        ]
    );
    assert_eq!(order[6], MarkerEventKind::MoveEnd);
    assert_eq!(order[7], MarkerEventKind::DragEnd);
    assert_eq!(order.len(), 8);
}

#[test]
fn drag_by_pixel_delta_updates_geographic_position() {
    let mut map = test_map();
    let index = marker_in(&mut map, 51.5, -0.09, true);

    let payload = Rc::new(RefCell::new(None));
    {
        let sink = payload.clone();
        marker_mut(&mut map, index).on(MarkerEventKind::Drag, move |event| {
            if let MarkerEvent::Drag { lat_lng, .. } = event {
                *sink.borrow_mut() = Some(*lat_lng);
            }
        });
    }

    let before = marker_mut(&mut map, index).get_lat_lng();
    let old_layer_point = map.viewport().lat_lng_to_layer_point(&before);
    let start = icon_position(&mut map, index);
    let delta = Point::new(20.0, -15.0);

    map.handle_pointer(&PointerEvent::down(start));
    map.handle_pointer(&PointerEvent::moved(start.add(&delta)));
    map.handle_pointer(&PointerEvent::up(start.add(&delta)));

    let dragged_to = payload.borrow().expect("drag event carries a coordinate");

    // Dragging right and up on screen moves the marker east and north
    assert!(dragged_to.lng > before.lng);
    assert!(dragged_to.lat > before.lat);

    // The stored position equals the last drag payload after dragend
    assert_eq!(marker_mut(&mut map, index).get_lat_lng(), dragged_to);

    // The inverse transform reflects the pixel delta (up to icon rounding)
    let new_layer_point = map.viewport().lat_lng_to_layer_point(&dragged_to);
    let applied = new_layer_point.subtract(&old_layer_point);
    assert!((applied.x - delta.x).abs() < 1.0);
    assert!((applied.y - delta.y).abs() < 1.0);

    assert!(marker_mut(&mut map, index).moved());
}

#[test]
fn click_without_movement_is_not_a_drag() {
    let mut map = test_map();
    let index = marker_in(&mut map, 51.5, -0.09, true);

    let start = icon_position(&mut map, index);
    let before = marker_mut(&mut map, index).get_lat_lng();

    map.handle_pointer(&PointerEvent::down(start));
    map.handle_pointer(&PointerEvent::up(start));
    assert!(!marker_mut(&mut map, index).moved());
    assert_eq!(marker_mut(&mut map, index).get_lat_lng(), before);

    // Ten pixels of movement exceeds the tolerance
    map.handle_pointer(&PointerEvent::down(start));
    map.handle_pointer(&PointerEvent::moved(start.add(&Point::new(10.0, 0.0))));
    map.handle_pointer(&PointerEvent::up(start.add(&Point::new(10.0, 0.0))));
    assert!(marker_mut(&mut map, index).moved());
}

#[test]
fn gesture_only_drags_the_marker_under_the_pointer() {
    let mut map = test_map();
    let a = marker_in(&mut map, 51.5, -0.09, true);
    let b = marker_in(&mut map, 51.51, -0.12, true);

    let b_before = marker_mut(&mut map, b).get_lat_lng();
    let b_position = icon_position(&mut map, b);

    // A down in empty space captures nothing
    map.handle_pointer(&PointerEvent::down(Point::new(-500.0, -500.0)));
    map.handle_pointer(&PointerEvent::moved(Point::new(-480.0, -480.0)));
    map.handle_pointer(&PointerEvent::up(Point::new(-480.0, -480.0)));
    assert!(!marker_mut(&mut map, a).moved());
    assert!(!marker_mut(&mut map, b).moved());

    let start = icon_position(&mut map, a);
    map.handle_pointer(&PointerEvent::down(start));
    map.handle_pointer(&PointerEvent::moved(start.add(&Point::new(20.0, -15.0))));
    map.handle_pointer(&PointerEvent::up(start.add(&Point::new(20.0, -15.0))));

    assert!(marker_mut(&mut map, a).moved());
    assert!(!marker_mut(&mut map, b).moved());
    assert_eq!(marker_mut(&mut map, b).get_lat_lng(), b_before);
    assert_eq!(icon_position(&mut map, b), b_position);
}

#[test]
fn markers_track_view_changes() {
    let mut map = test_map();
    let index = marker_in(&mut map, 51.5, -0.09, false);

    // Recover the icon anchor from the mounted position
    let lat_lng = marker_mut(&mut map, index).get_lat_lng();
    let layer_point = map.viewport().lat_lng_to_layer_point(&lat_lng).round();
    let anchor = layer_point.subtract(&icon_position(&mut map, index));

    map.pan_by(Point::new(120.0, -60.0));
    let expected = map
        .viewport()
        .lat_lng_to_layer_point(&lat_lng)
        .round()
        .subtract(&anchor);
    assert_eq!(icon_position(&mut map, index), expected);

    map.set_view(LatLng::new(51.49, -0.1).unwrap(), 14.0);
    let expected = map
        .viewport()
        .lat_lng_to_layer_point(&lat_lng)
        .round()
        .subtract(&anchor);
    assert_eq!(icon_position(&mut map, index), expected);
}

#[test]
fn animated_zoom_uses_provisional_points_then_settles() {
    let mut map = test_map();
    let marker_index = marker_in(&mut map, 51.5, -0.09, false);

    let bounds = LatLngBounds::from_coords(51.48, -0.12, 51.52, -0.06).unwrap();
    let overlay = ObjectOverlay::new("https://example.com/radar.svg", bounds);
    let overlay_index = map.add_layer(Box::new(overlay)).unwrap();

    let target_center = LatLng::new(51.505, -0.09).unwrap();
    let lat_lng = marker_mut(&mut map, marker_index).get_lat_lng();
    let layer_point = map.viewport().lat_lng_to_layer_point(&lat_lng).round();
    let anchor = layer_point.subtract(&icon_position(&mut map, marker_index));

    let provisional = map
        .viewport()
        .lat_lng_to_new_layer_point(&lat_lng, 14.0, &target_center)
        .round()
        .subtract(&anchor);

    map.animate_zoom_frame(14.0, target_center);
    assert_eq!(icon_position(&mut map, marker_index), provisional);

    // The overlay scales rather than relaying out mid-animation
    {
        let overlay = map
            .layer_mut(overlay_index)
            .unwrap()
            .as_any_mut()
            .downcast_mut::<ObjectOverlay>()
            .unwrap();
        let transform = overlay.get_element().unwrap().transform().unwrap();
        assert_eq!(transform.scale, 2.0);
    }

    map.end_zoom(14.0, target_center);
    let settled = map
        .viewport()
        .lat_lng_to_layer_point(&lat_lng)
        .round()
        .subtract(&anchor);
    assert_eq!(icon_position(&mut map, marker_index), settled);

    let overlay = map
        .layer_mut(overlay_index)
        .unwrap()
        .as_any_mut()
        .downcast_mut::<ObjectOverlay>()
        .unwrap();
    assert!(overlay.get_element().unwrap().transform().is_none());
}

#[test]
fn overlay_rectangle_follows_bounds_corners() {
    let mut map = Map::new(
        LatLng::new(40.74, -74.17).unwrap(),
        12.0,
        Point::new(800.0, 600.0),
    );

    let bounds = LatLngBounds::from_coords(40.71, -74.22, 40.77, -74.12).unwrap();
    let index = map
        .add_layer(Box::new(ObjectOverlay::new(
            "https://example.com/radar.svg",
            bounds.clone(),
        )))
        .unwrap();

    let nw = map.viewport().lat_lng_to_layer_point(&bounds.north_west());
    let se = map.viewport().lat_lng_to_layer_point(&bounds.south_east());

    let overlay = map
        .layer_mut(index)
        .unwrap()
        .as_any_mut()
        .downcast_mut::<ObjectOverlay>()
        .unwrap();
    let element = overlay.get_element().unwrap();
    assert_eq!(element.position(), nw);
    assert_eq!(element.size(), Some(se.subtract(&nw)));
}

#[test]
fn icon_swap_keeps_marker_mounted_and_draggable() {
    let ctx = MapContext::new(Viewport::new(
        LatLng::new(51.505, -0.09).unwrap(),
        13.0,
        Point::new(800.0, 600.0),
    ));
    let mut marker = Marker::new(LatLng::new(51.5, -0.09).unwrap()).draggable(true);
    marker.mount(&ctx).unwrap();

    let old_element = marker.get_element().unwrap().clone();
    marker.set_icon(Box::new(HtmlIcon::new("<span>here</span>")), &ctx);

    assert!(marker.is_mounted());
    assert!(marker.is_draggable());
    let new_element = marker.get_element().unwrap().clone();
    assert_ne!(new_element, old_element);
    assert!(!old_element.is_attached());
    assert!(new_element.is_attached());
}

#[test]
fn removing_a_layer_unmounts_it() {
    let mut map = test_map();
    let index = marker_in(&mut map, 51.5, -0.09, false);
    assert_eq!(map.layer_count(), 1);

    let layer = map.remove_layer(index).unwrap();
    assert!(!layer.is_mounted());
    assert_eq!(map.layer_count(), 0);
}

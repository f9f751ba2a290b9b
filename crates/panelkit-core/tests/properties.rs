//! Algebraic properties of snapping, selection bounds and attribute strings.

use kurbo::{Point, Rect, Size};
use panelkit_core::attributes::FontDesc;
use panelkit_core::registry::CONTAINER_CLASS;
use panelkit_core::snap::snapped_delta;
use panelkit_core::{
    EditController, EditorConfig, ResourceCatalog, Rgba, UiAttributes, ViewRegistry, snap_to_grid,
};
use std::sync::Arc;

#[test]
fn test_snapping_is_idempotent() {
    let points = [
        Point::new(0.0, 0.0),
        Point::new(3.2, 7.9),
        Point::new(103.0, 107.0),
        Point::new(-14.5, 22.0),
        Point::new(999.99, 0.01),
    ];
    for grid in [1, 2, 5, 10, 16] {
        for p in points {
            let once = snap_to_grid(p, grid);
            assert_eq!(snap_to_grid(once, grid), once, "grid {} point {:?}", grid, p);
        }
    }
}

#[test]
fn test_snapped_delta_uses_grid_positions() {
    let delta = snapped_delta(Point::new(103.0, 107.0), Point::new(118.0, 122.0), 10);
    assert_eq!((delta.x, delta.y), (10.0, 20.0));
}

#[test]
fn test_selection_bounds_cover_member_frames() {
    let mut ed = EditController::with_root(
        Arc::new(ViewRegistry::with_builtins()),
        CONTAINER_CLASS,
        Size::new(400.0, 300.0),
        EditorConfig::default(),
    )
    .unwrap();
    let group = ed.create_new_view(CONTAINER_CLASS, Point::new(200.0, 100.0)).unwrap();
    let inner = ed.create_new_view("View", Point::new(220.0, 130.0)).unwrap();
    let outer = ed.create_new_view("View", Point::new(30.0, 40.0)).unwrap();
    assert_eq!(ed.tree().parent(inner), Some(group));

    ed.select_all();
    let mut selection = ed.selection().clone();
    selection.add(inner);
    let expected = [group, inner, outer]
        .iter()
        .filter_map(|&id| ed.tree().global_frame(id))
        .fold(None::<Rect>, |acc, r| Some(acc.map_or(r, |a| a.union(r))));
    assert_eq!(selection.bounds(ed.tree()), expected);
    assert_eq!(expected, Some(Rect::new(30.0, 40.0, 270.0, 180.0)));
}

#[test]
fn test_every_builtin_attribute_reads_back_what_it_applies() {
    let registry = ViewRegistry::with_builtins();
    let mut catalog = ResourceCatalog::new();
    catalog.define_color("accent", Rgba::new(200, 40, 40, 255));
    catalog.define_font(
        "caption",
        FontDesc {
            family: "Inter".into(),
            size: 11.0,
            bold: true,
            italic: false,
        },
    );
    catalog.define_tag("cutoff", 7);

    let samples = UiAttributes::new()
        .with("origin", "12, 34")
        .with("size", "80, 24")
        .with("opacity", "0.5")
        .with("font", "caption")
        .with("font-color", "accent")
        .with("back-color", "#102030")
        .with("control-tag", "cutoff")
        .with("title", "Cutoff")
        .with("text-alignment", "left");

    for class in registry.class_names() {
        let node = registry.create(class, &samples, &catalog).unwrap();
        for (name, _) in registry.inspect(&node) {
            let Some(value) = registry.read(&node, name, &catalog) else {
                continue;
            };
            let mut copy = node.clone();
            assert!(registry.apply(&mut copy, &UiAttributes::new().with(name, value.as_str()), &catalog));
            assert_eq!(
                registry.read(&copy, name, &catalog).as_deref(),
                Some(value.as_str()),
                "{}.{}",
                class,
                name
            );
        }
    }
}

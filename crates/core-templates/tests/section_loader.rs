//! Round-trip the section-template loader through a real DXF file.

use core_templates::{SectionTemplateError, load_section_template};
use dxf::entities::{Circle, Entity, EntityType, Line, MText};
use dxf::{Drawing, LwPolylineVertex, Point};

fn entity_on_layer(layer: &str, specific: EntityType) -> Entity {
    let mut entity = Entity::new(specific);
    entity.common.layer = layer.to_string();
    entity
}

fn write_template(path: &std::path::Path) {
    let mut drawing = Drawing::new();

    let mut outline = dxf::entities::LwPolyline::default();
    outline.vertices = vec![
        LwPolylineVertex {
            x: 0.0,
            y: 0.0,
            ..Default::default()
        },
        LwPolylineVertex {
            x: 30.0,
            y: 0.0,
            ..Default::default()
        },
        LwPolylineVertex {
            x: 30.0,
            y: 45.0,
            ..Default::default()
        },
        LwPolylineVertex {
            x: 0.0,
            y: 45.0,
            ..Default::default()
        },
    ];
    outline.set_is_closed(true);
    drawing.add_entity(entity_on_layer("SECTION", EntityType::LwPolyline(outline)));

    drawing.add_entity(entity_on_layer(
        "SECTION",
        EntityType::Line(Line {
            p1: Point::new(0.0, 22.5, 0.0),
            p2: Point::new(30.0, 22.5, 0.0),
            ..Default::default()
        }),
    ));

    drawing.add_entity(entity_on_layer(
        "BARS",
        EntityType::Circle(Circle {
            center: Point::new(5.0, 5.0, 0.0),
            radius: 1.2,
            ..Default::default()
        }),
    ));

    drawing.add_entity(entity_on_layer(
        "LABELS",
        EntityType::MText(MText {
            text: "{{BASE_VIGA}}".to_string(),
            insertion_point: Point::new(15.0, -5.0, 0.0),
            initial_text_height: 3.0,
            ..Default::default()
        }),
    ));
    drawing.add_entity(entity_on_layer(
        "LABELS",
        EntityType::MText(MText {
            text: "Nota fija".to_string(),
            insertion_point: Point::new(15.0, -10.0, 0.0),
            initial_text_height: 3.0,
            ..Default::default()
        }),
    ));

    drawing
        .save_file(path.to_str().unwrap())
        .expect("write template dxf");
}

#[test]
fn loads_polylines_circles_and_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("section_template.dxf");
    write_template(&path);

    let template = load_section_template(&path).unwrap();

    // Outline + line + sampled circle.
    assert_eq!(template.polylines.len(), 3);
    let circle = template
        .polylines
        .iter()
        .find(|poly| poly.points.len() == 49)
        .expect("sampled circle");
    assert!(circle.closed);

    assert_eq!(template.texts.len(), 2);
    assert_eq!(template.placeholder_keys(), vec!["BASE_VIGA"]);

    // Bounding box spans every vertex and text insert.
    assert_eq!(template.min_x, 0.0);
    assert_eq!(template.max_x, 30.0);
    assert!(template.min_y <= -10.0);
    assert_eq!(template.max_y, 45.0);
    assert!(template.width() > 0.0 && template.height() > 0.0);
}

#[test]
fn empty_drawing_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.dxf");
    Drawing::new().save_file(path.to_str().unwrap()).unwrap();

    match load_section_template(&path) {
        Err(SectionTemplateError::Empty) => {}
        other => panic!("expected Empty error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_unreadable() {
    let result = load_section_template(std::path::Path::new("/nonexistent/section.dxf"));
    assert!(matches!(
        result,
        Err(SectionTemplateError::Unreadable { .. })
    ));
}

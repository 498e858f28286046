//! Coordinate conversions and primitive point helpers.
//!
//! Beam coordinates arrive in meters; every drawing coordinate is produced
//! in target units (millimeters for the default profile) rounded to the
//! unit profile's precision.

use crate::document::Point;
use core_templates::DrawingUnits;

pub const DEFAULT_TOLERANCE: f64 = 1e-3;

pub fn to_drawing_units(value_m: f64, units: &DrawingUnits) -> f64 {
    let factor = 10f64.powi(units.precision as i32);
    (value_m * units.scale_factor * factor).round() / factor
}

pub fn cm_to_drawing_units(value_cm: f64, units: &DrawingUnits) -> f64 {
    to_drawing_units(value_cm / 100.0, units)
}

/// Closed rectangle outline (5 points, first repeated).
pub fn rectangle(origin: Point, width: f64, height: f64) -> Vec<Point> {
    let (x, y) = origin;
    vec![
        (x, y),
        (x + width, y),
        (x + width, y + height),
        (x, y + height),
        (x, y),
    ]
}

/// Quarter-circle arc sampled into `segments` chords.
pub fn arc_points(center: Point, radius: f64, start_deg: f64, end_deg: f64, segments: usize) -> Vec<Point> {
    let (cx, cy) = center;
    let step = (end_deg - start_deg) / segments as f64;
    (0..=segments)
        .map(|index| {
            let angle = (start_deg + step * index as f64).to_radians();
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Rounded-corner rectangle outline. The radius is clamped to half the
/// shorter side; a zero radius degenerates to the plain rectangle.
pub fn rounded_rect_points(
    x_min: f64,
    y_min: f64,
    width: f64,
    height: f64,
    radius: f64,
) -> Vec<Point> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let x_max = x_min + width;
    let y_max = y_min + height;
    let radius = radius.clamp(0.0, (width / 2.0).min(height / 2.0));

    if radius == 0.0 {
        return vec![(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)];
    }

    let segments = 4;
    let mut points = vec![(x_min + radius, y_min), (x_max - radius, y_min)];
    points.extend(
        arc_points((x_max - radius, y_min + radius), radius, 270.0, 360.0, segments)
            .into_iter()
            .skip(1),
    );
    points.push((x_max, y_max - radius));
    points.extend(
        arc_points((x_max - radius, y_max - radius), radius, 0.0, 90.0, segments)
            .into_iter()
            .skip(1),
    );
    points.push((x_min + radius, y_max));
    points.extend(
        arc_points((x_min + radius, y_max - radius), radius, 90.0, 180.0, segments)
            .into_iter()
            .skip(1),
    );
    points.push((x_min, y_min + radius));
    points.extend(
        arc_points((x_min + radius, y_min + radius), radius, 180.0, 270.0, segments)
            .into_iter()
            .skip(1),
    );
    points
}

/// Origin-anchored mapping from beam meters to document units.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSpace {
    pub units: DrawingUnits,
    pub origin: Point,
}

impl CoordinateSpace {
    pub fn new(units: DrawingUnits) -> Self {
        Self {
            units,
            origin: (0.0, 0.0),
        }
    }

    pub fn from_m(&self, value_m: f64) -> f64 {
        to_drawing_units(value_m, &self.units)
    }

    pub fn from_cm(&self, value_cm: f64) -> f64 {
        cm_to_drawing_units(value_cm, &self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rounds_to_profile_precision() {
        let units = DrawingUnits::default();
        assert_eq!(to_drawing_units(4.6, &units), 4600.0);
        assert_eq!(to_drawing_units(0.12345, &units), 123.45);
        assert_eq!(cm_to_drawing_units(45.0, &units), 450.0);
    }

    #[test]
    fn rectangle_closes_on_itself() {
        let points = rectangle((10.0, 20.0), 100.0, 50.0);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], *points.last().unwrap());
    }

    #[test]
    fn rounded_rect_degenerates_without_radius() {
        let points = rounded_rect_points(0.0, 0.0, 100.0, 50.0, 0.0);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn rounded_rect_clamps_radius() {
        let points = rounded_rect_points(0.0, 0.0, 100.0, 20.0, 50.0);
        // Radius clamps to 10; the outline stays inside the box.
        for (x, y) in points {
            assert!(x >= -1e-9 && x <= 100.0 + 1e-9);
            assert!(y >= -1e-9 && y <= 20.0 + 1e-9);
        }
    }
}

use serde::Serialize;
use std::f64::consts::PI;
use thiserror::Error;

pub const DEGREES_TO_RADIANS: f64 = PI / 180.0;
pub const RADIANS_TO_DEGREES: f64 = 180.0 / PI;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` around `self`, `angle_degrees` clockwise from east
    /// (screen coordinates, y grows downwards).
    pub fn on_circle(&self, radius: f64, angle_degrees: f64) -> Self {
        let angle = angle_degrees * DEGREES_TO_RADIANS;
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("primary circle radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
    #[error("container has no usable area ({width}x{height})")]
    EmptyBounds { width: f64, height: f64 },
}

pub fn degrees_to_arc_length(angle_degrees: f64, radius: f64) -> f64 {
    radius * (angle_degrees * DEGREES_TO_RADIANS)
}

pub fn arc_length_to_degrees(arc_length: f64, radius: f64) -> f64 {
    (arc_length / radius) * RADIANS_TO_DEGREES
}

/// Arc length a circle of `auxiliary_radius` reserves when centred on the rim of a circle of
/// `primary_radius`.
///
/// The final multiplication uses the auxiliary radius, not the primary one. Marker spacing
/// is tuned against this exact curve, so it is kept as is.
///
/// The cosine is clamped to `[-1, 1]` before `acos`; a NaN cosine (both radii zero) counts
/// as fully clamped. For any non-negative finite radii the result is finite and non-negative.
pub fn arc_length_occupied_by_circle_on_circle(primary_radius: f64, auxiliary_radius: f64) -> f64 {
    let aux_sq = auxiliary_radius.powi(2);
    let cos_theta = (2.0 * aux_sq - primary_radius.powi(2)) / (2.0 * aux_sq);

    let cos_theta = if cos_theta.is_nan() {
        -1.0
    } else {
        cos_theta.clamp(-1.0, 1.0)
    };

    let theta = (cos_theta / 2.0).acos();
    auxiliary_radius * theta
}

/// The large circle markers are arranged on. Only constructible with a usable radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimaryCircle {
    center: Point,
    radius: f64,
}

impl PrimaryCircle {
    pub fn new(center: Point, radius: f64) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// Rim point at `theta` degrees.
    pub fn point_at(&self, theta: f64) -> Point {
        self.center.on_circle(self.radius, theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_arc_length_round_trip() {
        let radii = [0.5, 1.0, 150.0, -42.0, 1e6];
        let angles = [-720.0, -90.0, 0.0, 12.5, 45.0, 180.0, 359.9, 1080.0];

        for r in radii {
            for theta in angles {
                let back = arc_length_to_degrees(degrees_to_arc_length(theta, r), r);
                assert_close!(back, theta, 1e-9);
            }
        }
    }

    #[test]
    fn test_known_arc_lengths() {
        assert_close!(degrees_to_arc_length(180.0, 1.0), PI);
        assert_close!(degrees_to_arc_length(360.0, 150.0), 300.0 * PI);
        assert_close!(arc_length_to_degrees(PI / 2.0, 1.0), 90.0);
    }

    #[test]
    fn test_zero_radius_arc_to_degrees_is_not_finite() {
        assert!(!arc_length_to_degrees(10.0, 0.0).is_finite());
    }

    #[test]
    fn test_occupancy_is_finite_and_non_negative() {
        let primaries = [1e-6, 0.1, 1.0, 75.0, 150.0, 1e6];
        let auxiliaries = [0.0, 1e-9, 1e-3, 0.5, 20.0, 60.0, 150.0, 1e5];

        for big_r in primaries {
            for r in auxiliaries {
                let arc = arc_length_occupied_by_circle_on_circle(big_r, r);
                assert!(arc.is_finite(), "R={} r={} gave {}", big_r, r, arc);
                assert!(arc >= 0.0, "R={} r={} gave {}", big_r, r, arc);
            }
        }
        assert_eq!(arc_length_occupied_by_circle_on_circle(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_occupancy_monotonic_where_unclamped() {
        // the unclamped curve dips slightly just above R/2, then rises for good
        let big_r = 150.0;
        let mut previous = 0.0;
        let mut r = big_r * 0.6;
        while r < big_r * 5.0 {
            let arc = arc_length_occupied_by_circle_on_circle(big_r, r);
            assert!(arc >= previous, "decreased at r={}", r);
            previous = arc;
            r += 0.5;
        }
    }

    #[test]
    fn test_occupancy_saturated_clamp_is_linear() {
        // below R/2 the cosine saturates at -1 and theta is acos(-1/2)
        let big_r = 150.0;
        for r in [1.0, 20.0, 40.0, 60.0, 74.0] {
            assert_close!(
                arc_length_occupied_by_circle_on_circle(big_r, r),
                r * 2.0 * PI / 3.0
            );
        }
    }

    #[test]
    fn test_primary_circle_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(PrimaryCircle::new(Point::default(), radius).is_err());
        }
        let circle = PrimaryCircle::new(Point::new(10.0, 10.0), 5.0).unwrap();
        assert_close!(circle.circumference(), 10.0 * PI);
    }

    #[test]
    fn test_point_at_is_clockwise_from_east() {
        let circle = PrimaryCircle::new(Point::new(0.0, 0.0), 10.0).unwrap();
        let east = circle.point_at(0.0);
        let south = circle.point_at(90.0);
        assert_close!(east.x, 10.0);
        assert_close!(east.y, 0.0);
        assert_close!(south.x, 0.0);
        assert_close!(south.y, 10.0);
    }
}

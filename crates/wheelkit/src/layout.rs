use crate::easing::Easing;
use crate::geometry::{
    GeometryError, Point, PrimaryCircle, arc_length_occupied_by_circle_on_circle,
    arc_length_to_degrees, degrees_to_arc_length,
};
use crate::scroll::ScrollProgress;
use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// Unscaled marker diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    /// Pixels.
    Fixed(f64),
    /// Fraction of the primary circle's diameter.
    Relative(f64),
}

impl MarkerSize {
    pub const DEFAULT_RATIO: f64 = 40.0 / 328.0;

    pub fn resolve(&self, primary_diameter: f64) -> f64 {
        match *self {
            Self::Fixed(px) => px,
            Self::Relative(ratio) => ratio * primary_diameter,
        }
    }
}

impl Default for MarkerSize {
    fn default() -> Self {
        Self::Relative(Self::DEFAULT_RATIO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelParams {
    pub marker_size: MarkerSize,
    pub scale_min: f64,
    pub scale_max: f64,
    /// Arc length left empty between neighbouring markers.
    pub spacing: f64,
    /// Angle, in degrees, the whole arrangement is centred on.
    pub gravity_angle: f64,
}

impl Default for WheelParams {
    fn default() -> Self {
        Self {
            marker_size: MarkerSize::default(),
            scale_min: 1.0,
            scale_max: 3.0,
            spacing: 50.0,
            gravity_angle: 0.0,
        }
    }
}

impl WheelParams {
    /// Room kept free around the primary circle so a fully scaled marker is never clipped.
    pub fn margin(&self, base_size: f64) -> f64 {
        base_size * self.scale_max / 2.0
    }

    /// Fits the primary circle into a `width` x `height` container.
    ///
    /// The circle is sized from the height alone, right aligned and vertically centred,
    /// with a margin on the top, right and bottom edges. A narrow container clips the left
    /// part of the circle instead of shrinking it. With a relative marker size the margin
    /// depends on the diameter itself: `d = H - 2m` and `m = k * d * scale_max / 2` give
    /// `d = H / (1 + k * scale_max)`.
    pub fn fit_primary_circle(
        &self,
        width: f64,
        height: f64,
    ) -> Result<PrimaryCircle, GeometryError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::EmptyBounds { width, height });
        }

        let diameter = match self.marker_size {
            MarkerSize::Fixed(px) => height - 2.0 * self.margin(px),
            MarkerSize::Relative(ratio) => height / (1.0 + ratio * self.scale_max),
        };

        let margin = self.margin(self.marker_size.resolve(diameter));
        let radius = diameter / 2.0;
        let center = Point::new(width - margin - radius, height / 2.0);

        PrimaryCircle::new(center, radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub index: usize,
    /// Scroll progress at which this slide is centred.
    pub progress: f64,
    pub scale: f64,
    /// Scaled diameter.
    pub size: f64,
    /// Arc reserved on the primary circle.
    pub arc_length: f64,
    /// Eased closeness to the scroll position, 1 when centred.
    pub focus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deref)]
pub struct PositionedCircle {
    #[deref]
    #[serde(flatten)]
    pub circle: Circle,
    /// Cumulative arc position of the marker centre.
    pub position: f64,
    /// Rotation in degrees placing the marker on the rim.
    pub theta: f64,
}

pub fn slide_progress(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index as f64 / (count - 1) as f64
}

pub fn scale_circles(
    params: &WheelParams,
    easing: &impl Easing,
    primary: &PrimaryCircle,
    count: usize,
    scroll: ScrollProgress,
) -> Vec<Circle> {
    let base_size = params.marker_size.resolve(primary.diameter());
    let scale_range = params.scale_max - params.scale_min;

    (0..count)
        .map(|index| {
            let progress = slide_progress(index, count);
            let scale_progress = 1.0 - (progress - scroll.get()).abs();
            let focus = easing.ease(scale_progress);
            let scale = params.scale_min + focus * scale_range;
            let size = base_size * scale;
            let arc_length = arc_length_occupied_by_circle_on_circle(primary.radius(), size / 2.0);

            Circle {
                index,
                progress,
                scale,
                size,
                arc_length,
                focus,
            }
        })
        .collect()
}

pub fn total_arc_length(circles: &[Circle], spacing: f64) -> f64 {
    let occupied: f64 = circles.iter().map(|c| c.arc_length).sum();
    occupied + spacing * (circles.len() + 1) as f64
}

/// Lays markers end to end, half a gap of padding on either side of each, with the whole
/// span centred on `gravity_angle`.
pub fn position_circles(
    circles: &[Circle],
    primary_radius: f64,
    spacing: f64,
    gravity_angle: f64,
) -> Vec<PositionedCircle> {
    let total = total_arc_length(circles, spacing);
    let mut cursor = -total / 2.0 + degrees_to_arc_length(gravity_angle, primary_radius);
    cursor += spacing / 2.0;

    circles
        .iter()
        .map(|&circle| {
            cursor += spacing / 2.0 + circle.arc_length / 2.0;
            let position = cursor;
            cursor += circle.arc_length / 2.0 + spacing / 2.0;

            PositionedCircle {
                circle,
                position,
                theta: arc_length_to_degrees(position, primary_radius),
            }
        })
        .collect()
}

/// Scale and position engine for one wheel.
#[derive(Debug, Clone)]
pub struct WheelLayout<E> {
    pub params: WheelParams,
    pub easing: E,
}

impl<E: Easing> WheelLayout<E> {
    pub fn new(params: WheelParams, easing: E) -> Self {
        Self { params, easing }
    }

    pub fn layout(
        &self,
        primary: &PrimaryCircle,
        count: usize,
        scroll: ScrollProgress,
    ) -> Vec<PositionedCircle> {
        let circles = scale_circles(&self.params, &self.easing, primary, count, scroll);
        let positioned = position_circles(
            &circles,
            primary.radius(),
            self.params.spacing,
            self.params.gravity_angle,
        );

        let reserved = total_arc_length(&circles, self.params.spacing);
        if reserved > primary.circumference() {
            log::debug!(
                "markers reserve {:.1} of {:.1} available arc; neighbours will overlap",
                reserved,
                primary.circumference()
            );
        }

        positioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::CubicBezier;

    fn scenario_params() -> WheelParams {
        WheelParams {
            marker_size: MarkerSize::Fixed(40.0),
            scale_min: 1.0,
            scale_max: 3.0,
            spacing: 50.0,
            gravity_angle: 0.0,
        }
    }

    fn scenario_circle() -> PrimaryCircle {
        PrimaryCircle::new(Point::new(150.0, 150.0), 150.0).unwrap()
    }

    #[test]
    fn test_seven_slides_focused_on_middle() {
        let layout = WheelLayout::new(scenario_params(), CubicBezier::wheel_scale());
        let circles = layout.layout(&scenario_circle(), 7, ScrollProgress::new(3.0 / 6.0));

        assert_eq!(circles.len(), 7);
        assert_eq!(circles[3].scale, 3.0);
        assert_eq!(circles[0].scale, circles[6].scale);
        assert_close!(circles[1].scale, circles[5].scale, 1e-9);
        assert!(circles[3].scale > circles[2].scale);

        for pair in circles.windows(2) {
            assert!(pair[1].theta > pair[0].theta);
            assert!(pair[1].position > pair[0].position);
        }

        // symmetric arrangement around the gravity angle
        assert_close!(circles[3].theta, 0.0, 1e-9);
        assert_close!(circles[0].theta, -circles[6].theta, 1e-9);
    }

    #[test]
    fn test_layout_preserves_order_and_count() {
        let layout = WheelLayout::new(scenario_params(), CubicBezier::wheel_scale());
        for count in [1, 2, 5, 14] {
            for scroll in [-0.3, 0.0, 0.42, 1.0, 1.2] {
                let circles = layout.layout(&scenario_circle(), count, ScrollProgress::new(scroll));
                assert_eq!(circles.len(), count);
                for (i, circle) in circles.iter().enumerate() {
                    assert_eq!(circle.index, i);
                    assert!(circle.theta.is_finite());
                }
                for pair in circles.windows(2) {
                    assert!(pair[1].position > pair[0].position);
                }
            }
        }
    }

    #[test]
    fn test_focused_slide_reaches_scale_max() {
        let layout = WheelLayout::new(scenario_params(), CubicBezier::wheel_scale());
        let count = 9;
        for focused in 0..count {
            let scroll = ScrollProgress::new(slide_progress(focused, count));
            let circles = layout.layout(&scenario_circle(), count, scroll);
            assert_eq!(circles[focused].scale, 3.0);
            assert_eq!(circles[focused].focus, 1.0);
        }
    }

    #[test]
    fn test_single_slide_is_defined() {
        assert_eq!(slide_progress(0, 1), 0.0);
        assert_eq!(slide_progress(0, 0), 0.0);

        let layout = WheelLayout::new(scenario_params(), CubicBezier::wheel_scale());
        let circles = layout.layout(&scenario_circle(), 1, ScrollProgress::new(0.0));
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].progress, 0.0);
        assert_eq!(circles[0].scale, 3.0);
        assert_close!(circles[0].theta, 0.0);
    }

    #[test]
    fn test_no_slides_yields_empty_layout() {
        let layout = WheelLayout::new(scenario_params(), CubicBezier::wheel_scale());
        assert!(layout.layout(&scenario_circle(), 0, ScrollProgress::default()).is_empty());
    }

    #[test]
    fn test_gravity_angle_rotates_arrangement() {
        let mut params = scenario_params();
        params.gravity_angle = 90.0;
        let layout = WheelLayout::new(params, CubicBezier::wheel_scale());
        let circles = layout.layout(&scenario_circle(), 7, ScrollProgress::new(0.5));
        assert_close!(circles[3].theta, 90.0, 1e-9);
    }

    #[test]
    fn test_reserved_arc_matches_spacing_formula() {
        let params = scenario_params();
        let circles = scale_circles(
            &params,
            &CubicBezier::wheel_scale(),
            &scenario_circle(),
            7,
            ScrollProgress::new(0.5),
        );
        let occupied: f64 = circles.iter().map(|c| c.arc_length).sum();
        assert_close!(total_arc_length(&circles, 50.0), occupied + 400.0);

        // first marker centre sits one full gap plus half its arc from the start
        let positioned = position_circles(&circles, 150.0, 50.0, 0.0);
        let start = -total_arc_length(&circles, 50.0) / 2.0;
        assert_close!(positioned[0].position, start + 50.0 + circles[0].arc_length / 2.0);
    }

    #[test]
    fn test_closure_easing_is_accepted() {
        let layout = WheelLayout::new(scenario_params(), |t: f64| t.clamp(0.0, 1.0));
        let circles = layout.layout(&scenario_circle(), 3, ScrollProgress::new(0.0));
        assert_close!(circles[0].scale, 3.0);
        assert_close!(circles[1].scale, 2.0);
        assert_close!(circles[2].scale, 1.0);
    }

    #[test]
    fn test_fit_relative_marker_size() {
        let params = WheelParams::default();
        let circle = params.fit_primary_circle(576.0, 448.0).unwrap();

        let base = MarkerSize::DEFAULT_RATIO * circle.diameter();
        let margin = params.margin(base);
        assert_close!(circle.diameter() + 2.0 * margin, 448.0, 1e-9);
        assert_close!(circle.center().y, 224.0);
        assert_close!(circle.center().x + circle.radius() + margin, 576.0, 1e-9);
    }

    #[test]
    fn test_fit_ignores_narrow_width() {
        let params = scenario_params();
        let circle = params.fit_primary_circle(200.0, 1000.0).unwrap();
        // only the top and bottom margins of 60 constrain the diameter
        assert_close!(circle.diameter(), 880.0);
        // still right aligned, the left part falls outside the container
        assert_close!(circle.center().x + circle.radius() + 60.0, 200.0);
        assert!(circle.center().x - circle.radius() < 0.0);
    }

    #[test]
    fn test_default_wheel_fits_its_circumference() {
        // default window: a third of 576px for the wheel column
        let params = WheelParams::default();
        let primary = params.fit_primary_circle(192.0, 448.0).unwrap();
        assert_close!(primary.radius(), 164.0, 1e-9);

        let layout = WheelLayout::new(params, CubicBezier::wheel_scale());
        for step in -20..=120 {
            let scroll = ScrollProgress::new(step as f64 / 100.0);
            let circles = scale_circles(&layout.params, &layout.easing, &primary, 7, scroll);
            let reserved = total_arc_length(&circles, params.spacing);
            assert!(
                reserved <= primary.circumference(),
                "scroll {} reserves {} of {}",
                scroll,
                reserved,
                primary.circumference()
            );

            let positioned = layout.layout(&primary, 7, scroll);
            let span = positioned[6].theta - positioned[0].theta;
            assert!(span < 360.0, "first and last markers wrap at scroll {}", scroll);
        }
    }

    #[test]
    fn test_fit_rejects_empty_container() {
        let params = scenario_params();
        assert_eq!(
            params.fit_primary_circle(0.0, 100.0),
            Err(GeometryError::EmptyBounds {
                width: 0.0,
                height: 100.0
            })
        );
        // 100px tall cannot hold two 60px margins
        assert!(matches!(
            params.fit_primary_circle(500.0, 100.0),
            Err(GeometryError::InvalidRadius(_))
        ));
    }
}

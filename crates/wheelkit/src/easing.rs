//! Easing curves used to shape marker scale and snap motion.
//!
//! Anything implementing [`Easing`] can be handed to the layout engine, including plain
//! closures and `fn(f64) -> f64` items.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub trait Easing {
    /// Maps `t` in `[0, 1]` onto eased progress, usually also in `[0, 1]`.
    fn ease(&self, t: f64) -> f64;
}

impl<F> Easing for F
where
    F: Fn(f64) -> f64,
{
    fn ease(&self, t: f64) -> f64 {
        self(t)
    }
}

pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Error, PartialEq)]
pub enum EasingError {
    #[error("bezier x control points must lie in [0, 1], got x1={x1} x2={x2}")]
    ControlPointOutOfRange { x1: f64, x2: f64 },
    #[error("bezier control points must be finite")]
    NonFinite,
}

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;
const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    samples: [f64; SPLINE_TABLE_SIZE],
}

impl CubicBezier {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, EasingError> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(EasingError::NonFinite);
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EasingError::ControlPointOutOfRange { x1, x2 });
        }
        Ok(Self::build(x1, y1, x2, y2))
    }

    /// Slow start with a late, steep rise: markers only swell when their slide is close.
    pub fn wheel_scale() -> Self {
        Self::build(1.0, 0.0, 0.8, 0.8)
    }

    pub fn control_points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    fn build(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut samples = [0.0; SPLINE_TABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = calc_bezier(i as f64 * SAMPLE_STEP_SIZE, x1, x2);
        }
        Self {
            x1,
            y1,
            x2,
            y2,
            samples,
        }
    }

    fn is_linear(&self) -> bool {
        self.x1 == self.y1 && self.x2 == self.y2
    }

    fn t_for_x(&self, x: f64) -> f64 {
        let last_sample = SPLINE_TABLE_SIZE - 1;
        let mut interval_start = 0.0;
        let mut current = 1;

        while current != last_sample && self.samples[current] <= x {
            interval_start += SAMPLE_STEP_SIZE;
            current += 1;
        }
        current -= 1;

        let dist = (x - self.samples[current]) / (self.samples[current + 1] - self.samples[current]);
        let guess = if dist.is_finite() {
            interval_start + dist * SAMPLE_STEP_SIZE
        } else {
            interval_start
        };

        let initial_slope = slope(guess, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            newton_raphson(x, guess, self.x1, self.x2)
        } else if initial_slope == 0.0 {
            guess
        } else {
            binary_subdivide(
                x,
                interval_start,
                interval_start + SAMPLE_STEP_SIZE,
                self.x1,
                self.x2,
            )
        }
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::wheel_scale()
    }
}

impl Easing for CubicBezier {
    fn ease(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self.is_linear() {
            return t;
        }
        // exact endpoints, so a fully focused marker hits scale_max precisely
        if t == 0.0 || t == 1.0 {
            return t;
        }
        calc_bezier(self.t_for_x(t), self.y1, self.y2)
    }
}

impl TryFrom<[f64; 4]> for CubicBezier {
    type Error = EasingError;

    fn try_from([x1, y1, x2, y2]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<CubicBezier> for [f64; 4] {
    fn from(curve: CubicBezier) -> Self {
        curve.control_points()
    }
}

fn coeff_a(a1: f64, a2: f64) -> f64 {
    1.0 - 3.0 * a2 + 3.0 * a1
}

fn coeff_b(a1: f64, a2: f64) -> f64 {
    3.0 * a2 - 6.0 * a1
}

fn coeff_c(a1: f64) -> f64 {
    3.0 * a1
}

fn calc_bezier(t: f64, a1: f64, a2: f64) -> f64 {
    ((coeff_a(a1, a2) * t + coeff_b(a1, a2)) * t + coeff_c(a1)) * t
}

fn slope(t: f64, a1: f64, a2: f64) -> f64 {
    3.0 * coeff_a(a1, a2) * t * t + 2.0 * coeff_b(a1, a2) * t + coeff_c(a1)
}

fn newton_raphson(x: f64, mut guess: f64, x1: f64, x2: f64) -> f64 {
    for _ in 0..NEWTON_ITERATIONS {
        let current_slope = slope(guess, x1, x2);
        if current_slope == 0.0 {
            return guess;
        }
        let current_x = calc_bezier(guess, x1, x2) - x;
        guess -= current_x / current_slope;
    }
    guess
}

fn binary_subdivide(x: f64, mut a: f64, mut b: f64, x1: f64, x2: f64) -> f64 {
    let mut t = a;
    for _ in 0..SUBDIVISION_MAX_ITERATIONS {
        t = a + (b - a) / 2.0;
        let current_x = calc_bezier(t, x1, x2) - x;
        if current_x.abs() <= SUBDIVISION_PRECISION {
            break;
        }
        if current_x > 0.0 {
            b = t;
        } else {
            a = t;
        }
    }
    t
}

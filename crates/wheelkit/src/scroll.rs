use crate::easing::Easing;
use crate::layout::slide_progress;
use derive_more::{Display, Into};
use serde::Serialize;
use std::time::Duration;

/// How far the slide viewport has advanced, 0 at the first slide and 1 at the last.
///
/// Drag overshoot may carry it past either end; non-finite values collapse to 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Into, Serialize)]
#[serde(transparent)]
pub struct ScrollProgress(f64);

crate::impl_float_newtype!(ScrollProgress);

impl ScrollProgress {
    pub fn new(progress: f64) -> Self {
        Self(if progress.is_finite() { progress } else { 0.0 })
    }

    /// Progress of a scrollable range, in the shape of a GTK adjustment.
    pub fn from_offsets(value: f64, lower: f64, upper: f64, page_size: f64) -> Self {
        let range = upper - lower - page_size;
        if !range.is_finite() || range <= 0.0 {
            return Self::default();
        }
        Self::new((value - lower) / range)
    }

    /// Inverse of [`ScrollProgress::from_offsets`].
    pub fn offset(&self, lower: f64, upper: f64, page_size: f64) -> f64 {
        let range = (upper - lower - page_size).max(0.0);
        lower + self.0 * range
    }
}

impl From<f64> for ScrollProgress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Index of the slide closest to `progress`, and the progress at which it rests.
pub fn nearest_snap(progress: ScrollProgress, count: usize) -> (usize, ScrollProgress) {
    if count <= 1 {
        return (0, ScrollProgress::default());
    }
    let last = count - 1;
    let index = (progress.get().clamp(0.0, 1.0) * last as f64).round() as usize;
    let index = index.min(last);
    (index, ScrollProgress::new(slide_progress(index, count)))
}

/// Eased interpolation between two scroll offsets.
#[derive(Debug, Clone)]
pub struct SnapAnimation<E> {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: E,
}

impl<E: Easing> SnapAnimation<E> {
    pub fn new(from: f64, to: f64, duration: Duration, easing: E) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.ease(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::ease_out_cubic;

    #[test]
    fn test_progress_from_adjustment_offsets() {
        // six pages of 400px in a 400px viewport
        let progress = ScrollProgress::from_offsets(1000.0, 0.0, 2800.0, 400.0);
        assert_close!(progress.get(), 1000.0 / 2400.0);
        assert_close!(progress.offset(0.0, 2800.0, 400.0), 1000.0);
    }

    #[test]
    fn test_progress_without_scroll_range_is_zero() {
        assert_eq!(ScrollProgress::from_offsets(0.0, 0.0, 400.0, 400.0).get(), 0.0);
        assert_eq!(ScrollProgress::from_offsets(10.0, 0.0, 0.0, 0.0).get(), 0.0);
        assert_eq!(ScrollProgress::new(0.7).offset(0.0, 100.0, 200.0), 0.0);
    }

    #[test]
    fn test_progress_keeps_overshoot_but_not_nan() {
        assert_eq!(ScrollProgress::new(1.25).get(), 1.25);
        assert_eq!(ScrollProgress::new(-0.1).get(), -0.1);
        assert_eq!(ScrollProgress::new(f64::NAN).get(), 0.0);
        assert_eq!(ScrollProgress::new(f64::INFINITY).get(), 0.0);
    }

    #[test]
    fn test_nearest_snap() {
        assert_eq!(nearest_snap(ScrollProgress::new(0.0), 7).0, 0);
        assert_eq!(nearest_snap(ScrollProgress::new(0.49), 7).0, 3);
        assert_eq!(nearest_snap(ScrollProgress::new(0.93), 7).0, 6);
        assert_eq!(nearest_snap(ScrollProgress::new(1.4), 7).0, 6);
        assert_eq!(nearest_snap(ScrollProgress::new(-0.2), 7).0, 0);

        let (index, rest) = nearest_snap(ScrollProgress::new(0.55), 5);
        assert_eq!(index, 2);
        assert_eq!(rest.get(), 0.5);
    }

    #[test]
    fn test_nearest_snap_single_slide() {
        assert_eq!(nearest_snap(ScrollProgress::new(0.8), 1), (0, ScrollProgress::new(0.0)));
        assert_eq!(nearest_snap(ScrollProgress::new(0.8), 0).0, 0);
    }

    #[test]
    fn test_snap_animation_endpoints() {
        let animation = SnapAnimation::new(100.0, 400.0, Duration::from_millis(240), ease_out_cubic);
        assert_eq!(animation.sample(Duration::ZERO), 100.0);
        assert_eq!(animation.sample(Duration::from_millis(240)), 400.0);
        assert_eq!(animation.sample(Duration::from_secs(3)), 400.0);
        assert!(animation.is_finished(Duration::from_millis(241)));

        let mid = animation.sample(Duration::from_millis(120));
        // ease-out covers more than half the distance in half the time
        assert!(mid > 250.0 && mid < 400.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let animation = SnapAnimation::new(0.0, 50.0, Duration::ZERO, ease_out_cubic);
        assert!(animation.is_finished(Duration::ZERO));
        assert_eq!(animation.sample(Duration::ZERO), 50.0);
    }
}

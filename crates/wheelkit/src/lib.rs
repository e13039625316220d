#[macro_use]
mod macros;

pub mod easing;
pub mod geometry;
pub mod layout;
pub mod scroll;

pub use easing::{CubicBezier, Easing, EasingError};
pub use geometry::{GeometryError, Point, PrimaryCircle};
pub use layout::{Circle, MarkerSize, PositionedCircle, WheelLayout, WheelParams};
pub use scroll::{ScrollProgress, SnapAnimation};

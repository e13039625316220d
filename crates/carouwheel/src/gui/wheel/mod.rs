pub mod model;
pub mod view;

pub use model::State;
pub use view::draw;

pub const REFERENCE_MARKER_SIZE: f64 = 40.0; // marker diameter the label size is tuned for
pub const LABEL_FONT_SIZE: f64 = 12.0;
pub const RING_LINE_WIDTH: f64 = 1.0;
pub const FOCUS_RING_WIDTH: f64 = 2.0;

use crate::config::{Config, SlideLabel};
use wheelkit::scroll::nearest_snap;
use wheelkit::{CubicBezier, PositionedCircle, PrimaryCircle, ScrollProgress, WheelLayout};

pub struct State {
    pub slides: Vec<SlideLabel>,
    pub scroll: ScrollProgress,
    pub primary: Option<PrimaryCircle>,
    pub circles: Vec<PositionedCircle>,
    layout: WheelLayout<CubicBezier>,
    bounds: (f64, f64),
}

impl State {
    pub fn new(config: &Config) -> Self {
        Self {
            slides: config.slides.clone(),
            scroll: ScrollProgress::default(),
            primary: None,
            circles: Vec::new(),
            layout: WheelLayout::new(config.wheel.params(), config.wheel.easing),
            bounds: (0.0, 0.0),
        }
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.slides = config.slides.clone();
        self.layout = WheelLayout::new(config.wheel.params(), config.wheel.easing);
        let (width, height) = self.bounds;
        self.resize(width, height);
    }

    /// Refits the primary circle to the drawing area. Returns whether a redraw is needed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.bounds = (width, height);
        let fitted = match self.layout.params.fit_primary_circle(width, height) {
            Ok(circle) => Some(circle),
            Err(e) => {
                log::debug!("Wheel hidden: {}", e);
                None
            }
        };

        let changed = fitted != self.primary;
        self.primary = fitted;
        self.relayout();
        changed
    }

    pub fn set_scroll(&mut self, scroll: ScrollProgress) -> bool {
        if scroll == self.scroll {
            return false;
        }
        self.scroll = scroll;
        self.relayout();
        true
    }

    /// Unscaled marker diameter for the current primary circle.
    pub fn base_size(&self) -> Option<f64> {
        self.primary
            .map(|p| self.layout.params.marker_size.resolve(p.diameter()))
    }

    pub fn focused_index(&self) -> Option<usize> {
        (!self.slides.is_empty()).then(|| nearest_snap(self.scroll, self.slides.len()).0)
    }

    fn relayout(&mut self) {
        self.circles = match &self.primary {
            Some(primary) => self.layout.layout(primary, self.slides.len(), self.scroll),
            None => Vec::new(),
        };
    }
}

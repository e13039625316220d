use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{LinSrgba, Mix, Srgba};

pub struct ThemeColors {
    pub marker: Srgba<f64>,
    pub focused: Srgba<f64>,
    pub ring: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            marker: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.44, 0.44, 0.48, 0.3),
                Some(0.3),
            ),
            focused: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.9),
                Some(0.6),
            ),
            ring: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.44, 0.44, 0.48, 0.3),
                Some(0.3),
            ),
            label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
        }
    }

    /// Marker fill for an eased focus in `[0, 1]`.
    pub fn marker_fill(&self, focus: f64) -> Srgba<f64> {
        let idle: LinSrgba<f64> = self.marker.into_linear();
        let focused: LinSrgba<f64> = self.focused.into_linear();
        Srgba::from_linear(idle.mix(focused, focus.clamp(0.0, 1.0)))
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.carouwheel-wheel {
    background: none;
}

.carouwheel-slide {
    margin: 8px;
    border-radius: 24px;
    border: 1px solid alpha(currentColor, 0.3);
    font-size: 36px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

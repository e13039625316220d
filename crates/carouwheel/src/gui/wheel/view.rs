use super::model::State;
use super::{FOCUS_RING_WIDTH, LABEL_FONT_SIZE, REFERENCE_MARKER_SIZE, RING_LINE_WIDTH};
use crate::config::SlideLabel;
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;
use std::iter::zip;
use wheelkit::{PositionedCircle, PrimaryCircle};

struct MarkerRenderer<'a> {
    circle: &'a PositionedCircle,
    primary: &'a PrimaryCircle,
    label: &'a SlideLabel,
    focused: bool,
}

impl<'a> MarkerRenderer<'a> {
    fn new(
        circle: &'a PositionedCircle,
        primary: &'a PrimaryCircle,
        label: &'a SlideLabel,
        focused: bool,
    ) -> Self {
        Self {
            circle,
            primary,
            label,
            focused,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_circle(cr, colors)?;
        self.draw_label(cr, colors)?;
        Ok(())
    }

    fn draw_circle(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.primary.point_at(self.circle.theta);
        set_source(cr, colors.marker_fill(self.circle.focus));
        cr.arc(center.x, center.y, self.circle.size / 2.0, 0.0, 2.0 * PI);
        cr.fill()?;

        if self.focused {
            set_source(cr, colors.focused);
            cr.set_line_width(FOCUS_RING_WIDTH);
            cr.arc(
                center.x,
                center.y,
                self.circle.size / 2.0 - FOCUS_RING_WIDTH / 2.0,
                0.0,
                2.0 * PI,
            );
            cr.stroke()?;
        }
        Ok(())
    }

    // labels stay upright: the marker is translated onto the rim, never rotated
    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.primary.point_at(self.circle.theta);
        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(LABEL_FONT_SIZE * self.circle.size / REFERENCE_MARKER_SIZE);
        if let Ok(ext) = cr.text_extents(self.label) {
            cr.move_to(
                center.x - ext.width() / 2.0 - ext.x_bearing(),
                center.y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(self.label)?;
        }
        Ok(())
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let Some(primary) = &state.primary else {
        return Ok(());
    };

    draw_primary_circle(cr, primary, colors)?;

    let focused = state.focused_index();
    for (circle, label) in zip(&state.circles, &state.slides) {
        MarkerRenderer::new(circle, primary, label, focused == Some(circle.index))
            .draw(cr, colors)?;
    }
    Ok(())
}

fn draw_primary_circle(
    cr: &Context,
    primary: &PrimaryCircle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = primary.center();
    set_source(cr, colors.ring);
    cr.set_line_width(RING_LINE_WIDTH);
    cr.arc(center.x, center.y, primary.radius(), 0.0, 2.0 * PI);
    cr.stroke()
}

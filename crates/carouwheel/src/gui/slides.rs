use crate::config::{Axis, SlideLabel};
use glib::SignalHandlerId;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk::gdk;
use std::cell::Cell;
use std::time::Duration;
use wheelkit::easing::ease_out_cubic;
use wheelkit::{ScrollProgress, SnapAnimation};

/// Signal connection that is disconnected when dropped.
pub struct Subscription {
    object: glib::WeakRef<glib::Object>,
    handler: Option<SignalHandlerId>,
}

impl Subscription {
    pub fn new(object: &impl IsA<glib::Object>, handler: SignalHandlerId) -> Self {
        Self {
            object: object.upcast_ref::<glib::Object>().downgrade(),
            handler: Some(handler),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let (Some(handler), Some(object)) = (self.handler.take(), self.object.upgrade()) {
            object.disconnect(handler);
        }
    }
}

pub fn orientation(axis: Axis) -> gtk::Orientation {
    match axis {
        Axis::Vertical => gtk::Orientation::Vertical,
        Axis::Horizontal => gtk::Orientation::Horizontal,
    }
}

/// The adjustment that moves along `axis`.
pub fn adjustment(scroller: &gtk::ScrolledWindow, axis: Axis) -> gtk::Adjustment {
    match axis {
        Axis::Vertical => scroller.vadjustment(),
        Axis::Horizontal => scroller.hadjustment(),
    }
}

pub fn progress(adjustment: &gtk::Adjustment) -> ScrollProgress {
    ScrollProgress::from_offsets(
        adjustment.value(),
        adjustment.lower(),
        adjustment.upper(),
        adjustment.page_size(),
    )
}

pub fn offset_for(adjustment: &gtk::Adjustment, progress: ScrollProgress) -> f64 {
    progress.offset(adjustment.lower(), adjustment.upper(), adjustment.page_size())
}

pub fn configure_scroller(scroller: &gtk::ScrolledWindow, axis: Axis) {
    scroller.set_kinetic_scrolling(true);
    // scrolling still works with External, the bars are just never shown
    let (h, v) = match axis {
        Axis::Vertical => (gtk::PolicyType::Never, gtk::PolicyType::External),
        Axis::Horizontal => (gtk::PolicyType::External, gtk::PolicyType::Never),
    };
    scroller.set_policy(h, v);
}

/// One full-viewport page per slide.
pub struct SlidePages {
    container: gtk::Box,
    pages: Vec<gtk::Label>,
}

impl SlidePages {
    pub fn new(container: gtk::Box) -> Self {
        Self {
            container,
            pages: Vec::new(),
        }
    }

    pub fn rebuild(&mut self, slides: &[SlideLabel], axis: Axis) {
        for page in self.pages.drain(..) {
            self.container.remove(&page);
        }

        self.container.set_orientation(orientation(axis));
        self.container.set_homogeneous(true);

        for slide in slides {
            let page = gtk::Label::new(Some(slide.as_str()));
            page.add_css_class("carouwheel-slide");
            page.set_hexpand(true);
            page.set_vexpand(true);
            self.container.append(&page);
            self.pages.push(page);
        }
    }

    /// Sizes every page to the viewport along `axis`, with `margin` kept free on the top and
    /// bottom so pages line up with the wheel.
    pub fn set_extent(&self, axis: Axis, extent: f64, margin: f64) {
        let extent = extent.round() as i32;
        let margin = margin.round() as i32;
        for page in &self.pages {
            match axis {
                Axis::Vertical => page.set_size_request(-1, (extent - 2 * margin).max(1)),
                Axis::Horizontal => page.set_size_request(extent.max(1), -1),
            }
            page.set_margin_top(margin);
            page.set_margin_bottom(margin);
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

/// Whether a drag gesture should move the pages itself. Touch is left to the scroller's
/// kinetic scrolling.
pub fn drives_drag(gesture: &impl IsA<gtk::GestureSingle>) -> bool {
    !gesture
        .upcast_ref::<gtk::GestureSingle>()
        .device()
        .is_some_and(|device| is_touch(device.source()))
}

fn is_touch(source: gdk::InputSource) -> bool {
    source == gdk::InputSource::Touchscreen
}

/// Pointer or finger lift.
pub fn is_release(event_type: gdk::EventType) -> bool {
    matches!(
        event_type,
        gdk::EventType::ButtonRelease | gdk::EventType::TouchEnd | gdk::EventType::TouchCancel
    )
}

/// Drops any kinetic deceleration so a snap starts from where the pages are.
pub fn stop_kinetic(scroller: &gtk::ScrolledWindow) {
    if scroller.is_kinetic_scrolling() {
        scroller.set_kinetic_scrolling(false);
        scroller.set_kinetic_scrolling(true);
    }
}

/// Debounce for wheel scrolling, which has no end event of its own. Each scroll arms a new
/// generation and only the latest one may fire.
#[derive(Debug, Default)]
pub struct Settle {
    generation: u64,
}

impl Settle {
    pub const DELAY: Duration = Duration::from_millis(150);

    pub fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Invalidates whatever is pending.
    pub fn disarm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn fire(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.disarm();
        true
    }
}

/// Eased scroll back to a rest offset, driven by the widget's frame clock.
#[derive(Default)]
pub struct Recenter {
    tick: Option<gtk::TickCallbackId>,
}

impl Recenter {
    pub fn start(
        &mut self,
        widget: &impl IsA<gtk::Widget>,
        adjustment: &gtk::Adjustment,
        target: f64,
        duration: Duration,
    ) {
        self.cancel();

        let animation = SnapAnimation::new(adjustment.value(), target, duration, ease_out_cubic);
        if (animation.to - animation.from).abs() < f64::EPSILON {
            return;
        }

        let adjustment = adjustment.clone();
        let started_at = Cell::new(None);
        let tick = widget.add_tick_callback(move |_, clock| {
            let now = clock.frame_time();
            let start = started_at.get().unwrap_or(now);
            started_at.set(Some(start));

            let elapsed = Duration::from_micros((now - start).max(0) as u64);
            adjustment.set_value(animation.sample(elapsed));

            if animation.is_finished(elapsed) {
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
        self.tick = Some(tick);
    }

    pub fn cancel(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.remove();
        }
    }
}

use crate::config::{self, Axis, Config};
use crate::events::AppEvent;
use crate::gui::slides::{self, Recenter, Settle, SlidePages, Subscription};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, State};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use wheelkit::ScrollProgress;
use wheelkit::layout::slide_progress;
use wheelkit::scroll::nearest_snap;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub config: Config,
    pub config_path: PathBuf,
    pub drawing_area: gtk::DrawingArea,
    pub scroller: gtk::ScrolledWindow,
    pub pages: SlidePages,
    pub recenter: Recenter,
    settle: Settle,
    drag_origin: Option<f64>,
    /// Live for the whole component lifetime.
    subscriptions: Vec<Subscription>,
    /// Bound to the current axis' adjustment, replaced on rebuild.
    scroll_subscriptions: Vec<Subscription>,
}

#[derive(Debug)]
pub enum AppMsg {
    WheelResized { width: f64, height: f64 },
    Scrolled(ScrollProgress),
    ViewportChanged,
    DragBegin,
    DragUpdate { offset_x: f64, offset_y: f64 },
    Release,
    WheelScrolled,
    Settled(u64),
    Step(i32),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, PathBuf, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("CarouWheel"),
            set_default_size: (576, 448),
            add_css_class: "carouwheel-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Escape => sender.input(AppMsg::Quit),
                        gtk::gdk::Key::Up | gtk::gdk::Key::Left => sender.input(AppMsg::Step(-1)),
                        gtk::gdk::Key::Down | gtk::gdk::Key::Right => sender.input(AppMsg::Step(1)),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            gtk::Grid {
                set_column_homogeneous: true,
                set_hexpand: true,
                set_vexpand: true,

                #[name = "drawing_area"]
                attach[0, 0, 1, 1] = &gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "carouwheel-wheel",
                },

                #[name = "scroller"]
                attach[1, 0, 2, 1] = &gtk::ScrolledWindow {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "carouwheel-slides",

                    #[name = "pages"]
                    gtk::Box {},
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        theme::load_css();

        let widgets = view_output!();

        let state = Rc::new(RefCell::new(State::new(&config)));

        let mut model = AppModel {
            state,
            config,
            config_path,
            drawing_area: widgets.drawing_area.clone(),
            scroller: widgets.scroller.clone(),
            pages: SlidePages::new(widgets.pages.clone()),
            recenter: Recenter::default(),
            settle: Settle::default(),
            drag_origin: None,
            subscriptions: Vec::new(),
            scroll_subscriptions: Vec::new(),
        };

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = wheel::draw(cr, &state_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        model.subscribe_wheel(&sender);
        model.install_drag_controllers(&sender);
        model.rebuild_slides(&sender);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::WheelResized { width, height } => {
                log::debug!("Wheel area resized to {}x{}", width, height);
                if self.state.borrow_mut().resize(width, height) {
                    self.drawing_area.queue_draw();
                    // page margins follow the marker size
                    self.resize_pages();
                }
            }
            AppMsg::Scrolled(progress) => {
                if self.state.borrow_mut().set_scroll(progress) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ViewportChanged => {
                self.resize_pages();
                let progress = slides::progress(&self.adjustment());
                if self.state.borrow_mut().set_scroll(progress) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragBegin => {
                self.recenter.cancel();
                self.settle.disarm();
                self.drag_origin = Some(self.adjustment().value());
            }
            AppMsg::DragUpdate { offset_x, offset_y } => {
                let offset = match self.axis() {
                    Axis::Vertical => offset_y,
                    Axis::Horizontal => offset_x,
                };
                if let Some(origin) = self.drag_origin {
                    self.adjustment().set_value(origin - offset);
                }
            }
            AppMsg::Release => self.release(),
            AppMsg::WheelScrolled => {
                let generation = self.settle.arm();
                let settle_sender = sender.clone();
                glib::timeout_add_local_once(Settle::DELAY, move || {
                    settle_sender.input(AppMsg::Settled(generation));
                });
            }
            AppMsg::Settled(generation) => {
                if self.settle.fire(generation) && self.drag_origin.is_none() {
                    self.release();
                }
            }
            AppMsg::Step(delta) => {
                let count = self.config.slides.len();
                let progress = slides::progress(&self.adjustment());
                let (index, _) = nearest_snap(progress, count);
                let target = (index as i64 + delta as i64).clamp(0, count.saturating_sub(1) as i64);
                self.scroll_to(ScrollProgress::new(slide_progress(target as usize, count)));
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.config = new_config;
                    self.state.borrow_mut().apply_config(&self.config);
                    self.rebuild_slides(&sender);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.recenter.cancel();
        self.settle.disarm();
        self.scroll_subscriptions.clear();
        self.subscriptions.clear();
    }
}

impl AppModel {
    fn axis(&self) -> Axis {
        self.config.axis
    }

    fn adjustment(&self) -> gtk::Adjustment {
        slides::adjustment(&self.scroller, self.axis())
    }

    /// Snaps to the nearest slide once the pointer lets go or wheel scrolling settles.
    fn release(&mut self) {
        self.drag_origin = None;
        self.settle.disarm();
        slides::stop_kinetic(&self.scroller);
        let progress = slides::progress(&self.adjustment());
        let (_, rest) = nearest_snap(progress, self.config.slides.len());
        self.scroll_to(rest);
    }

    fn scroll_to(&mut self, progress: ScrollProgress) {
        let adjustment = self.adjustment();
        let target = slides::offset_for(&adjustment, progress);
        self.recenter.start(
            &self.scroller,
            &adjustment,
            target,
            self.config.wheel.snap_duration(),
        );
    }

    fn resize_pages(&self) {
        let adjustment = self.adjustment();
        let margin = self.state.borrow().base_size().map_or(0.0, |base| {
            base * self.config.wheel.scale_max / 2.0
        });
        self.pages
            .set_extent(self.axis(), adjustment.page_size(), margin);
    }

    fn subscribe_wheel(&mut self, sender: &ComponentSender<Self>) {
        let resize_sender = sender.clone();
        let handler = self.drawing_area.connect_resize(move |_, width, height| {
            resize_sender.input(AppMsg::WheelResized {
                width: width as f64,
                height: height as f64,
            });
        });
        self.subscriptions
            .push(Subscription::new(&self.drawing_area, handler));
    }

    /// Rebuilds pages and rewires the scroll signals, since the axis may have changed.
    fn rebuild_slides(&mut self, sender: &ComponentSender<Self>) {
        self.recenter.cancel();
        self.scroll_subscriptions.clear();

        slides::configure_scroller(&self.scroller, self.axis());
        self.pages.rebuild(&self.config.slides, self.axis());
        log::debug!("Built {} slide pages", self.pages.len());

        let adjustment = self.adjustment();

        let value_sender = sender.clone();
        let handler = adjustment.connect_value_changed(move |adjustment| {
            value_sender.input(AppMsg::Scrolled(slides::progress(adjustment)));
        });
        self.scroll_subscriptions
            .push(Subscription::new(&adjustment, handler));

        let changed_sender = sender.clone();
        let handler = adjustment.connect_changed(move |_| {
            changed_sender.input(AppMsg::ViewportChanged);
        });
        self.scroll_subscriptions
            .push(Subscription::new(&adjustment, handler));

        adjustment.set_value(adjustment.lower());
        sender.input(AppMsg::ViewportChanged);
    }

    /// Mouse dragging on top of the scroller's own touch and wheel handling, plus the
    /// release hooks that snap back to the nearest slide.
    fn install_drag_controllers(&mut self, sender: &ComponentSender<Self>) {
        let drag = gtk::GestureDrag::new();
        drag.set_button(1); // primary only

        // touch is left unclaimed, the scroller drags it kinetically
        let begin_sender = sender.clone();
        let handler = drag.connect_drag_begin(move |gesture, _, _| {
            if slides::drives_drag(gesture) {
                begin_sender.input(AppMsg::DragBegin);
            }
        });
        self.subscriptions.push(Subscription::new(&drag, handler));

        let update_sender = sender.clone();
        let handler = drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            if slides::drives_drag(gesture) {
                update_sender.input(AppMsg::DragUpdate { offset_x, offset_y });
            }
        });
        self.subscriptions.push(Subscription::new(&drag, handler));

        // the lift itself, for mouse and touch alike
        let release = gtk::EventControllerLegacy::new();
        release.set_propagation_phase(gtk::PropagationPhase::Capture);
        let release_sender = sender.clone();
        let handler = release.connect_event(move |_, event| {
            if slides::is_release(event.event_type()) {
                release_sender.input(AppMsg::Release);
            }
            glib::Propagation::Proceed
        });
        self.subscriptions.push(Subscription::new(&release, handler));

        let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::BOTH_AXES);
        scroll.set_propagation_phase(gtk::PropagationPhase::Capture);
        let wheel_sender = sender.clone();
        let handler = scroll.connect_scroll(move |_, _, _| {
            // discrete wheels never send scroll-end
            wheel_sender.input(AppMsg::WheelScrolled);
            glib::Propagation::Proceed
        });
        self.subscriptions.push(Subscription::new(&scroll, handler));

        let scroll_end_sender = sender.clone();
        let handler = scroll.connect_scroll_end(move |_| {
            scroll_end_sender.input(AppMsg::Release);
        });
        self.subscriptions.push(Subscription::new(&scroll, handler));

        self.scroller.add_controller(drag);
        self.scroller.add_controller(release);
        self.scroller.add_controller(scroll);
    }
}

use carouwheel::config::{self, Config};
use carouwheel::gui::app::AppModel;
use carouwheel::sys::runtime;
use clap::Parser;
use relm4::prelude::*;
use std::path::PathBuf;
use wheelkit::{Point, PrimaryCircle, ScrollProgress, WheelLayout};

#[derive(Parser, Debug)]
#[command(name = "carouwheel", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load and watch (defaults to the XDG config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_config: bool,

    /// Print the computed marker layout as JSON instead of opening a window
    #[arg(long)]
    dump_layout: bool,

    /// Primary circle radius used by --dump-layout
    #[arg(long, default_value_t = 150.0, requires = "dump_layout")]
    radius: f64,

    /// Scroll progress used by --dump-layout
    #[arg(long, default_value_t = 0.0, requires = "dump_layout")]
    progress: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.write_config {
        let path = config::write_default_config(&config_path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);

    if cli.dump_layout {
        return dump_layout(&config, cli.radius, cli.progress);
    }

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    // clap owns the command line, GTK gets none of it
    let app = RelmApp::new("org.carouwheel.CarouWheel").with_args(Vec::new());

    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}

fn dump_layout(config: &Config, radius: f64, progress: f64) -> anyhow::Result<()> {
    let primary = PrimaryCircle::new(Point::new(radius, radius), radius)?;
    let layout = WheelLayout::new(config.wheel.params(), config.wheel.easing);
    let circles = layout.layout(&primary, config.slides.len(), ScrollProgress::new(progress));

    println!("{}", serde_json::to_string_pretty(&circles)?);
    Ok(())
}

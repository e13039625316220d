use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use wheelkit::{CubicBezier, MarkerSize, WheelParams};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SlideLabel(String);

crate::impl_string_newtype!(SlideLabel);

/// Direction the slide viewport scrolls in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    #[strum(to_string = "vertical", serialize = "v", serialize = "y")]
    Vertical,
    #[strum(to_string = "horizontal", serialize = "h", serialize = "x")]
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WheelConfig {
    #[serde(default)]
    pub base_size: Option<f64>,
    pub base_size_ratio: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    pub spacing: f64,
    pub gravity_angle: f64,
    pub easing: CubicBezier,
    pub snap_duration_ms: u64,
}

impl WheelConfig {
    pub fn marker_size(&self) -> MarkerSize {
        self.base_size
            .map_or(MarkerSize::Relative(self.base_size_ratio), MarkerSize::Fixed)
    }

    pub fn params(&self) -> WheelParams {
        WheelParams {
            marker_size: self.marker_size(),
            scale_min: self.scale_min,
            scale_max: self.scale_max,
            spacing: self.spacing,
            gravity_angle: self.gravity_angle,
        }
    }

    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        let params = WheelParams::default();
        Self {
            base_size: None,
            base_size_ratio: MarkerSize::DEFAULT_RATIO,
            scale_min: params.scale_min,
            scale_max: params.scale_max,
            spacing: params.spacing,
            gravity_angle: params.gravity_angle,
            easing: CubicBezier::wheel_scale(),
            snap_duration_ms: 240,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub slides: Vec<SlideLabel>,
    #[serde(default)]
    pub axis: Axis,
    pub wheel: WheelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slides: ["One", "Two", "Three", "Four", "Five", "Six", "Seven"]
                .into_iter()
                .map(SlideLabel::new)
                .collect(),
            axis: Axis::default(),
            wheel: WheelConfig::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("At least one slide is required")]
    NoSlides,
    #[error("scale_min ({min}) must be positive and not exceed scale_max ({max})")]
    ScaleRange { min: f64, max: f64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidLength { name: &'static str, value: f64 },
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slides.is_empty() {
            return Err(ConfigError::NoSlides);
        }

        let wheel = &self.wheel;
        if !(wheel.scale_min > 0.0 && wheel.scale_min <= wheel.scale_max && wheel.scale_max.is_finite())
        {
            return Err(ConfigError::ScaleRange {
                min: wheel.scale_min,
                max: wheel.scale_max,
            });
        }

        let lengths = [
            ("spacing", wheel.spacing),
            ("base_size_ratio", wheel.base_size_ratio),
            ("base_size", wheel.base_size.unwrap_or(0.0)),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { name, value });
            }
        }

        if !wheel.gravity_angle.is_finite() {
            return Err(ConfigError::InvalidLength {
                name: "gravity_angle",
                value: wheel.gravity_angle,
            });
        }

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "carouwheel", "carouwheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("CAROUWHEEL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let config: Config = builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_default_file_matches_default_config() {
        let loaded = from_toml("").unwrap();
        let defaults = Config::default();

        assert_eq!(loaded.slides, defaults.slides);
        assert_eq!(loaded.axis, defaults.axis);
        assert_eq!(loaded.wheel.easing, defaults.wheel.easing);
        assert_eq!(loaded.wheel.params().scale_max, 3.0);
        assert!((loaded.wheel.base_size_ratio - 40.0 / 328.0).abs() < 1e-12);
        assert_eq!(loaded.wheel.snap_duration(), Duration::from_millis(240));
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let config = from_toml(
            r#"
            slides = ["Alpha", "Beta"]
            axis = "H"

            [wheel]
            base_size = 32.0
            spacing = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.slides, vec![SlideLabel::new("Alpha"), SlideLabel::new("Beta")]);
        assert_eq!(config.axis, Axis::Horizontal);
        assert_eq!(config.wheel.marker_size(), MarkerSize::Fixed(32.0));
        assert_eq!(config.wheel.spacing, 20.0);
        assert_eq!(config.wheel.scale_min, 1.0);
    }

    #[test]
    fn test_axis_deserialization() {
        let cases = vec![
            ("\"vertical\"", Axis::Vertical),
            ("\"Vertical\"", Axis::Vertical),
            ("\"v\"", Axis::Vertical),
            ("\"Y\"", Axis::Vertical),
            ("\"horizontal\"", Axis::Horizontal),
            ("\"HORIZONTAL\"", Axis::Horizontal),
            ("\"x\"", Axis::Horizontal),
        ];

        for (json, expected) in cases {
            let deserialized: Axis = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<Axis>("\"diagonal\"").is_err());
        assert_eq!(Axis::Horizontal.to_string(), "horizontal");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            from_toml("slides = []"),
            Err(ConfigError::NoSlides)
        ));
        assert!(matches!(
            from_toml("[wheel]\nscale_min = 4.0"),
            Err(ConfigError::ScaleRange { .. })
        ));
        assert!(matches!(
            from_toml("[wheel]\nspacing = -1.0"),
            Err(ConfigError::InvalidLength { name: "spacing", .. })
        ));
        assert!(matches!(
            from_toml("[wheel]\neasing = [1.5, 0.0, 0.8, 0.8]"),
            Err(ConfigError::Config(_))
        ));
    }

    #[test]
    fn test_write_default_config_keeps_existing_file() {
        let dir = std::env::temp_dir().join(format!("carouwheel-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let written = write_default_config(&path).unwrap();
        assert_eq!(fs_err::read_to_string(&written).unwrap(), DEFAULT_CONFIG);

        fs_err::write(&path, "slides = [\"Mine\"]").unwrap();
        write_default_config(&path).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "slides = [\"Mine\"]");

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.slides, vec![SlideLabel::new("Mine")]);

        let _ = fs_err::remove_dir_all(&dir);
    }
}

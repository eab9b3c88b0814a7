use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::Rgba;
use crate::icon::{Activation, DEFAULT_DURATION};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub icon: IconConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Scale animation duration in seconds (0 = no animation)
    #[serde(default = "default_duration")]
    pub duration_secs: f64,
    /// Delay before the selection animation starts, in seconds
    #[serde(default)]
    pub delay_secs: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            delay_secs: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    /// Fill color while unselected
    #[serde(default = "default_tint")]
    pub tint: Rgba,
    /// Fill color while selected
    #[serde(default = "default_selected_fill")]
    pub selected_fill: Rgba,
    /// Base glyph
    #[serde(default = "default_glyph")]
    pub glyph: String,
    /// Distinct glyph shown when selected; tint-only when unset
    #[serde(default)]
    pub selected_glyph: Option<String>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            tint: default_tint(),
            selected_fill: default_selected_fill(),
            glyph: default_glyph(),
            selected_glyph: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Frame tick in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

fn default_tint() -> Rgba {
    Rgba::GRAY
}

fn default_selected_fill() -> Rgba {
    Rgba::rgb(0xe2, 0x26, 0x4d)
}

fn default_glyph() -> String {
    "★".to_string()
}

fn default_tick_rate() -> u64 {
    16 // ~60fps
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        crate::tween::validate_duration(config.animation.duration_secs)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/faveicon/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("faveicon")
            .join("config.toml")
    }

    /// Activation arguments for selecting or deselecting with this config
    pub fn activation(&self, is_selected: bool) -> Activation {
        let fill = if is_selected {
            self.icon.selected_fill
        } else {
            self.icon.tint
        };
        Activation::new(is_selected, fill)
            .with_duration(self.animation.duration_secs)
            .with_delay(self.animation.delay_secs)
    }
}

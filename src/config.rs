use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::{BatchOptions, OutputLayout};
use crate::render::{Anchor, ColorSpec};
use crate::watermark::WatermarkConfig;

/// Top-level configuration for exif-stamp.
///
/// Every value has a default, so a config file only needs the keys it
/// changes. Command-line flags override whatever is loaded here.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_stamp::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.watermark.color = "black".into();
/// config.watermark.position = "top-left".into();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the date text looks and where it goes.
    pub watermark: WatermarkSettings,
    /// Output behavior (layout, dry run, metadata).
    pub output: OutputConfig,
}

/// Date text appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkSettings {
    /// TrueType font file. The built-in font is used when it can't be loaded.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: u32,
    /// `white`, `black`, `red`, `green`, `blue`, or a `#rrggbb` / `rgb(r, g, b)` value.
    pub color: String,
    /// `top-left`, `top-right`, `bottom-left`, `bottom-right` or `center`.
    pub position: String,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Put `<dir>_watermark` inside the input directory or beside it.
    pub layout: OutputLayout,
    /// Copy the source EXIF block into JPEG/PNG outputs.
    pub keep_metadata: bool,
    /// If `true`, process images without writing anything.
    pub dry_run: bool,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            font_path: Some(PathBuf::from("fonts/Arial.ttf")),
            font_size: 40,
            color: "white".to_string(),
            position: Anchor::default().name().to_string(),
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Build the drawing style, checking values a config file could get wrong.
    pub fn watermark_config(&self) -> Result<WatermarkConfig> {
        let settings = &self.watermark;
        if settings.font_size == 0 {
            bail!("font_size must be a positive integer");
        }
        Ok(WatermarkConfig {
            font_size: settings.font_size,
            color: ColorSpec::from_arg(&settings.color),
            anchor: Anchor::from_name(&settings.position),
            font_path: settings.font_path.clone(),
        })
    }

    /// Everything a batch run needs.
    pub fn batch_options(&self) -> Result<BatchOptions> {
        Ok(BatchOptions {
            watermark: self.watermark_config()?,
            layout: self.output.layout,
            dry_run: self.output.dry_run,
            keep_metadata: self.output.keep_metadata,
        })
    }
}

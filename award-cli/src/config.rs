//! Configuration: defaults, optional TOML file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ledger::NumberOrdering;

/// Ledger file name used when nothing else is configured
pub const DEFAULT_LEDGER: &str = "AwardGrantsOverview.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger path, relative to the working directory unless absolute
    pub ledger: PathBuf,
    /// Template image extensions, tried in order
    pub template_extensions: Vec<String>,
    pub number_ordering: NumberOrdering,
    pub fonts: FontConfig,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: PathBuf::from(DEFAULT_LEDGER),
            template_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            number_ordering: NumberOrdering::default(),
            fonts: FontConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Preferred font files per text role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub name: String,
    pub number: String,
    pub date: String,
    /// Pixel height of the text
    pub size: f32,
    /// Directories searched (recursively) when a font is not found in the working directory
    pub search_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: "Bodoni Bd BT Bold.ttf".to_string(),
            number: "arial.ttf".to_string(),
            date: "arial.ttf".to_string(),
            size: 150.0,
            search_dirs: default_font_dirs(),
        }
    }
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs_list: Vec<PathBuf> = dirs::font_dir().into_iter().collect();
    for dir in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ] {
        dirs_list.push(PathBuf::from(dir));
    }
    dirs_list
}

/// Colours and border of one outlined text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyleConfig {
    pub fill: [u8; 3],
    pub border: [u8; 3],
    pub thickness: u32,
}

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [255, 0, 0];

/// Where the three texts go on the template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Top-left of the name, in pixels
    pub name_position: [i32; 2],
    /// Distance of the serial number from the right and bottom edges
    pub number_margin: [i32; 2],
    /// Distance of the date from the left and bottom edges
    pub date_margin: [i32; 2],
    pub name_style: TextStyleConfig,
    pub number_style: TextStyleConfig,
    pub date_style: TextStyleConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            name_position: [1500, 200],
            number_margin: [10, 10],
            date_margin: [100, 100],
            name_style: TextStyleConfig {
                fill: BLACK,
                border: WHITE,
                thickness: 5,
            },
            number_style: TextStyleConfig {
                fill: BLACK,
                border: WHITE,
                thickness: 5,
            },
            date_style: TextStyleConfig {
                fill: RED,
                border: WHITE,
                thickness: 5,
            },
        }
    }
}

impl Config {
    /// User config file location (~/.config/award-cli/config.toml on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("award-cli").join("config.toml"))
    }

    /// Load from an explicit file, else the user config file if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Ledger path resolved against the working directory
    pub fn ledger_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.ledger)
    }
}

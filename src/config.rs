use egui::Pos2;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::PaddockError;
use crate::ui::details::DetailsVariant;

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub details_variant: DetailsVariant,
    pub show_imu_table: bool,
    pub window_position: WindowPosition,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            details_variant: DetailsVariant::default(),
            show_imu_table: false,
            window_position: WindowPosition::default(),
        }
    }
}

impl AppConfig {
    fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("paddock").join(CONFIG_FILE_NAME))
    }

    pub fn from_local_file() -> Option<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }
        match Self::load_from(&config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Could not read config file, using defaults: {e}");
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PaddockError> {
        let file = File::open(path).map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), PaddockError> {
        let config_path = Self::config_path().ok_or(PaddockError::NoConfigDir)?;
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| PaddockError::ConfigIOError { source: e })?;
        }
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PaddockError> {
        let file = File::create(path).map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }
}

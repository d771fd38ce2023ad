//! Engine configuration and its on-disk home.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::model::ViewMode;

/// Layout options consumed by every computation. Column width is not listed
/// here: it always comes from the active view mode's scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttOptions {
    pub header_height: f32,
    pub bar_height: f32,
    /// Vertical gap between bars; half of it sits above the first row.
    pub padding: f32,
    pub bar_corner_radius: f32,
    pub view_mode: ViewMode,
    /// Token pattern for bare source dates, e.g. `YYYY-MM-DD`.
    pub date_format: String,
    /// Locale tag used for month names.
    pub language: String,
    /// Bars never get narrower than this.
    pub min_bar_width: f32,
}

impl Default for GanttOptions {
    fn default() -> Self {
        Self {
            header_height: 50.0,
            bar_height: 20.0,
            padding: 18.0,
            bar_corner_radius: 3.0,
            view_mode: ViewMode::Day,
            date_format: "YYYY-MM-DD".into(),
            language: "en".into(),
            min_bar_width: 6.0,
        }
    }
}

impl GanttOptions {
    /// Height of one stacked bar slot.
    pub fn slot_height(&self) -> f32 {
        self.bar_height + self.padding
    }
}

/// Directory holding `settings.json`.
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "EmployeeGantt")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load options from `path`. A missing file yields the defaults.
pub fn load_options(path: &Path) -> Result<GanttOptions> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GanttOptions::default()),
        Err(e) => Err(e.into()),
    }
}

/// Like [`load_options`], but reports a broken file and falls back to the
/// defaults instead of failing.
pub fn load_or_default(path: &Path) -> GanttOptions {
    load_options(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
        GanttOptions::default()
    })
}

pub fn save_options(options: &GanttOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(options)?;
    std::fs::write(path, json)?;
    Ok(())
}

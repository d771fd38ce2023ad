use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::model::{RawTask, TaskSheet};

/// Either a full sheet or just its task list.
#[derive(Deserialize)]
#[serde(untagged)]
enum SheetFile {
    Sheet(TaskSheet),
    Tasks(Vec<RawTask>),
}

/// Save a sheet to a JSON file.
pub fn save_sheet(sheet: &TaskSheet, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(sheet)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), tasks = sheet.tasks.len(), "saved sheet");
    Ok(())
}

/// Load a sheet from a JSON file. A bare array of tasks is accepted and
/// named after the file.
pub fn load_sheet(path: &Path) -> Result<TaskSheet> {
    let json = std::fs::read_to_string(path)?;
    let sheet = match serde_json::from_str(&json)? {
        SheetFile::Sheet(sheet) => sheet,
        SheetFile::Tasks(tasks) => TaskSheet {
            name: sheet_name(path),
            tasks,
        },
    };
    info!(path = %path.display(), tasks = sheet.tasks.len(), "loaded sheet");
    Ok(sheet)
}

pub(crate) fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| TaskSheet::default().name)
}

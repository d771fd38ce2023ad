use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::task::RawTask;

/// A named list of raw task records, as loaded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSheet {
    pub name: String,
    pub tasks: Vec<RawTask>,
}

impl Default for TaskSheet {
    fn default() -> Self {
        Self {
            name: "Untitled Schedule".to_string(),
            tasks: Vec::new(),
        }
    }
}

impl TaskSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of distinct employee ids on the sheet.
    pub fn employee_count(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| t.employee_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

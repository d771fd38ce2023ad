use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dependencies as supplied by the host: either a comma-separated string or
/// a list of task ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependencies {
    List(Vec<String>),
    Csv(String),
}

impl Dependencies {
    /// Resolve to an ordered list of ids. A string is split on commas, each
    /// token trimmed, empties dropped; a list is kept as-is.
    pub fn to_ids(&self) -> Vec<String> {
        match self {
            Dependencies::List(ids) => ids.clone(),
            Dependencies::Csv(s) => s
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// A task record exactly as received from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTask {
    pub id: Option<String>,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employee_id: String,
    pub employee_name: String,
    pub dependencies: Option<Dependencies>,
    /// Progress from 0 (not started) to 100 (complete).
    pub progress: f32,
    /// Anything else the host attached; carried through untouched.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl RawTask {
    pub fn new(
        name: impl Into<String>,
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for both source dates.
    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = start.map(str::to_string);
        self.end_date = end.map(str::to_string);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_dependencies(mut self, deps: Dependencies) -> Self {
        self.dependencies = Some(deps);
        self
    }
}

/// A validated working period ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask {
    /// Owned copy of the source record. `raw.id` is filled in when an id had
    /// to be generated, so normalizing `raw` again is stable.
    pub raw: RawTask,
    pub id: String,
    pub start: NaiveDateTime,
    /// Exclusive end; always after `start`.
    pub end: NaiveDateTime,
    /// Set when a source date was missing, unparseable or discarded.
    pub invalid: bool,
    /// Ordinal of the employee row this period was grouped into.
    pub index: usize,
    pub dependencies: Vec<String>,
}

impl NormalizedTask {
    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn employee_id(&self) -> &str {
        &self.raw.employee_id
    }

    pub fn employee_name(&self) -> &str {
        &self.raw.employee_name
    }

    /// Progress clamped to `0.0..=1.0`.
    pub fn progress_fraction(&self) -> f32 {
        (self.raw.progress / 100.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_dependencies_are_split_and_trimmed() {
        let deps = Dependencies::Csv(" a, b ,,c ,".into());
        assert_eq!(deps.to_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn list_dependencies_are_kept() {
        let deps = Dependencies::List(vec!["x".into(), " y ".into()]);
        assert_eq!(deps.to_ids(), vec!["x", " y "]);
    }

    #[test]
    fn deserializes_either_dependency_shape_and_keeps_metadata() {
        let json = r#"[
            {"name": "A", "start_date": "2024-01-01", "dependencies": "t1, t2", "custom_class": "late"},
            {"name": "B", "dependencies": ["t3"]}
        ]"#;
        let tasks: Vec<RawTask> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].dependencies, Some(Dependencies::Csv("t1, t2".into())));
        assert_eq!(tasks[0].metadata.get("custom_class"), Some(&Value::from("late")));
        assert_eq!(tasks[1].dependencies, Some(Dependencies::List(vec!["t3".into()])));
        assert_eq!(tasks[1].end_date, None);
    }
}

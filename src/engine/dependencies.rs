use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::Grouping;

/// Reverse dependency index: for each task id, the tasks that depend on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyMap {
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyMap {
    pub fn build(grouping: &Grouping) -> Self {
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for period in grouping.periods() {
            for dep in &period.dependencies {
                dependents.entry(dep.clone()).or_default().push(period.id.clone());
            }
        }
        Self { dependents }
    }

    /// Tasks that list `task_id` directly as a dependency.
    pub fn direct_dependents(&self, task_id: &str) -> &[String] {
        self.dependents.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every task that transitively depends on `task_id`, breadth-first,
    /// without repeats. `task_id` itself is excluded even inside a cycle.
    pub fn all_dependents(&self, task_id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([task_id]);
        let mut queue: VecDeque<&str> = VecDeque::from([task_id]);
        let mut out = Vec::new();

        while let Some(current) = queue.pop_front() {
            for next in self.direct_dependents(current) {
                if seen.insert(next.as_str()) {
                    out.push(next.clone());
                    queue.push_back(next.as_str());
                }
            }
        }
        out
    }
}

use super::task::NormalizedTask;

/// All working periods of one employee, stacked as one timeline row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub employee_id: String,
    /// Taken from the first period of the group.
    pub employee_name: String,
    /// 0-based, in order of first appearance of the employee id.
    pub index: usize,
    pub periods: Vec<NormalizedTask>,
}

/// Employee rows plus the row-major period order geometry is addressed by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub rows: Vec<EmployeeRow>,
}

impl Grouping {
    /// Every working period, row by row. Position in this iterator is the
    /// period's flattened index.
    pub fn periods(&self) -> impl Iterator<Item = &NormalizedTask> + '_ {
        self.rows.iter().flat_map(|row| row.periods.iter())
    }

    pub fn period_count(&self) -> usize {
        self.rows.iter().map(|row| row.periods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.period_count() == 0
    }

    /// Period at a flattened index.
    pub fn period(&self, flat_index: usize) -> Option<&NormalizedTask> {
        self.periods().nth(flat_index)
    }

    /// Flattened index of the period with the given id.
    pub fn flat_index_of(&self, task_id: &str) -> Option<usize> {
        self.periods().position(|p| p.id == task_id)
    }

    /// Row that owns the period at a flattened index.
    pub fn row_of(&self, flat_index: usize) -> Option<&EmployeeRow> {
        let mut remaining = flat_index;
        for row in &self.rows {
            if remaining < row.periods.len() {
                return Some(row);
            }
            remaining -= row.periods.len();
        }
        None
    }
}

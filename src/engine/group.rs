//! Partitions working periods into one row per employee.

use std::collections::HashMap;

use crate::model::{EmployeeRow, Grouping, NormalizedTask};

/// Group periods by employee id. Rows appear in order of each id's first
/// occurrence; periods keep their input order within a row. Every period's
/// `index` becomes the ordinal of its row.
pub fn group(tasks: Vec<NormalizedTask>) -> Grouping {
    let mut rows: Vec<EmployeeRow> = Vec::new();
    let mut row_of: HashMap<String, usize> = HashMap::new();

    for mut task in tasks {
        let row = match row_of.get(task.employee_id()) {
            Some(&row) => row,
            None => {
                let row = rows.len();
                row_of.insert(task.employee_id().to_string(), row);
                rows.push(EmployeeRow {
                    employee_id: task.employee_id().to_string(),
                    employee_name: task.employee_name().to_string(),
                    index: row,
                    periods: Vec::new(),
                });
                row
            }
        };
        task.index = row;
        rows[row].periods.push(task);
    }

    Grouping { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::{normalize, SequentialIds};
    use crate::model::RawTask;
    use chrono::NaiveDate;

    fn tasks(rows: &[(&str, &str, &str)]) -> Vec<NormalizedTask> {
        let raws: Vec<RawTask> = rows
            .iter()
            .map(|(name, emp, emp_name)| {
                RawTask::new(*name, *emp, *emp_name).with_dates(Some("2024-01-01"), Some("2024-01-02"))
            })
            .collect();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        normalize(&raws, "YYYY-MM-DD", today, &mut SequentialIds::new())
    }

    #[test]
    fn same_employee_shares_a_row() {
        let grouping = group(tasks(&[("Early", "E1", "Ann"), ("Late", "E1", "Ann")]));
        assert_eq!(grouping.rows.len(), 1);
        let row = &grouping.rows[0];
        assert_eq!(row.index, 0);
        assert_eq!(row.periods.len(), 2);
        assert_eq!(grouping.flat_index_of("Early_0"), Some(0));
        assert_eq!(grouping.flat_index_of("Late_1"), Some(1));
    }

    #[test]
    fn rows_follow_first_appearance_and_keep_period_order() {
        let grouping = group(tasks(&[
            ("a", "E2", "Bob"),
            ("b", "E1", "Ann"),
            ("c", "E2", "Robert"),
            ("d", "E3", "Cid"),
            ("e", "E1", "Ann"),
        ]));
        let ids: Vec<_> = grouping.rows.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E1", "E3"]);
        assert_eq!(grouping.rows[0].employee_name, "Bob");

        let order: Vec<_> = grouping.periods().map(|p| p.name()).collect();
        assert_eq!(order, vec!["a", "c", "b", "e", "d"]);
        let row_index: Vec<_> = grouping.periods().map(|p| p.index).collect();
        assert_eq!(row_index, vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn flat_lookups_walk_rows() {
        let grouping = group(tasks(&[("a", "E1", "Ann"), ("b", "E2", "Bob"), ("c", "E1", "Ann")]));
        assert_eq!(grouping.period_count(), 3);
        assert_eq!(grouping.period(1).map(|p| p.name()), Some("c"));
        assert_eq!(grouping.row_of(2).map(|r| r.employee_id.as_str()), Some("E2"));
        assert!(grouping.row_of(3).is_none());
    }

    #[test]
    fn empty_input_gives_no_rows() {
        let grouping = group(Vec::new());
        assert!(grouping.rows.is_empty());
        assert!(grouping.is_empty());
    }
}

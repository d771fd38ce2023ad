use std::path::Path;

use tracing::warn;

use crate::error::{GanttError, Result};
use crate::model::{Dependencies, RawTask, TaskSheet};

/// Map a status string to a progress percentage.
fn status_to_progress(status: &str) -> f32 {
    let status = status.trim();
    if let Ok(value) = status.trim_end_matches('%').trim().parse::<f32>() {
        return value.clamp(0.0, 100.0);
    }
    match status.to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" | "worked" => 100.0,
        "in progress" | "in-progress" | "active" | "started" => 50.0,
        "released" | "planned" | "confirmed" => 25.0,
        _ => 0.0,
    }
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
    EmployeeId,
    EmployeeName,
    Dependencies,
    Progress,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "periodid" | "shiftid" => Some(Column::Id),

        "name" | "task" | "taskname" | "label" | "title" | "shift" | "activity" => Some(Column::Name),

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "until" => Some(Column::End),

        "employeeid" | "employee" | "empid" | "staffid" | "worker" => Some(Column::EmployeeId),

        "employeename" | "staffname" | "workername" | "person" => Some(Column::EmployeeName),

        "dependencies" | "dependson" | "depends" | "after" => Some(Column::Dependencies),

        "progress" | "status" | "state" | "percent" => Some(Column::Progress),

        _ => None,
    }
}

/// Import task records from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches headers
/// flexibly ("Employee Name", "start_date", ...). Dates are kept as text;
/// the normalizer decides what they mean. Rows without a name or an
/// employee are skipped. Returns `(sheet, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(TaskSheet, usize)> {
    let content = std::fs::read_to_string(path)?;

    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |col: Column| col_map.contains(&Some(col));
    if !has(Column::Name) || !has(Column::EmployeeId) || !(has(Column::Start) || has(Column::End)) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(GanttError::MissingColumns(found.join(", ")));
    }

    let mut sheet = TaskSheet::new(super::file::sheet_name(path));
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "skipping CSV row");
                skipped += 1;
                continue;
            }
        };

        let mut task = RawTask::default();
        for (field, col) in record.iter().zip(&col_map) {
            let Some(col) = col else { continue };
            let value = field.trim();
            let text = || (!value.is_empty()).then(|| value.to_string());
            match col {
                Column::Id => task.id = text(),
                Column::Name => task.name = value.to_string(),
                Column::Start => task.start_date = text(),
                Column::End => task.end_date = text(),
                Column::EmployeeId => task.employee_id = value.to_string(),
                Column::EmployeeName => task.employee_name = value.to_string(),
                Column::Dependencies => task.dependencies = text().map(Dependencies::Csv),
                Column::Progress => task.progress = status_to_progress(value),
            }
        }

        if task.name.is_empty() || task.employee_id.is_empty() {
            warn!(row, "skipping CSV row without a name or employee");
            skipped += 1;
            continue;
        }
        if task.employee_name.is_empty() {
            task.employee_name = task.employee_id.clone();
        }
        sheet.tasks.push(task);
    }

    if sheet.tasks.is_empty() {
        return Err(GanttError::EmptySheet(path.display().to_string()));
    }

    Ok((sheet, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rota.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn progress_from_numbers_or_words() {
        assert_eq!(status_to_progress("40%"), 40.0);
        assert_eq!(status_to_progress("250"), 100.0);
        assert_eq!(status_to_progress("Done"), 100.0);
        assert_eq!(status_to_progress("whatever"), 0.0);
    }

    #[test]
    fn imports_flexible_headers_and_keeps_raw_dates() {
        let (_dir, path) = write(
            "Shift ID;Shift;Start Date;End Date;Employee ID;Employee Name;Depends On;Status\n\
             s1;Early;2024-01-02;2024-01-03;E1;Ann;;done\n\
             s2;Late;someday;;E2;Bob;s1, s3;\n",
        );
        let (sheet, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(sheet.name, "rota");
        assert_eq!(sheet.tasks.len(), 2);

        let early = &sheet.tasks[0];
        assert_eq!(early.id.as_deref(), Some("s1"));
        assert_eq!(early.start_date.as_deref(), Some("2024-01-02"));
        assert_eq!(early.progress, 100.0);
        assert_eq!(early.dependencies, None);

        let late = &sheet.tasks[1];
        assert_eq!(late.start_date.as_deref(), Some("someday"));
        assert_eq!(late.end_date, None);
        assert_eq!(late.dependencies.as_ref().map(|d| d.to_ids()), Some(vec!["s1".into(), "s3".into()]));
    }

    #[test]
    fn rows_without_employee_are_skipped() {
        let (_dir, path) = write("name,start,employee\nA,2024-01-01,E1\nB,2024-01-02,\n");
        let (sheet, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(sheet.tasks[0].employee_name, "E1");
    }

    #[test]
    fn missing_columns_are_reported() {
        let (_dir, path) = write("title,when\nA,2024-01-01\n");
        assert!(matches!(import_csv(&path), Err(GanttError::MissingColumns(found)) if found == "title, when"));
    }

    #[test]
    fn header_only_file_is_empty() {
        let (_dir, path) = write("name,start,employee\n");
        assert!(matches!(import_csv(&path), Err(GanttError::EmptySheet(_))));
    }
}

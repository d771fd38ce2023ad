//! Pixel geometry for rows, bars and markers.

use chrono::NaiveDateTime;

use crate::calendar::{self, Unit};
use crate::config::GanttOptions;
use crate::model::{DateRange, Grouping, ScaleParams, ViewMode};

/// Vertical band occupied by one employee row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub y_offset: f32,
    pub height: f32,
}

impl RowGeometry {
    /// y of the line separating this row from the next.
    pub fn bottom(&self) -> f32 {
        self.y_offset + self.height
    }
}

/// Placement of one working period's bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Row-major position across all rows.
    pub flat_index: usize,
    pub row: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Rows stacked under the header, each as tall as its periods.
pub fn row_geometry(grouping: &Grouping, options: &GanttOptions) -> Vec<RowGeometry> {
    let mut y = options.header_height + options.padding / 2.0;
    grouping
        .rows
        .iter()
        .map(|row| {
            let height = row.periods.len() as f32 * options.slot_height();
            let geometry = RowGeometry { y_offset: y, height };
            y += height;
            geometry
        })
        .collect()
}

/// Horizontal offset of `date` from the start of the range.
pub fn x_for(date: NaiveDateTime, range: &DateRange, scale: &ScaleParams) -> f32 {
    let hours = calendar::diff(date, range.start, Unit::Hour);
    scale.hours_to_px(hours as f32)
}

/// One bar per working period, in flattened order.
pub fn bar_geometry(
    grouping: &Grouping,
    range: &DateRange,
    scale: &ScaleParams,
    options: &GanttOptions,
) -> Vec<BarGeometry> {
    let top = options.header_height + options.padding / 2.0;
    grouping
        .rows
        .iter()
        .flat_map(|row| row.periods.iter().map(move |period| (row.index, period)))
        .enumerate()
        .map(|(j, (row, period))| {
            let hours = calendar::diff(period.end, period.start, Unit::Hour);
            BarGeometry {
                flat_index: j,
                row,
                x: x_for(period.start, range, scale),
                y: top + j as f32 * options.slot_height(),
                width: scale.hours_to_px(hours as f32).max(options.min_bar_width),
                height: options.bar_height,
            }
        })
        .collect()
}

/// x of the "today" marker.
pub fn today_x(now: NaiveDateTime, range: &DateRange, scale: &ScaleParams) -> f32 {
    x_for(now, range, scale)
}

/// Horizontal scroll offset that brings the earliest period into view with
/// one column of lead-in. Clamped at zero.
pub fn scroll_position(grouping: &Grouping, range: &DateRange, scale: &ScaleParams) -> Option<f32> {
    let earliest = grouping.periods().map(|p| p.start).min()?;
    Some((x_for(earliest, range, scale) - scale.column_width).max(0.0))
}

/// Round a drag delta to the nearest snap unit of `mode`. Ties round down.
pub fn snap(dx: f32, mode: ViewMode, scale: &ScaleParams) -> f32 {
    let unit = scale.column_width / mode.descriptor().snap_divisor;
    if unit <= 0.0 {
        return dx;
    }
    let rem = dx.rem_euclid(unit);
    let floor = dx - rem;
    if rem <= unit / 2.0 {
        floor
    } else {
        floor + unit
    }
}

/// Employee name for the side column, centred on the row's first bar.
#[derive(Debug, Clone, PartialEq)]
pub struct NameLabel {
    pub row: usize,
    pub text: String,
    pub y: f32,
}

pub fn name_labels(grouping: &Grouping, rows: &[RowGeometry], options: &GanttOptions) -> Vec<NameLabel> {
    grouping
        .rows
        .iter()
        .zip(rows)
        .map(|(row, geometry)| NameLabel {
            row: row.index,
            text: row.employee_name.clone(),
            y: geometry.y_offset + options.slot_height() / 2.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::group::group;
    use crate::engine::normalize::{normalize, SequentialIds};
    use crate::model::RawTask;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn grouping(periods: &[(&str, &str, &str)]) -> Grouping {
        let raws: Vec<RawTask> = periods
            .iter()
            .map(|(emp, s, e)| RawTask::new("Shift", *emp, *emp).with_dates(Some(*s), Some(*e)))
            .collect();
        group(normalize(&raws, "YYYY-MM-DD", day(2024, 1, 1), &mut SequentialIds::new()))
    }

    fn range() -> DateRange {
        DateRange {
            start: day(2024, 1, 1),
            end: day(2024, 3, 1),
        }
    }

    #[test]
    fn rows_stack_by_period_count() {
        let g = grouping(&[
            ("E1", "2024-01-02", "2024-01-03"),
            ("E2", "2024-01-02", "2024-01-03"),
            ("E1", "2024-01-05", "2024-01-06"),
            ("E3", "2024-01-02", "2024-01-03"),
        ]);
        let options = GanttOptions::default();
        let rows = row_geometry(&g, &options);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], RowGeometry { y_offset: 59.0, height: 76.0 });
        assert_eq!(rows[1], RowGeometry { y_offset: 135.0, height: 38.0 });
        assert_eq!(rows[2].y_offset, 173.0);

        let total: f32 = rows.iter().map(|r| r.height).sum();
        assert_eq!(total, g.period_count() as f32 * options.slot_height());
    }

    #[test]
    fn bars_are_numbered_across_rows() {
        let g = grouping(&[
            ("E1", "2024-01-02", "2024-01-03"),
            ("E2", "2024-01-10", "2024-01-10"),
            ("E1", "2024-01-05", "2024-01-06"),
        ]);
        let options = GanttOptions::default();
        let scale = ViewMode::Day.scale();
        let bars = bar_geometry(&g, &range(), &scale, &options);

        let rows: Vec<_> = bars.iter().map(|b| b.row).collect();
        assert_eq!(rows, vec![0, 0, 1]);
        let ys: Vec<_> = bars.iter().map(|b| b.y).collect();
        assert_eq!(ys, vec![59.0, 97.0, 135.0]);

        assert_eq!(bars[0].x, 38.0);
        assert_eq!(bars[0].width, 2.0 * 38.0);
        assert_eq!(bars[1].x, 4.0 * 38.0);
        assert_eq!(bars[2].x, 9.0 * 38.0);
        assert_eq!(bars[2].width, 38.0);
        assert_eq!(bars[2].height, 20.0);
    }

    #[test]
    fn narrow_bars_get_the_minimum_width() {
        let g = grouping(&[("E1", "2024-01-02 10:00", "2024-01-02 11:00")]);
        let options = GanttOptions::default();
        let bars = bar_geometry(&g, &range(), &ViewMode::Week.scale(), &options);
        assert_eq!(bars[0].width, options.min_bar_width);
    }

    #[test]
    fn scroll_leads_in_by_one_column() {
        let g = grouping(&[("E1", "2024-01-11", "2024-01-12"), ("E2", "2024-01-06", "2024-01-07")]);
        let scale = ViewMode::Day.scale();
        assert_eq!(scroll_position(&g, &range(), &scale), Some(4.0 * 38.0));

        let early = grouping(&[("E1", "2024-01-01", "2024-01-02")]);
        assert_eq!(scroll_position(&early, &range(), &scale), Some(0.0));
        assert_eq!(scroll_position(&Grouping::default(), &range(), &scale), None);
    }

    #[test]
    fn today_marker_uses_bar_formula() {
        let scale = ViewMode::HalfDay.scale();
        let now = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(today_x(now, &range(), &scale), 42.0 / 12.0 * 38.0);
    }

    #[test]
    fn snap_rounds_to_column_in_day_mode() {
        let scale = ViewMode::Day.scale();
        assert_eq!(snap(10.0, ViewMode::Day, &scale), 0.0);
        assert_eq!(snap(19.0, ViewMode::Day, &scale), 0.0);
        assert_eq!(snap(20.0, ViewMode::Day, &scale), 38.0);
        assert_eq!(snap(50.0, ViewMode::Day, &scale), 38.0);
        assert_eq!(snap(-10.0, ViewMode::Day, &scale), 0.0);
        assert_eq!(snap(-30.0, ViewMode::Day, &scale), -38.0);
    }

    #[test]
    fn snap_uses_sub_column_units() {
        let week = ViewMode::Week.scale();
        assert_eq!(snap(25.0, ViewMode::Week, &week), 20.0);
        assert_eq!(snap(31.0, ViewMode::Week, &week), 40.0);

        let month = ViewMode::Month.scale();
        assert_eq!(snap(9.0, ViewMode::Month, &month), 8.0);
        assert_eq!(snap(11.0, ViewMode::Month, &month), 12.0);
    }

    #[test]
    fn name_labels_centre_on_first_bar() {
        let g = grouping(&[("E1", "2024-01-02", "2024-01-03"), ("E1", "2024-01-04", "2024-01-05"), ("E2", "2024-01-02", "2024-01-03")]);
        let options = GanttOptions::default();
        let labels = name_labels(&g, &row_geometry(&g, &options), &options);
        assert_eq!(labels[0].text, "E1");
        assert_eq!(labels[0].y, 59.0 + 19.0);
        assert_eq!(labels[1].y, 59.0 + 76.0 + 19.0);
    }
}

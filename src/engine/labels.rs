//! Header text for each tick.
//!
//! A field is only printed when it differs from the previous tick, so a run
//! of columns in the same month shows the month name once.

use chrono::{Datelike, NaiveDateTime};

use crate::calendar::{self, DateFormatter, Unit};
use crate::config::GanttOptions;
use crate::model::timeline::{LowerText, UpperText};
use crate::model::{Tick, ViewMode};

/// Upper and lower header text for one column. Empty text is not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DateLabel {
    pub upper_text: String,
    pub lower_text: String,
    pub upper_x: f32,
    pub lower_x: f32,
    pub upper_y: f32,
    pub lower_y: f32,
}

impl DateLabel {
    /// Whether an upper label of `text_width` pixels still ends inside a grid
    /// `grid_width` pixels wide. Renderers drop labels for which this fails.
    pub fn upper_fits(&self, text_width: f32, grid_width: f32) -> bool {
        self.upper_x + text_width <= grid_width
    }
}

/// Label for `tick`. Without a previous tick, the same instant one year
/// earlier stands in, so the year always counts as changed.
pub fn label_for(
    tick: &Tick,
    previous: Option<&Tick>,
    mode: ViewMode,
    options: &GanttOptions,
    formatter: &dyn DateFormatter,
) -> DateLabel {
    let date = tick.date;
    let last = previous
        .map(|t| t.date)
        .unwrap_or_else(|| calendar::add(date, -1, Unit::Year));
    let descriptor = mode.descriptor();
    let column_width = descriptor.scale.column_width;
    let locale = options.language.as_str();
    let fmt = |pattern: &str| formatter.format(date, pattern, locale);

    let day_changed = date.day() != last.day();
    let month_changed = date.month() != last.month();
    let year_changed = date.year() != last.year();

    let lower_text = match descriptor.lower {
        LowerText::HourOfDay => fmt("HH"),
        LowerText::DayOnNewDay if day_changed => fmt("D"),
        LowerText::DayOnNewDay => String::new(),
        LowerText::DayWithMonthOnNewMonth if month_changed => fmt("D MMM"),
        LowerText::DayWithMonthOnNewMonth => fmt("D"),
        LowerText::MonthName => fmt("MMMM"),
        LowerText::Year => fmt("YYYY"),
    };

    let upper_text = match descriptor.upper {
        UpperText::DayMonthOnNewDay if day_changed => fmt("D MMM"),
        UpperText::DayOnNewDay if day_changed && month_changed => fmt("D MMM"),
        UpperText::DayOnNewDay if day_changed => fmt("D"),
        UpperText::MonthOnNewMonth if month_changed => fmt("MMMM"),
        UpperText::YearOnNewYear if year_changed => fmt("YYYY"),
        _ => String::new(),
    };

    let base_x = tick.column_index as f32 * column_width;
    DateLabel {
        upper_text,
        lower_text,
        upper_x: base_x + descriptor.upper_offset * column_width,
        lower_x: base_x + descriptor.lower_offset * column_width,
        upper_y: options.header_height - 25.0,
        lower_y: options.header_height,
    }
}

/// Labels for a whole tick sequence, each compared with its predecessor.
pub fn labels_for_ticks(
    ticks: &[Tick],
    mode: ViewMode,
    options: &GanttOptions,
    formatter: &dyn DateFormatter,
) -> Vec<DateLabel> {
    let mut previous: Option<&Tick> = None;
    ticks
        .iter()
        .map(|tick| {
            let label = label_for(tick, previous, mode, options, formatter);
            previous = Some(tick);
            label
        })
        .collect()
}

/// Convenience for callers that only have a bare instant.
pub fn label_for_date(
    date: NaiveDateTime,
    previous: Option<NaiveDateTime>,
    column_index: usize,
    mode: ViewMode,
    options: &GanttOptions,
    formatter: &dyn DateFormatter,
) -> DateLabel {
    let tick = Tick { date, column_index };
    let prev = previous.map(|date| Tick {
        date,
        column_index: column_index.saturating_sub(1),
    });
    label_for(&tick, prev.as_ref(), mode, options, formatter)
}

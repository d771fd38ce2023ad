//! Column ticks and the grid drawn behind the bars.

use chrono::{Datelike, NaiveDateTime};

use crate::calendar::{self, Unit};
use crate::config::GanttOptions;
use crate::model::timeline::{ThickTicks, TickStep};
use crate::model::{DateRange, ScaleParams, Tick, ViewMode};

/// Column boundaries from `range.start` until the first tick at or past
/// `range.end`, which is included.
pub fn generate_ticks(range: &DateRange, mode: ViewMode, scale: &ScaleParams) -> Vec<Tick> {
    let step = mode.descriptor().step;
    let mut ticks = vec![Tick {
        date: range.start,
        column_index: 0,
    }];
    let mut current = range.start;

    while current < range.end {
        let next = match step {
            TickStep::Year => calendar::add(current, 1, Unit::Year),
            TickStep::Month => calendar::add(current, 1, Unit::Month),
            TickStep::Hours => calendar::add(current, i64::from(scale.hours_per_column), Unit::Hour),
        };
        if next <= current {
            break;
        }
        current = next;
        ticks.push(Tick {
            date: current,
            column_index: ticks.len(),
        });
    }

    ticks
}

/// One vertical grid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x: f32,
    pub date: NaiveDateTime,
    pub thick: bool,
}

/// Vertical lines for every tick. Month columns advance in proportion to
/// the month's length.
pub fn grid_lines(ticks: &[Tick], mode: ViewMode, scale: &ScaleParams) -> Vec<GridLine> {
    let descriptor = mode.descriptor();
    let mut x = 0.0;
    ticks
        .iter()
        .map(|tick| {
            let line = GridLine {
                x,
                date: tick.date,
                thick: is_thick(tick.date, descriptor.thick_ticks),
            };
            x += if descriptor.step == TickStep::Month {
                calendar::days_in_month(tick.date) as f32 * scale.column_width / 30.0
            } else {
                scale.column_width
            };
            line
        })
        .collect()
}

fn is_thick(date: NaiveDateTime, rule: ThickTicks) -> bool {
    match rule {
        ThickTicks::None => false,
        ThickTicks::FirstOfMonth => date.day() == 1,
        ThickTicks::FirstWeekOfMonth => (1..8).contains(&date.day()),
        ThickTicks::QuarterStart => date.month0() % 3 == 0,
    }
}

/// Overall drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridSize {
    pub width: f32,
    pub height: f32,
}

pub fn grid_size(tick_count: usize, period_count: usize, scale: &ScaleParams, options: &GanttOptions) -> GridSize {
    GridSize {
        width: tick_count as f32 * scale.column_width,
        height: options.header_height + options.padding + period_count as f32 * options.slot_height(),
    }
}

/// Axis-aligned rectangle in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Column highlighting today. Only Day mode has one.
pub fn today_highlight(
    range: &DateRange,
    today: NaiveDateTime,
    mode: ViewMode,
    period_count: usize,
    options: &GanttOptions,
) -> Option<Highlight> {
    if mode != ViewMode::Day {
        return None;
    }
    let scale = mode.scale();
    let hours = calendar::diff(today, range.start, Unit::Hour);
    Some(Highlight {
        x: scale.hours_to_px(hours as f32),
        y: 0.0,
        width: scale.column_width,
        height: period_count as f32 * options.slot_height() + options.header_height + options.padding / 2.0,
    })
}

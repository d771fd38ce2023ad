use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::Unit;
use crate::error::GanttError;

/// Controls the time granularity of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "Quarter Day")]
    QuarterDay,
    #[serde(rename = "Half Day")]
    HalfDay,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl ViewMode {
    pub const ALL: [ViewMode; 6] = [
        ViewMode::QuarterDay,
        ViewMode::HalfDay,
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Year,
    ];

    /// Human-readable name, also accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::QuarterDay => "Quarter Day",
            ViewMode::HalfDay => "Half Day",
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Year => "Year",
        }
    }

    pub fn scale(self) -> ScaleParams {
        self.descriptor().scale
    }

    /// The single table row every mode-dependent computation reads from.
    pub fn descriptor(self) -> ModeDescriptor {
        match self {
            ViewMode::QuarterDay => ModeDescriptor {
                scale: ScaleParams::new(6, 38.0),
                padding: RangePadding::Symmetric(7, Unit::Day),
                step: TickStep::Hours,
                lower: LowerText::HourOfDay,
                upper: UpperText::DayMonthOnNewDay,
                lower_offset: 2.0,
                upper_offset: 0.0,
                thick_ticks: ThickTicks::None,
                snap_divisor: 1.0,
            },
            ViewMode::HalfDay => ModeDescriptor {
                scale: ScaleParams::new(12, 38.0),
                padding: RangePadding::Symmetric(7, Unit::Day),
                step: TickStep::Hours,
                lower: LowerText::HourOfDay,
                upper: UpperText::DayOnNewDay,
                lower_offset: 1.0,
                upper_offset: 0.0,
                thick_ticks: ThickTicks::None,
                snap_divisor: 1.0,
            },
            ViewMode::Day => ModeDescriptor {
                scale: ScaleParams::new(24, 38.0),
                padding: RangePadding::Symmetric(1, Unit::Month),
                step: TickStep::Hours,
                lower: LowerText::DayOnNewDay,
                upper: UpperText::MonthOnNewMonth,
                lower_offset: 0.5,
                upper_offset: 15.0,
                thick_ticks: ThickTicks::FirstOfMonth,
                snap_divisor: 1.0,
            },
            ViewMode::Week => ModeDescriptor {
                scale: ScaleParams::new(24 * 7, 140.0),
                padding: RangePadding::Symmetric(1, Unit::Month),
                step: TickStep::Hours,
                lower: LowerText::DayWithMonthOnNewMonth,
                upper: UpperText::MonthOnNewMonth,
                lower_offset: 0.0,
                upper_offset: 2.0,
                thick_ticks: ThickTicks::FirstWeekOfMonth,
                snap_divisor: 7.0,
            },
            ViewMode::Month => ModeDescriptor {
                scale: ScaleParams::new(24 * 30, 120.0),
                padding: RangePadding::YearAligned,
                step: TickStep::Month,
                lower: LowerText::MonthName,
                upper: UpperText::YearOnNewYear,
                lower_offset: 0.5,
                upper_offset: 6.0,
                thick_ticks: ThickTicks::QuarterStart,
                snap_divisor: 30.0,
            },
            ViewMode::Year => ModeDescriptor {
                scale: ScaleParams::new(24 * 365, 120.0),
                padding: RangePadding::Symmetric(2, Unit::Year),
                step: TickStep::Year,
                lower: LowerText::Year,
                upper: UpperText::YearOnNewYear,
                lower_offset: 0.5,
                upper_offset: 15.0,
                thick_ticks: ThickTicks::None,
                snap_divisor: 1.0,
            },
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = GanttError;

    /// Accepts the display label (`"Quarter Day"`) as well as compact forms
    /// such as `quarter_day` or `QuarterDay`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "quarterday" => Ok(ViewMode::QuarterDay),
            "halfday" => Ok(ViewMode::HalfDay),
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "year" => Ok(ViewMode::Year),
            _ => Err(GanttError::UnknownViewMode(s.to_string())),
        }
    }
}

/// Column sizing for a view mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub hours_per_column: u32,
    pub column_width: f32,
}

impl ScaleParams {
    pub const fn new(hours_per_column: u32, column_width: f32) -> Self {
        Self {
            hours_per_column,
            column_width,
        }
    }

    /// Pixels covered by `hours` of elapsed time.
    pub fn hours_to_px(&self, hours: f32) -> f32 {
        hours / self.hours_per_column as f32 * self.column_width
    }

    /// Hours of elapsed time covered by `px` pixels.
    pub fn px_to_hours(&self, px: f32) -> f32 {
        px / self.column_width * self.hours_per_column as f32
    }
}

impl Default for ScaleParams {
    fn default() -> Self {
        ViewMode::default().scale()
    }
}

/// How the raw data bounds are widened before ticks are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePadding {
    /// Subtract from the start and add to the end.
    Symmetric(i64, Unit),
    /// Start snaps back to January 1st, end gains one year.
    YearAligned,
}

/// How consecutive ticks are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStep {
    /// `hours_per_column` hours.
    Hours,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerText {
    HourOfDay,
    DayOnNewDay,
    DayWithMonthOnNewMonth,
    MonthName,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperText {
    DayMonthOnNewDay,
    DayOnNewDay,
    MonthOnNewMonth,
    YearOnNewYear,
}

/// Which grid lines are drawn heavier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThickTicks {
    None,
    FirstOfMonth,
    FirstWeekOfMonth,
    QuarterStart,
}

/// Everything that varies between view modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDescriptor {
    pub scale: ScaleParams,
    pub padding: RangePadding,
    pub step: TickStep,
    pub lower: LowerText,
    pub upper: UpperText,
    /// Lower label x offset, in column widths.
    pub lower_offset: f32,
    /// Upper label x offset, in column widths.
    pub upper_offset: f32,
    pub thick_ticks: ThickTicks,
    /// Snap unit is `column_width / snap_divisor`.
    pub snap_divisor: f32,
}

/// The global visible bound of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One column boundary on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub date: NaiveDateTime,
    pub column_index: usize,
}

//! Derives the visible date range from the grouped periods.

use crate::calendar::{self, Unit};
use crate::model::timeline::RangePadding;
use crate::model::{DateRange, Grouping, ViewMode};

/// Bounds of all working periods, day-truncated and padded for `mode`.
/// `None` when there are no periods.
pub fn compute_range(grouping: &Grouping, mode: ViewMode) -> Option<DateRange> {
    let mut periods = grouping.periods();
    let first = periods.next()?;
    let (raw_start, raw_end) = periods.fold((first.start, first.end), |(start, end), p| {
        (start.min(p.start), end.max(p.end))
    });

    let start = calendar::start_of(raw_start, Unit::Day);
    let end = calendar::start_of(raw_end, Unit::Day);

    let (start, end) = match mode.descriptor().padding {
        RangePadding::Symmetric(amount, unit) => (
            calendar::add(start, -amount, unit),
            calendar::add(end, amount, unit),
        ),
        RangePadding::YearAligned => (
            calendar::start_of(start, Unit::Year),
            calendar::add(end, 1, Unit::Year),
        ),
    };

    Some(DateRange { start, end })
}

//! Repairs raw task records into renderable working periods.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::calendar::{self, Parsed, Unit};
use crate::model::{NormalizedTask, RawTask};

/// Durations longer than this many years are treated as a missing end.
const MAX_SPAN_YEARS: i64 = 10;
/// Length of a repaired period, in days.
const DEFAULT_SPAN_DAYS: i64 = 2;

/// Supplies ids for tasks that arrive without one.
pub trait IdProvider {
    fn task_id(&mut self, name: &str) -> String;
}

/// `<name>_<10 random hex chars>`. Uniqueness is best-effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdProvider for RandomIds {
    fn task_id(&mut self, name: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}", name, &suffix[..10])
    }
}

/// `<name>_<n>` with a running counter; deterministic.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIds {
    fn task_id(&mut self, name: &str) -> String {
        let id = format!("{}_{}", name, self.next);
        self.next += 1;
        id
    }
}

/// Normalize every task. Never rejects a record.
pub fn normalize(
    raw_tasks: &[RawTask],
    date_format: &str,
    today: NaiveDateTime,
    ids: &mut dyn IdProvider,
) -> Vec<NormalizedTask> {
    raw_tasks
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize_task(raw, i, date_format, today, ids))
        .collect()
}

/// Normalize one record. `position` seeds `index` until grouping reassigns it.
pub fn normalize_task(
    raw: &RawTask,
    position: usize,
    date_format: &str,
    today: NaiveDateTime,
    ids: &mut dyn IdProvider,
) -> NormalizedTask {
    let parsed_start = raw
        .start_date
        .as_deref()
        .and_then(|s| calendar::parse(s, date_format));
    let mut parsed_end = raw
        .end_date
        .as_deref()
        .and_then(|s| calendar::parse_detailed(s, date_format));

    if let (Some(start), Some(end)) = (parsed_start, parsed_end) {
        if calendar::diff(end.at, start, Unit::Year) > MAX_SPAN_YEARS {
            parsed_end = None;
        }
    }

    let invalid = parsed_start.is_none() || parsed_end.is_none();

    let (start, end) = match (parsed_start, parsed_end) {
        (Some(start), Some(end)) => {
            let end = end_of_day(end);
            if end > start {
                (start, end)
            } else {
                (start, calendar::add(start, DEFAULT_SPAN_DAYS, Unit::Day))
            }
        }
        (Some(start), None) => (start, calendar::add(start, DEFAULT_SPAN_DAYS, Unit::Day)),
        (None, Some(end)) => (calendar::add(end.at, -DEFAULT_SPAN_DAYS, Unit::Day), end_of_day(end)),
        (None, None) => (today, calendar::add(today, DEFAULT_SPAN_DAYS, Unit::Day)),
    };

    let dependencies = raw
        .dependencies
        .as_ref()
        .map(|d| d.to_ids())
        .unwrap_or_default();

    let mut raw = raw.clone();
    let id = match raw.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let id = ids.task_id(&raw.name);
            raw.id = Some(id.clone());
            id
        }
    };

    NormalizedTask {
        raw,
        id,
        start,
        end,
        invalid,
        index: position,
        dependencies,
    }
}

/// A bare calendar date as an end means "through the end of that day".
/// An explicit time, midnight included, is kept as written.
fn end_of_day(end: Parsed) -> NaiveDateTime {
    if end.date_only {
        calendar::add(end.at, 24, Unit::Hour)
    } else {
        end.at
    }
}

//! Pointer-driven move and resize of bars.
//!
//! The host feeds pointer events in; every delta is snapped before it is
//! applied, and releasing the pointer turns the gesture into period edits
//! for the engine to apply.

use chrono::{Duration, NaiveDateTime};

use super::geometry::{snap, BarGeometry};
use crate::model::{Grouping, ScaleParams, ViewMode};

/// Part of a bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Body,
    Left,
    Right,
}

/// An in-flight gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Flattened index of the grabbed bar.
    pub bar: usize,
    /// Flattened indices of bars that move along with it.
    pub followers: Vec<usize>,
    pub origin_x: f32,
    /// Snapped horizontal delta in pixels.
    pub dx: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(Gesture),
    ResizingLeft(Gesture),
    ResizingRight(Gesture),
}

/// New bounds for one working period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodEdit {
    pub task_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interaction {
    /// Start a gesture. Resizing the right edge never moves followers.
    pub fn press(bar: usize, handle: Handle, pointer_x: f32, followers: Vec<usize>) -> Self {
        let gesture = |followers| Gesture {
            bar,
            followers,
            origin_x: pointer_x,
            dx: 0.0,
        };
        match handle {
            Handle::Body => Interaction::Dragging(gesture(followers)),
            Handle::Left => Interaction::ResizingLeft(gesture(followers)),
            Handle::Right => Interaction::ResizingRight(gesture(Vec::new())),
        }
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging(g) | Interaction::ResizingLeft(g) | Interaction::ResizingRight(g) => Some(g),
        }
    }

    fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging(g) | Interaction::ResizingLeft(g) | Interaction::ResizingRight(g) => Some(g),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }

    /// Track the pointer; the stored delta is always snapped.
    pub fn drag_to(&mut self, pointer_x: f32, mode: ViewMode, scale: &ScaleParams) {
        if let Some(g) = self.gesture_mut() {
            g.dx = snap(pointer_x - g.origin_x, mode, scale);
        }
    }

    /// Where `bar` should be drawn while the gesture is in flight.
    pub fn preview(&self, bar: &BarGeometry, min_width: f32) -> BarGeometry {
        let Some(g) = self.gesture() else {
            return *bar;
        };
        let is_primary = bar.flat_index == g.bar;
        if !is_primary && !g.followers.contains(&bar.flat_index) {
            return *bar;
        }

        let mut out = *bar;
        match self {
            Interaction::Dragging(_) => out.x += g.dx,
            Interaction::ResizingLeft(_) if is_primary => {
                let dx = g.dx.min(bar.width - min_width);
                out.x += dx;
                out.width -= dx;
            }
            Interaction::ResizingLeft(_) => out.x += g.dx,
            Interaction::ResizingRight(_) => out.width = (bar.width + g.dx).max(min_width),
            Interaction::Idle => {}
        }
        out
    }

    /// Finish the gesture and return to idle. Yields one edit per affected
    /// period, or nothing when the snapped delta is zero.
    pub fn release(&mut self, grouping: &Grouping, mode: ViewMode, scale: &ScaleParams) -> Vec<PeriodEdit> {
        let state = std::mem::take(self);
        let Some(g) = state.gesture() else {
            return Vec::new();
        };
        if g.dx == 0.0 {
            return Vec::new();
        }

        let delta = px_to_duration(g.dx, scale);
        let shortest = px_to_duration(scale.column_width / mode.descriptor().snap_divisor, scale);
        let mut edits = Vec::new();

        for (index, is_primary) in std::iter::once((g.bar, true)).chain(g.followers.iter().map(|&f| (f, false))) {
            let Some(period) = grouping.period(index) else {
                continue;
            };
            let (start, end) = match (&state, is_primary) {
                (Interaction::ResizingLeft(_), true) => ((period.start + delta).min(period.end - shortest), period.end),
                (Interaction::ResizingRight(_), true) => (period.start, (period.end + delta).max(period.start + shortest)),
                _ => (period.start + delta, period.end + delta),
            };
            edits.push(PeriodEdit {
                task_id: period.id.clone(),
                start,
                end,
            });
        }
        edits
    }
}

/// Elapsed time represented by `px` pixels, to the minute.
pub fn px_to_duration(px: f32, scale: &ScaleParams) -> Duration {
    Duration::minutes((scale.px_to_hours(px) * 60.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::group::group;
    use crate::engine::normalize::{normalize, SequentialIds};
    use crate::model::RawTask;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn grouping() -> Grouping {
        let raws = vec![
            RawTask::new("a", "E1", "Ann").with_dates(Some("2024-01-02"), Some("2024-01-03")),
            RawTask::new("b", "E2", "Bob").with_dates(Some("2024-01-05"), Some("2024-01-05")),
        ];
        group(normalize(&raws, "YYYY-MM-DD", at(2024, 1, 1, 0), &mut SequentialIds::new()))
    }

    fn bar(flat_index: usize, x: f32, width: f32) -> BarGeometry {
        BarGeometry {
            flat_index,
            row: flat_index,
            x,
            y: 0.0,
            width,
            height: 20.0,
        }
    }

    #[test]
    fn small_drag_produces_no_edit() {
        let scale = ViewMode::Day.scale();
        let mut gesture = Interaction::press(0, Handle::Body, 100.0, Vec::new());
        gesture.drag_to(110.0, ViewMode::Day, &scale);
        assert_eq!(gesture.gesture().map(|g| g.dx), Some(0.0));
        assert!(gesture.release(&grouping(), ViewMode::Day, &scale).is_empty());
        assert!(!gesture.is_active());
    }

    #[test]
    fn column_drag_moves_period_and_followers_by_a_day() {
        let scale = ViewMode::Day.scale();
        let mut gesture = Interaction::press(0, Handle::Body, 100.0, vec![1]);
        gesture.drag_to(140.0, ViewMode::Day, &scale);

        let preview = gesture.preview(&bar(1, 152.0, 38.0), 6.0);
        assert_eq!(preview.x, 190.0);

        let edits = gesture.release(&grouping(), ViewMode::Day, &scale);
        assert_eq!(
            edits,
            vec![
                PeriodEdit { task_id: "a_0".into(), start: at(2024, 1, 3, 0), end: at(2024, 1, 5, 0) },
                PeriodEdit { task_id: "b_1".into(), start: at(2024, 1, 6, 0), end: at(2024, 1, 7, 0) },
            ]
        );
    }

    #[test]
    fn left_resize_moves_start_only() {
        let scale = ViewMode::Day.scale();
        let mut gesture = Interaction::press(0, Handle::Left, 38.0, Vec::new());
        gesture.drag_to(0.0, ViewMode::Day, &scale);

        let preview = gesture.preview(&bar(0, 38.0, 76.0), 6.0);
        assert_eq!((preview.x, preview.width), (0.0, 114.0));

        let edits = gesture.release(&grouping(), ViewMode::Day, &scale);
        assert_eq!(edits[0].start, at(2024, 1, 1, 0));
        assert_eq!(edits[0].end, at(2024, 1, 4, 0));
    }

    #[test]
    fn right_resize_ignores_followers_and_keeps_a_minimum() {
        let scale = ViewMode::Day.scale();
        let mut gesture = Interaction::press(0, Handle::Right, 114.0, vec![1]);
        gesture.drag_to(0.0, ViewMode::Day, &scale);

        let preview = gesture.preview(&bar(0, 38.0, 76.0), 6.0);
        assert_eq!(preview.width, 6.0);
        assert_eq!(gesture.preview(&bar(1, 152.0, 38.0), 6.0).x, 152.0);

        let edits = gesture.release(&grouping(), ViewMode::Day, &scale);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].end, at(2024, 1, 3, 0));
    }

    #[test]
    fn week_drag_snaps_to_days() {
        let scale = ViewMode::Week.scale();
        let mut gesture = Interaction::press(1, Handle::Body, 0.0, Vec::new());
        gesture.drag_to(41.0, ViewMode::Week, &scale);
        let edits = gesture.release(&grouping(), ViewMode::Week, &scale);
        assert_eq!(edits[0].start, at(2024, 1, 7, 0));
    }
}

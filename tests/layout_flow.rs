use chrono::{NaiveDate, NaiveDateTime};
use employee_gantt::calendar::{self, CalendarFormatter, Unit};
use employee_gantt::engine::{Handle, SequentialIds};
use employee_gantt::model::Dependencies;
use employee_gantt::{compute_layout, GanttEngine, GanttEvent, GanttOptions, Layout, RawTask, ViewMode};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(h, 0, 0))
        .expect("valid date")
}

fn now() -> NaiveDateTime {
    at(2024, 1, 10, 9)
}

fn layout(tasks: &[RawTask], mode: ViewMode) -> Layout {
    compute_layout(
        tasks,
        mode,
        &GanttOptions::default(),
        now(),
        &mut SequentialIds::new(),
        &CalendarFormatter,
    )
}

fn period(name: &str, emp: &str, start: Option<&str>, end: Option<&str>) -> RawTask {
    RawTask::new(name, emp, format!("{emp} name")).with_dates(start, end)
}

fn rota() -> Vec<RawTask> {
    vec![
        period("Early", "E1", Some("2024-01-05"), Some("2024-01-07")),
        period("Late", "E2", Some("2024-01-06 14:00"), Some("2024-01-06 22:00")),
        period("Cover", "E1", Some("2024-01-12"), None),
        period("Audit", "E3", Some("2024-02-20"), Some("2024-03-02")),
    ]
}

#[test]
fn bare_end_date_runs_through_the_day() {
    let layout = layout(&[period("Early", "E1", Some("2024-01-05"), Some("2024-01-07"))], ViewMode::Day);
    let p = layout.grouping.period(0).expect("one period");
    assert_eq!(p.start, at(2024, 1, 5, 0));
    assert_eq!(p.end, at(2024, 1, 8, 0));
    assert!(!p.invalid);
}

#[test]
fn dateless_period_starts_today() {
    let layout = layout(&[period("Cover", "E1", None, None)], ViewMode::Day);
    let p = layout.grouping.period(0).expect("one period");
    assert_eq!(p.start, at(2024, 1, 10, 0));
    assert_eq!(p.end, at(2024, 1, 12, 0));
    assert!(p.invalid);
}

#[test]
fn one_employee_one_row() {
    let tasks = vec![
        period("A", "E1", Some("2024-01-05"), Some("2024-01-06")),
        period("B", "E1", Some("2024-01-08"), Some("2024-01-09")),
    ];
    let layout = layout(&tasks, ViewMode::Day);
    assert_eq!(layout.grouping.rows.len(), 1);
    assert_eq!(layout.grouping.rows[0].index, 0);
    assert_eq!(layout.grouping.rows[0].periods.len(), 2);
    let flat: Vec<_> = layout.bars.iter().map(|b| b.flat_index).collect();
    assert_eq!(flat, vec![0, 1]);
}

#[test]
fn month_mode_range_aligns_to_the_year() {
    let layout = layout(&[period("A", "E1", Some("2024-03-01"), Some("2024-03-10"))], ViewMode::Month);
    let range = layout.range.expect("range");
    assert_eq!(range.start, at(2024, 1, 1, 0));
    assert_eq!(range.end, at(2025, 3, 11, 0));
}

#[test]
fn small_day_mode_drag_snaps_back() {
    let engine = GanttEngine::new(GanttOptions::default());
    assert_eq!(engine.snap(10.0), 0.0);
}

#[test]
fn runaway_period_is_cut_to_two_days() {
    let layout = layout(&[period("A", "E1", Some("2024-01-01"), Some("2040-01-01"))], ViewMode::Day);
    let p = layout.grouping.period(0).expect("one period");
    assert_eq!(p.end, at(2024, 1, 3, 0));
    assert!(p.invalid);
}

#[test]
fn ticks_cover_the_range_in_every_mode() {
    for mode in ViewMode::ALL {
        let layout = layout(&rota(), mode);
        let range = layout.range.expect("range");
        assert!(range.start <= range.end, "{mode}");
        assert_eq!(layout.ticks.first().map(|t| t.date), Some(range.start), "{mode}");
        assert!(layout.ticks.windows(2).all(|w| w[0].date < w[1].date), "{mode}");
        assert!(layout.ticks.last().is_some_and(|t| t.date >= range.end), "{mode}");
        assert_eq!(layout.labels.len(), layout.ticks.len(), "{mode}");
        assert_eq!(layout.grid.width, layout.ticks.len() as f32 * mode.scale().column_width, "{mode}");
    }
}

#[test]
fn day_mode_has_one_tick_per_day_plus_the_boundary() {
    let layout = layout(&rota(), ViewMode::Day);
    let range = layout.range.expect("range");
    let days = calendar::diff(range.end, range.start, Unit::Day) as usize;
    assert_eq!(layout.ticks.len(), days + 1);
}

#[test]
fn rows_share_height_by_period_count() {
    let options = GanttOptions::default();
    let layout = layout(&rota(), ViewMode::Week);
    let total: f32 = layout.rows.iter().map(|r| r.height).sum();
    assert_eq!(total, layout.bars.len() as f32 * options.slot_height());
    assert_eq!(layout.row_lines().last(), Some(layout.rows[2].y_offset + layout.rows[2].height));
    assert_eq!(layout.name_labels.len(), 3);
}

#[test]
fn normalizing_twice_keeps_the_dates() {
    let first = layout(&rota(), ViewMode::Day);
    let raws: Vec<RawTask> = first.grouping.periods().map(|p| p.raw.clone()).collect();
    let second = layout(&raws, ViewMode::Day);

    let dates = |l: &Layout| l.grouping.periods().map(|p| (p.id.clone(), p.start, p.end)).collect::<Vec<_>>();
    assert_eq!(dates(&first), dates(&second));
}

#[test]
fn drag_round_trip_through_the_engine() {
    let mut tasks = rota();
    tasks[0] = tasks[0].clone().with_id("early");
    tasks[1] = tasks[1]
        .clone()
        .with_id("late")
        .with_dependencies(Dependencies::Csv("early".into()));

    let mut engine = GanttEngine::new(GanttOptions::default())
        .with_id_provider(SequentialIds::new())
        .with_clock(now);
    engine.refresh(tasks);
    assert_eq!(engine.drain_events(), vec![GanttEvent::ViewChange(ViewMode::Day)]);

    let early = engine.layout().grouping.flat_index_of("early").expect("early bar");
    let late = engine.layout().grouping.flat_index_of("late").expect("late bar");
    let audit = engine.layout().grouping.flat_index_of("Audit_1").expect("audit bar");
    let offset = |engine: &GanttEngine| engine.layout().bars[late].x - engine.layout().bars[audit].x;
    let before = offset(&engine);

    let mut gesture = engine.begin_interaction(early, Handle::Body, 200.0);
    engine.drag_interaction(&mut gesture, 200.0 + 2.0 * 38.0 + 5.0);
    assert_eq!(engine.finish_interaction(&mut gesture), 2);

    let moved = engine.layout().grouping.period(late).expect("late period");
    assert_eq!(moved.start, at(2024, 1, 8, 14));
    assert!((offset(&engine) - (before + 2.0 * 38.0)).abs() < 0.01);

    let changed: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GanttEvent::DateChange { task_id, .. } => Some(task_id),
            GanttEvent::ViewChange(_) => None,
        })
        .collect();
    assert_eq!(changed, vec!["early", "late"]);
}

#[test]
fn switching_mode_by_name() {
    let mut engine = GanttEngine::new(GanttOptions::default()).with_clock(now);
    engine.refresh(rota());
    assert!(engine.set_view_mode_by_name("Quarter Day"));
    assert_eq!(engine.layout().scale.hours_per_column, 6);
    assert!(!engine.set_view_mode_by_name("Decade"));
    assert_eq!(engine.mode(), ViewMode::QuarterDay);
}

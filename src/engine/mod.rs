//! Timeline layout engine.
//!
//! [`compute_layout`] turns raw task records into everything a renderer
//! needs. [`GanttEngine`] owns the current task list and view mode and
//! rebuilds the layout wholesale whenever either changes.

pub mod dependencies;
pub mod geometry;
pub mod grid;
pub mod group;
pub mod interaction;
pub mod labels;
pub mod normalize;
pub mod range;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::calendar::{self, CalendarFormatter, DateFormatter, Unit};
use crate::config::GanttOptions;
use crate::model::{DateRange, Grouping, RawTask, ScaleParams, Tick, ViewMode};

pub use dependencies::DependencyMap;
pub use geometry::{BarGeometry, NameLabel, RowGeometry};
pub use grid::{GridLine, GridSize, Highlight};
pub use interaction::{Handle, Interaction, PeriodEdit};
pub use labels::DateLabel;
pub use normalize::{IdProvider, RandomIds, SequentialIds};

/// Stored form of edited dates.
const EDIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything computed for one task list and view mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub mode: ViewMode,
    pub scale: ScaleParams,
    pub grouping: Grouping,
    /// `None` when there are no periods; every grid and geometry list is
    /// then empty.
    pub range: Option<DateRange>,
    pub ticks: Vec<Tick>,
    pub labels: Vec<DateLabel>,
    pub grid_lines: Vec<GridLine>,
    pub grid: GridSize,
    pub rows: Vec<RowGeometry>,
    pub bars: Vec<BarGeometry>,
    pub name_labels: Vec<NameLabel>,
    pub today_x: Option<f32>,
    pub today_highlight: Option<Highlight>,
    pub scroll_x: Option<f32>,
    pub dependencies: DependencyMap,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// y of the separator under each row.
    pub fn row_lines(&self) -> impl Iterator<Item = f32> + '_ {
        self.rows.iter().map(RowGeometry::bottom)
    }
}

/// Run the whole pipeline. Pure apart from id generation.
pub fn compute_layout(
    raw_tasks: &[RawTask],
    mode: ViewMode,
    options: &GanttOptions,
    now: NaiveDateTime,
    ids: &mut dyn IdProvider,
    formatter: &dyn DateFormatter,
) -> Layout {
    let today = calendar::start_of(now, Unit::Day);
    let scale = mode.scale();
    let grouping = group::group(normalize::normalize(raw_tasks, &options.date_format, today, ids));
    let dependencies = DependencyMap::build(&grouping);

    let Some(range) = range::compute_range(&grouping, mode) else {
        return Layout {
            mode,
            scale,
            grouping,
            dependencies,
            ..Default::default()
        };
    };

    let ticks = grid::generate_ticks(&range, mode, &scale);
    let labels = labels::labels_for_ticks(&ticks, mode, options, formatter);
    let grid_lines = grid::grid_lines(&ticks, mode, &scale);
    let period_count = grouping.period_count();
    let rows = geometry::row_geometry(&grouping, options);

    Layout {
        mode,
        scale,
        range: Some(range),
        grid: grid::grid_size(ticks.len(), period_count, &scale, options),
        bars: geometry::bar_geometry(&grouping, &range, &scale, options),
        name_labels: geometry::name_labels(&grouping, &rows, options),
        today_x: Some(geometry::today_x(now, &range, &scale)),
        today_highlight: grid::today_highlight(&range, today, mode, period_count, options),
        scroll_x: geometry::scroll_position(&grouping, &range, &scale),
        ticks,
        labels,
        grid_lines,
        rows,
        grouping,
        dependencies,
    }
}

/// Notifications for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    /// A recomputation finished under this mode.
    ViewChange(ViewMode),
    /// A period's bounds were changed through an edit.
    DateChange {
        task_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Owns the task list, the active view mode and the last computed layout.
pub struct GanttEngine {
    options: GanttOptions,
    mode: ViewMode,
    tasks: Vec<RawTask>,
    layout: Layout,
    ids: Box<dyn IdProvider>,
    formatter: Box<dyn DateFormatter>,
    clock: Box<dyn Fn() -> NaiveDateTime>,
    events: Vec<GanttEvent>,
}

impl GanttEngine {
    pub fn new(options: GanttOptions) -> Self {
        let mode = options.view_mode;
        Self {
            options,
            mode,
            tasks: Vec::new(),
            layout: Layout {
                mode,
                scale: mode.scale(),
                ..Default::default()
            },
            ids: Box::new(RandomIds),
            formatter: Box::new(CalendarFormatter),
            clock: Box::new(calendar::now),
            events: Vec::new(),
        }
    }

    pub fn with_id_provider(mut self, ids: impl IdProvider + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_formatter(mut self, formatter: impl DateFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Task records as last refreshed, with generated ids filled in.
    pub fn raw_tasks(&self) -> &[RawTask] {
        &self.tasks
    }

    /// Replace the task list and recompute.
    pub fn refresh(&mut self, tasks: Vec<RawTask>) {
        self.tasks = tasks;
        for task in &mut self.tasks {
            if task.id.as_deref().map_or(true, str::is_empty) {
                task.id = Some(self.ids.task_id(&task.name));
            }
        }
        self.recompute();
    }

    pub fn change_view_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.recompute();
    }

    /// Switch mode by its display name. Unknown names leave the current mode
    /// and layout untouched.
    pub fn set_view_mode_by_name(&mut self, name: &str) -> bool {
        match name.parse::<ViewMode>() {
            Ok(mode) => {
                self.change_view_mode(mode);
                true
            }
            Err(e) => {
                warn!(error = %e, current = %self.mode, "keeping view mode");
                false
            }
        }
    }

    /// Snap a pixel delta for the active mode.
    pub fn snap(&self, dx: f32) -> f32 {
        geometry::snap(dx, self.mode, &self.layout.scale)
    }

    /// Start a gesture on the bar at `flat_index`. Its transitive dependents
    /// follow along.
    pub fn begin_interaction(&self, flat_index: usize, handle: Handle, pointer_x: f32) -> Interaction {
        let grouping = &self.layout.grouping;
        let followers = grouping
            .period(flat_index)
            .map(|period| {
                self.layout
                    .dependencies
                    .all_dependents(&period.id)
                    .iter()
                    .filter_map(|id| grouping.flat_index_of(id))
                    .collect()
            })
            .unwrap_or_default();
        Interaction::press(flat_index, handle, pointer_x, followers)
    }

    pub fn drag_interaction(&self, interaction: &mut Interaction, pointer_x: f32) {
        interaction.drag_to(pointer_x, self.mode, &self.layout.scale);
    }

    /// Release the gesture and apply whatever it changed.
    pub fn finish_interaction(&mut self, interaction: &mut Interaction) -> usize {
        let edits = interaction.release(&self.layout.grouping, self.mode, &self.layout.scale);
        self.apply_edits(&edits)
    }

    /// Write new bounds back into the task records, then recompute once.
    /// Both bounds are stored with an explicit time, so the end reads back
    /// unchanged. Returns how many edits matched a task.
    pub fn apply_edits(&mut self, edits: &[PeriodEdit]) -> usize {
        let mut applied = 0;
        for edit in edits {
            let Some(task) = self.tasks.iter_mut().find(|t| t.id.as_deref() == Some(edit.task_id.as_str())) else {
                warn!(task_id = %edit.task_id, "edit for unknown task");
                continue;
            };
            task.start_date = Some(edit.start.format(EDIT_DATE_FORMAT).to_string());
            task.end_date = Some(edit.end.format(EDIT_DATE_FORMAT).to_string());
            self.events.push(GanttEvent::DateChange {
                task_id: edit.task_id.clone(),
                start: edit.start,
                end: edit.end,
            });
            applied += 1;
        }
        if applied > 0 {
            self.recompute();
        }
        applied
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GanttEvent> {
        std::mem::take(&mut self.events)
    }

    fn recompute(&mut self) {
        let now = (self.clock)();
        self.layout = compute_layout(
            &self.tasks,
            self.mode,
            &self.options,
            now,
            self.ids.as_mut(),
            self.formatter.as_ref(),
        );
        debug!(
            mode = %self.mode,
            rows = self.layout.grouping.rows.len(),
            periods = self.layout.bars.len(),
            ticks = self.layout.ticks.len(),
            "layout recomputed"
        );
        self.events.push(GanttEvent::ViewChange(self.mode));
    }
}

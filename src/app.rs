use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use employee_gantt::calendar;
use employee_gantt::config::{self, GanttOptions};
use employee_gantt::engine::Interaction;
use employee_gantt::model::Dependencies;
use employee_gantt::{GanttEngine, GanttEvent, RawTask, TaskSheet, ViewMode};
use tracing::warn;

use crate::ui;

/// Main application state.
pub struct GanttApp {
    pub engine: GanttEngine,
    pub sheet_name: String,
    pub file_path: Option<PathBuf>,
    /// Flattened index of the selected bar.
    pub selected: Option<usize>,
    pub gesture: Interaction,

    pub show_about: bool,
    pub scroll_to_first: bool,

    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: GanttOptions) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut app = Self {
            engine: GanttEngine::new(options),
            sheet_name: String::new(),
            file_path: None,
            selected: None,
            gesture: Interaction::Idle,
            show_about: false,
            scroll_to_first: true,
            status_message: "Ready".to_string(),
        };
        app.load(Self::sample_sheet(), None);
        app
    }

    /// A week of shifts for three people, relative to today.
    fn sample_sheet() -> TaskSheet {
        let today = calendar::today();
        let day = |offset: i64| fmt_date(today + Duration::days(offset));
        let shift = |id: &str, name: &str, emp: &str, emp_name: &str, from: i64, to: i64| {
            RawTask::new(name, emp, emp_name)
                .with_id(id)
                .with_dates(Some(day(from).as_str()), Some(day(to).as_str()))
        };

        let mut sheet = TaskSheet::new("Sample Rota");
        sheet.tasks = vec![
            shift("ann-1", "Opening", "E1", "Ann Berg", -3, -2),
            shift("bob-1", "Stocktake", "E2", "Bob Lund", -1, 1)
                .with_dependencies(Dependencies::Csv("ann-1".into())),
            shift("ann-2", "Front desk", "E1", "Ann Berg", 1, 4),
            shift("chen-1", "Inventory audit", "E3", "Chen Wu", 2, 6)
                .with_dependencies(Dependencies::List(vec!["bob-1".into()])),
            shift("bob-2", "Training", "E2", "Bob Lund", 5, 5),
            RawTask::new("Unscheduled cover", "E3", "Chen Wu").with_id("chen-2"),
        ];
        sheet.tasks[0].progress = 100.0;
        sheet.tasks[1].progress = 40.0;
        sheet
    }

    fn load(&mut self, sheet: TaskSheet, path: Option<PathBuf>) {
        self.sheet_name = sheet.name;
        self.file_path = path;
        self.selected = None;
        self.gesture = Interaction::Idle;
        self.engine.refresh(sheet.tasks);
        self.scroll_to_first = true;
    }

    fn current_sheet(&self) -> TaskSheet {
        TaskSheet {
            name: self.sheet_name.clone(),
            tasks: self.engine.raw_tasks().to_vec(),
        }
    }

    // --- File operations ---

    pub fn new_sheet(&mut self) {
        self.load(TaskSheet::default(), None);
        self.status_message = "New schedule created".to_string();
    }

    pub fn open_sheet(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .pick_file()
        {
            match employee_gantt::io::load_sheet(&path) {
                Ok(sheet) => {
                    self.load(sheet, Some(path));
                    self.status_message = "Schedule loaded".to_string();
                }
                Err(e) => {
                    warn!(error = %e, "open failed");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_sheet(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_sheet(&path),
            None => self.save_sheet_as(),
        }
    }

    pub fn save_sheet_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .set_file_name(format!("{}.json", self.sheet_name))
            .save_file()
        {
            self.write_sheet(&path);
            self.file_path = Some(path);
        }
    }

    fn write_sheet(&mut self, path: &Path) {
        match employee_gantt::io::save_sheet(&self.current_sheet(), path) {
            Ok(()) => self.status_message = "Schedule saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn import_csv(&mut self) {
        if !self.engine.raw_tasks().is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current schedule. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match employee_gantt::io::import_csv(&path) {
                Ok((sheet, skipped)) => {
                    let count = sheet.tasks.len();
                    let employees = sheet.employee_count();
                    self.load(sheet, None);
                    self.status_message = if skipped > 0 {
                        format!("Imported {} periods for {} employees ({} rows skipped)", count, employees, skipped)
                    } else {
                        format!("Imported {} periods for {} employees", count, employees)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    // --- View ---

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.engine.change_view_mode(mode);
        self.scroll_to_first = true;
    }

    pub fn open_settings_folder(&mut self) {
        let dir = config::config_dir();
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.status_message = format!("Cannot open {}: {}", dir.display(), e);
        }
    }

    fn handle_events(&mut self) {
        let mut edited = Vec::new();
        for event in self.engine.drain_events() {
            match event {
                // Layout rebuilt; an in-flight gesture no longer matches it.
                GanttEvent::ViewChange(_) => self.gesture = Interaction::Idle,
                GanttEvent::DateChange { task_id, start, end } => edited.push((task_id, start, end)),
            }
        }
        match edited.as_slice() {
            [] => {}
            [(task_id, start, end)] => {
                self.status_message = format!("Updated '{}' ({} → {})", task_id, fmt_time(*start), fmt_time(*end));
            }
            many => self.status_message = format!("Updated {} periods", many.len()),
        }
    }
}

fn fmt_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fmt_time(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_sheet();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let layout = self.engine.layout();
                        ui.label(
                            egui::RichText::new(format!(
                                "Employees: {} · Periods: {} · {}",
                                layout.grouping.rows.len(),
                                layout.bars.len(),
                                self.engine.mode()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut panel_action = ui::employee_panel::EmployeePanelAction::None;
        egui::SidePanel::left("employee_panel")
            .default_width(240.0)
            .min_width(180.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                panel_action = ui::employee_panel::show_employee_panel(self.engine.layout(), self.selected, ui);
            });

        match panel_action {
            ui::employee_panel::EmployeePanelAction::Select(index) => self.selected = Some(index),
            ui::employee_panel::EmployeePanelAction::None => {}
        }

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let scroll_to = std::mem::take(&mut self.scroll_to_first);
            let interaction = ui::gantt_chart::show_gantt_chart(
                &mut self.engine,
                &mut self.gesture,
                &mut self.selected,
                scroll_to,
                ui,
            );
            if interaction.released && interaction.edits == 0 {
                self.status_message = "No change".to_string();
            }
        });

        self.handle_events();

        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

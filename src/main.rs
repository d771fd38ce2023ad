#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let settings = employee_gantt::config::settings_path();
    let gantt_options = employee_gantt::config::load_or_default(&settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Employee Gantt"),
        ..Default::default()
    };

    eframe::run_native(
        "Employee Gantt",
        options,
        Box::new(|cc| Ok(Box::new(app::GanttApp::new(cc, gantt_options)))),
    )
}

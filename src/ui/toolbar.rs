use crate::app::GanttApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;
use employee_gantt::ViewMode;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  New Schedule", icons::FILE)).clicked() {
                app.new_sheet();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_sheet();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_sheet();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_sheet_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Time Scale").small().weak());
            let mut mode = app.engine.mode();
            for candidate in ViewMode::ALL {
                if ui.radio_value(&mut mode, candidate, candidate.label()).clicked() {
                    ui.close_menu();
                }
            }
            if mode != app.engine.mode() {
                app.set_view_mode(mode);
            }
            ui.separator();
            if ui.button(format!("{}  Scroll to First Period", icons::CROSSHAIR)).clicked() {
                app.scroll_to_first = true;
                ui.close_menu();
            }
            if ui.button(format!("{}  Open Settings Folder", icons::GEAR)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned sheet name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.sheet_name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}

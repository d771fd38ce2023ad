use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use employee_gantt::Layout;

/// Actions that the employee panel can request.
pub enum EmployeePanelAction {
    None,
    /// Select the period at this flattened index.
    Select(usize),
}

/// Render the left-side list of employees and their working periods.
pub fn show_employee_panel(layout: &Layout, selected: Option<usize>, ui: &mut Ui) -> EmployeePanelAction {
    let mut action = EmployeePanelAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Employees").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", layout.grouping.rows.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let mut flat_index = 0;
            for row in &layout.grouping.rows {
                let color = theme::row_color(row.index);
                let header = RichText::new(format!("{}  {}", icons::USER, row.employee_name)).color(color);
                egui::CollapsingHeader::new(header)
                    .id_salt(("employee-row", &row.employee_id))
                    .default_open(true)
                    .show(ui, |ui| {
                        for period in &row.periods {
                            let index = flat_index;
                            flat_index += 1;
                            let is_selected = selected == Some(index);

                            let mut text = RichText::new(period.name()).size(12.0).color(if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            });
                            if period.invalid {
                                text = text.italics().color(theme::TEXT_DIM);
                            }
                            let response = ui
                                .selectable_label(is_selected, text)
                                .on_hover_text(format!(
                                    "{} → {}",
                                    period.start.format("%d/%m/%Y %H:%M"),
                                    period.end.format("%d/%m/%Y %H:%M"),
                                ));
                            if response.clicked() {
                                action = EmployeePanelAction::Select(index);
                            }
                        }
                    });
                // Collapsed rows still consume their indices.
                flat_index = flat_index.max(row_end(layout, row.index));
            }
        });

    if let Some(period) = selected.and_then(|i| layout.grouping.period(i)) {
        ui.separator();
        egui::Grid::new("period_details")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                let mut row = |key: &str, value: String| {
                    ui.label(RichText::new(key).color(theme::TEXT_SECONDARY));
                    ui.label(value);
                    ui.end_row();
                };
                row("Id", period.id.clone());
                row("Start", period.start.format("%Y-%m-%d %H:%M").to_string());
                row("End", period.end.format("%Y-%m-%d %H:%M").to_string());
                row("Progress", format!("{:.0}%", period.progress_fraction() * 100.0));
                if !period.dependencies.is_empty() {
                    row("After", period.dependencies.join(", "));
                }
                if period.invalid {
                    row("Note", "dates repaired".to_string());
                }
            });
    }

    action
}

/// Flattened index one past the last period of row `row`.
fn row_end(layout: &Layout, row: usize) -> usize {
    layout.grouping.rows.iter().take(row + 1).map(|r| r.periods.len()).sum()
}

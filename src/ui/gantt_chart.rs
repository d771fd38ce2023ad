use crate::ui::theme;
use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use employee_gantt::engine::{BarGeometry, Handle, Interaction, Layout};
use employee_gantt::GanttEngine;

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A gesture ended this frame.
    pub released: bool,
    /// Periods changed by it.
    pub edits: usize,
}

/// What the pointer did to a bar this frame.
enum BarAction {
    Press(usize, Handle, f32),
    Drag(f32),
    Release,
}

/// Render the timeline (central panel).
pub fn show_gantt_chart(
    engine: &mut GanttEngine,
    gesture: &mut Interaction,
    selected: &mut Option<usize>,
    scroll_to_first: bool,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let mut actions: Vec<BarAction> = Vec::new();

    let layout = engine.layout();
    if layout.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("No working periods. Open a schedule or import a CSV.").color(theme::TEXT_DIM));
        });
        return interaction;
    }

    let options = engine.options();
    let available = ui.available_size();
    let chart_size = Vec2::new(layout.grid.width, layout.grid.height).max(available);

    let mut scroll = egui::ScrollArea::both().auto_shrink([false, false]);
    if scroll_to_first {
        if let Some(x) = layout.scroll_x {
            scroll = scroll.horizontal_scroll_offset(x);
        }
    }

    scroll.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(chart_size, Sense::click());
        let origin = response.rect.min;
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        draw_rows(&painter, origin, layout, chart_size.x);
        draw_grid(&painter, origin, layout);
        draw_today(&painter, origin, layout);
        draw_header(&painter, origin, layout, options.header_height);

        for bar in &layout.bars {
            let shown = gesture.preview(bar, options.min_bar_width);
            let is_selected = *selected == Some(bar.flat_index);
            let bar_rect = draw_bar(&painter, origin, layout, &shown, options.bar_corner_radius, is_selected);

            let body = ui.interact(
                bar_rect,
                ui.make_persistent_id(("period-bar", bar.flat_index)),
                Sense::click_and_drag(),
            );
            let left = ui.interact(
                edge_rect(bar_rect, bar_rect.left()),
                ui.make_persistent_id(("period-resize-left", bar.flat_index)),
                Sense::drag(),
            );
            let right = ui.interact(
                edge_rect(bar_rect, bar_rect.right()),
                ui.make_persistent_id(("period-resize-right", bar.flat_index)),
                Sense::drag(),
            );

            if body.clicked() {
                *selected = Some(bar.flat_index);
                consumed_click = true;
            }

            for (response, handle) in [(&left, Handle::Left), (&right, Handle::Right), (&body, Handle::Body)] {
                let ptr_x = response.interact_pointer_pos().map(|p| p.x - origin.x);
                if response.drag_started() {
                    actions.push(BarAction::Press(bar.flat_index, handle, ptr_x.unwrap_or(0.0)));
                    *selected = Some(bar.flat_index);
                    consumed_click = true;
                } else if response.dragged() {
                    if let Some(x) = ptr_x {
                        actions.push(BarAction::Drag(x));
                    }
                }
                if response.drag_stopped() {
                    actions.push(BarAction::Release);
                }
            }

            if left.hovered() || right.hovered() || left.dragged() || right.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            } else if body.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            } else if body.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }

            if is_selected || left.hovered() || right.hovered() {
                draw_handles(&painter, bar_rect);
            }

            if body.hovered() && !gesture.is_active() {
                if let Some(period) = layout.grouping.period(bar.flat_index) {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("period-tip", bar.flat_index)),
                        |ui| {
                            ui.strong(period.name());
                            ui.label(period.employee_name());
                            ui.label(format!(
                                "{} → {}",
                                period.start.format("%d/%m/%Y %H:%M"),
                                period.end.format("%d/%m/%Y %H:%M"),
                            ));
                            ui.label(format!("Progress: {}%", (period.progress_fraction() * 100.0) as i32));
                            if period.invalid {
                                ui.colored_label(theme::TODAY_LINE, "Dates were missing or invalid");
                            }
                        },
                    );
                }
            }
        }

        draw_name_column(&painter, ui.clip_rect(), origin, layout);

        // Empty click on background clears selection
        if response.clicked() && !consumed_click {
            *selected = None;
        }
    });

    for action in actions {
        match action {
            BarAction::Press(index, handle, x) => *gesture = engine.begin_interaction(index, handle, x),
            BarAction::Drag(x) => engine.drag_interaction(gesture, x),
            BarAction::Release => {
                interaction.released = true;
                interaction.edits += engine.finish_interaction(gesture);
            }
        }
    }

    interaction
}

fn edge_rect(bar_rect: Rect, x: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
    .expand(2.0)
}

fn draw_rows(painter: &egui::Painter, origin: Pos2, layout: &Layout, width: f32) {
    for (i, row) in layout.rows.iter().enumerate() {
        if i % 2 == 1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, origin.y + row.y_offset), Vec2::new(width, row.height)),
                0.0,
                theme::BG_ROW_ODD,
            );
        }
    }
    for y in layout.row_lines() {
        painter.line_segment(
            [Pos2::new(origin.x, origin.y + y), Pos2::new(origin.x + width, origin.y + y)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_grid(painter: &egui::Painter, origin: Pos2, layout: &Layout) {
    let top = origin.y + layout.labels.first().map_or(0.0, |l| l.upper_y);
    let bottom = origin.y + layout.grid.height;
    for line in &layout.grid_lines {
        let x = origin.x + line.x;
        let stroke = if line.thick {
            Stroke::new(1.0, theme::GRID_LINE_THICK)
        } else {
            Stroke::new(0.5, theme::GRID_LINE)
        };
        painter.line_segment([Pos2::new(x, top), Pos2::new(x, bottom)], stroke);
    }
}

fn draw_today(painter: &egui::Painter, origin: Pos2, layout: &Layout) {
    if let Some(h) = layout.today_highlight {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x + h.x, origin.y + h.y), Vec2::new(h.width, h.height)),
            0.0,
            theme::TODAY_FILL,
        );
    }
    if let Some(x) = layout.today_x.filter(|x| (0.0..=layout.grid.width).contains(x)) {
        painter.line_segment(
            [Pos2::new(origin.x + x, origin.y), Pos2::new(origin.x + x, origin.y + layout.grid.height)],
            Stroke::new(1.5, theme::TODAY_LINE),
        );
    }
}

fn draw_header(painter: &egui::Painter, origin: Pos2, layout: &Layout, header_height: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(layout.grid.width, header_height)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + header_height),
            Pos2::new(origin.x + layout.grid.width, origin.y + header_height),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for label in &layout.labels {
        if !label.lower_text.is_empty() {
            painter.text(
                Pos2::new(origin.x + label.lower_x, origin.y + label.lower_y - 6.0),
                Align2::CENTER_BOTTOM,
                &label.lower_text,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
        if !label.upper_text.is_empty() {
            let galley = painter.layout_no_wrap(label.upper_text.clone(), theme::font_header(), theme::TEXT_PRIMARY);
            // Labels running past the grid are dropped, not clipped.
            if label.upper_fits(galley.size().x, layout.grid.width) {
                painter.galley(
                    Pos2::new(origin.x + label.upper_x, origin.y + label.upper_y - galley.size().y),
                    galley,
                    Color32::TRANSPARENT,
                );
            }
        }
    }
}

fn draw_bar(
    painter: &egui::Painter,
    origin: Pos2,
    layout: &Layout,
    bar: &BarGeometry,
    corner_radius: f32,
    is_selected: bool,
) -> Rect {
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.x, origin.y + bar.y),
        Vec2::new(bar.width, bar.height),
    );
    let rounding = Rounding::same(corner_radius);
    let period = layout.grouping.period(bar.flat_index);
    let invalid = period.is_some_and(|p| p.invalid);
    let color = if invalid {
        theme::INVALID_BAR
    } else {
        theme::row_color(bar.row)
    };

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);
    if invalid {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, theme::TODAY_LINE));
    }

    let progress = period.map_or(0.0, |p| p.progress_fraction());
    if progress > 0.0 {
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(bar.width * progress, bar.height));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(corner_radius + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Period name on bar (single line, clipped to bar bounds)
    if let Some(period) = period.filter(|_| bar.width > 30.0) {
        let galley = painter.layout_no_wrap(period.name().to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar_rect)
            .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

/// Employee names pinned to the left edge of the visible area.
fn draw_name_column(painter: &egui::Painter, visible: Rect, origin: Pos2, layout: &Layout) {
    let Some(first) = layout.rows.first() else {
        return;
    };
    let left = visible.left();
    let column = Rect::from_min_max(
        Pos2::new(left, origin.y + first.y_offset),
        Pos2::new(left + theme::NAME_COLUMN_WIDTH, origin.y + layout.grid.height),
    );
    painter.rect_filled(column, 0.0, theme::BG_PANEL.gamma_multiply(0.92));
    painter.line_segment([column.right_top(), column.right_bottom()], Stroke::new(1.0, theme::BORDER_SUBTLE));

    for name in &layout.name_labels {
        painter.with_clip_rect(column).text(
            Pos2::new(left + 10.0, origin.y + name.y),
            Align2::LEFT_CENTER,
            &name.text,
            theme::font_bar(),
            theme::TEXT_PRIMARY,
        );
    }
}

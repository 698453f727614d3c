use chrono::{Datelike, NaiveDate};
use egui::{Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::format;
use crate::model::timeline::{gantt_layout, DateRange};
use crate::model::{Project, ProjectId, TimelineScale, TimelineViewport};
use crate::ui::{theme, ProjectAction};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const LABEL_WIDTH: f32 = theme::LABEL_WIDTH;

/// Render the Gantt chart: a name column, a dated header grid and one bar per project.
pub fn show_gantt_chart(
    projects: &[Project],
    viewport: &mut TimelineViewport,
    selected: Option<ProjectId>,
    today: NaiveDate,
    ui: &mut Ui,
) -> ProjectAction {
    let mut action = ProjectAction::None;
    let Some(range) = DateRange::covering(projects) else {
        return action;
    };
    let bars = gantt_layout(projects);

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }

    let available = ui.available_size();
    let chart_width = (LABEL_WIDTH + viewport.total_width()).max(available.x);
    let chart_height = HEADER_HEIGHT + projects.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 20.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;
            let timeline_origin = Pos2::new(origin.x + LABEL_WIDTH, origin.y);

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_timeline_header(
                &painter,
                painter.clip_rect(),
                timeline_origin,
                viewport,
                chart_width - LABEL_WIDTH,
                response.rect.bottom(),
            );

            // Bars are laid out as fractions of the covered range; map that range to pixels.
            let range_x = timeline_origin.x + viewport.date_to_x(range.start);
            let range_px = viewport.date_to_x(range.end) - viewport.date_to_x(range.start);

            for (i, (project, bar)) in projects.iter().zip(&bars).enumerate() {
                let row_top = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
                let row_rect = Rect::from_min_size(
                    Pos2::new(origin.x, row_top),
                    Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING),
                );
                let is_selected = selected == Some(project.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };
                painter.rect_filled(row_rect, 0.0, row_bg);
                painter.line_segment(
                    [row_rect.left_bottom(), row_rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );

                // Name column
                let label_rect =
                    Rect::from_min_size(row_rect.min, Vec2::new(LABEL_WIDTH, ROW_HEIGHT));
                painter.with_clip_rect(label_rect.shrink2(Vec2::new(8.0, 0.0))).text(
                    Pos2::new(label_rect.left() + 8.0, label_rect.center().y),
                    egui::Align2::LEFT_CENTER,
                    &project.name,
                    theme::font_bar(),
                    theme::TEXT_PRIMARY,
                );

                let x = range_x + bar.offset * range_px;
                let width = (bar.width * range_px).max(6.0);
                let bar_rect = Rect::from_min_size(
                    Pos2::new(x, row_top + ROW_PADDING + theme::BAR_INSET),
                    Vec2::new(width, ROW_HEIGHT - theme::BAR_INSET * 2.0),
                );
                draw_bar(&painter, project, bar_rect, is_selected);

                let bar_response = ui.interact(
                    row_rect,
                    ui.make_persistent_id(("gantt-row", project.id)),
                    Sense::click(),
                );
                if bar_response.clicked() {
                    action = ProjectAction::Select(project.id);
                }
                if bar_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                bar_response.on_hover_ui(|ui| {
                    ui.strong(&project.name);
                    ui.label(format!(
                        "{} → {}",
                        format::format_date(project.start_date),
                        format::format_date(project.end_date),
                    ));
                    ui.label(format!("{} · {}%", project.phase.label(), project.progress));
                });
            }

            // Divider between names and timeline
            painter.line_segment(
                [
                    Pos2::new(timeline_origin.x, origin.y),
                    Pos2::new(timeline_origin.x, response.rect.bottom()),
                ],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );

            if today >= viewport.start && today <= viewport.end {
                let bottom = response.rect.bottom();
                draw_today_line(&painter, timeline_origin, viewport, today, bottom);
            }
        });

    action
}

/// Grid lines and labels, walked only across the visible part of the chart.
fn draw_timeline_header(
    painter: &Painter,
    visible: Rect,
    origin: Pos2,
    viewport: &TimelineViewport,
    width: f32,
    bottom: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let grid_line = |x: f32| {
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    };
    let label = |x: f32, y: f32, text: String, primary: bool| {
        let (font, color) = if primary {
            (theme::font_header(), theme::TEXT_PRIMARY)
        } else {
            (theme::font_sub(), theme::TEXT_SECONDARY)
        };
        let pos = Pos2::new(x + 3.0, origin.y + y);
        painter.text(pos, egui::Align2::LEFT_CENTER, text, font, color);
    };

    let mut date = viewport.x_to_date(visible.left() - origin.x);
    let last = viewport
        .x_to_date(visible.right() - origin.x)
        .checked_add_signed(chrono::Duration::days(1))
        .unwrap_or(viewport.end)
        .min(viewport.end);
    match viewport.scale {
        TimelineScale::Days => {
            while date <= last {
                let x = origin.x + viewport.date_to_x(date);
                grid_line(x);
                if viewport.pixels_per_day >= 20.0 {
                    label(x, 30.0, date.format("%d").to_string(), false);
                }
                if date.day() == 1 {
                    label(x, 12.0, date.format("%b %Y").to_string(), true);
                }
                date += chrono::Duration::days(1);
            }
        }
        TimelineScale::Weeks => {
            date -= chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()));
            while date <= last {
                let x = origin.x + viewport.date_to_x(date);
                grid_line(x);
                if viewport.pixels_per_day * 7.0 >= 28.0 {
                    label(x, 30.0, date.format("W%V").to_string(), false);
                }
                if date.day() <= 7 {
                    label(x, 12.0, date.format("%b %Y").to_string(), true);
                }
                date += chrono::Duration::days(7);
            }
        }
        TimelineScale::Months => {
            date = date.with_day(1).unwrap_or(date);
            while date <= last {
                let x = origin.x + viewport.date_to_x(date);
                grid_line(x);
                label(x, 20.0, date.format("%b %Y").to_string(), true);
                date = next_month(date);
            }
        }
    }
}

/// First day of the month after `date`'s month.
fn next_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date + chrono::Duration::days(31))
}

fn draw_today_line(
    painter: &Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    today: NaiveDate,
    bottom: f32,
) {
    let x = origin.x + viewport.date_to_x(today);
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge = Rect::from_min_size(
        Pos2::new(x - 21.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(42.0, 14.0),
    );
    painter.rect_filled(badge, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bar(painter: &Painter, project: &Project, bar_rect: Rect, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    let shadow = bar_rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow, rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, project.phase.color());

    // Completed share of the bar is darkened.
    if project.progress > 0 {
        let done = bar_rect.width() * f32::from(project.progress.min(100)) / 100.0;
        let done_rect = Rect::from_min_size(bar_rect.min, Vec2::new(done, bar_rect.height()));
        painter.rect_filled(done_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::ACCENT),
        );
    }

    if bar_rect.width() > 36.0 {
        let galley = painter.layout_no_wrap(
            format!("{}%", project.progress),
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        let text_pos = Pos2::new(
            bar_rect.left() + 6.0,
            bar_rect.center().y - galley.size().y / 2.0,
        );
        painter.with_clip_rect(bar_rect).galley(text_pos, galley, Color32::TRANSPARENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_stepping_wraps_the_year() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(next_month(d(2025, 1, 1)), d(2025, 2, 1));
        assert_eq!(next_month(d(2025, 12, 1)), d(2026, 1, 1));
    }
}

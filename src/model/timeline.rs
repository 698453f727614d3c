use chrono::NaiveDate;

use super::project::{Project, ProjectId};

/// Controls what scale the Gantt header displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineScale {
    Days,
    Weeks,
    Months,
}

/// The earliest start and latest end across a set of projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn covering(projects: &[Project]) -> Option<Self> {
        let start = projects.iter().map(|p| p.start_date).min()?;
        let end = projects.iter().map(|p| p.end_date).max()?;
        Some(Self { start, end })
    }

    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Horizontal placement of one project's bar, as fractions of the covered range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanttBar {
    pub id: ProjectId,
    pub offset: f32,
    pub width: f32,
}

/// Proportional bar layout for the Gantt view, in input order.
pub fn gantt_layout(projects: &[Project]) -> Vec<GanttBar> {
    let Some(range) = DateRange::covering(projects) else {
        return Vec::new();
    };
    let total = range.total_days();

    projects
        .iter()
        .map(|p| {
            if total <= 0 {
                return GanttBar {
                    id: p.id,
                    offset: 0.0,
                    width: 1.0,
                };
            }
            let from_start = (p.start_date - range.start).num_days();
            let duration = (p.end_date - p.start_date).num_days().max(0);
            GanttBar {
                id: p.id,
                offset: from_start as f32 / total as f32,
                width: duration as f32 / total as f32,
            }
        })
        .collect()
}

/// Maps dates to pixels for the Gantt chart.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    /// Current display scale.
    pub scale: TimelineScale,
    /// Pixels per day (controls zoom level).
    pub pixels_per_day: f32,
}

impl TimelineViewport {
    pub const DEFAULT_PIXELS_PER_DAY: f32 = 8.0;
    const MIN_PIXELS_PER_DAY: f32 = 1.0;
    const MAX_PIXELS_PER_DAY: f32 = 80.0;

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            scale: TimelineScale::Weeks,
            pixels_per_day: Self::DEFAULT_PIXELS_PER_DAY,
        }
    }

    /// Snap the visible range to exactly the given range, keeping zoom and scale.
    pub fn fit(&mut self, range: DateRange) {
        self.start = range.start;
        self.end = range.end;
    }

    /// Convert a date to an x-pixel offset from the viewport start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.start).num_days() as f32;
        days * self.pixels_per_day
    }

    /// The date under an x-pixel offset, clamped to the viewport.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let span = (self.end - self.start).num_days().max(0);
        let days = ((x / self.pixels_per_day).floor() as i64).clamp(0, span);
        self.start + chrono::Duration::days(days)
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.date_to_x(self.end)
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(Self::MAX_PIXELS_PER_DAY);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(Self::MIN_PIXELS_PER_DAY);
    }

    /// Zoom as a percentage of the default.
    pub fn zoom_percent(&self) -> f32 {
        self.pixels_per_day / Self::DEFAULT_PIXELS_PER_DAY * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_covers_all_projects() {
        let projects = vec![
            Project::new(1, "a", date(2025, 2, 1), date(2025, 3, 1)),
            Project::new(2, "b", date(2025, 1, 1), date(2025, 2, 10)),
        ];
        let range = DateRange::covering(&projects).unwrap();
        assert_eq!(range.start, date(2025, 1, 1));
        assert_eq!(range.end, date(2025, 3, 1));
        assert_eq!(range.total_days(), 59);
        assert!(DateRange::covering(&[]).is_none());
    }

    #[test]
    fn bars_are_proportional_to_the_range() {
        let projects = vec![
            Project::new(1, "first half", date(2025, 1, 1), date(2025, 1, 11)),
            Project::new(2, "second half", date(2025, 1, 11), date(2025, 1, 21)),
        ];
        let bars = gantt_layout(&projects);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].id, 1);
        assert!((bars[0].offset - 0.0).abs() < f32::EPSILON);
        assert!((bars[0].width - 0.5).abs() < f32::EPSILON);
        assert!((bars[1].offset - 0.5).abs() < f32::EPSILON);
        assert!((bars[1].width - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn single_day_range_fills_the_width() {
        let day = date(2025, 1, 1);
        let bars = gantt_layout(&[Project::new(1, "day", day, day)]);
        assert_eq!(bars, vec![GanttBar { id: 1, offset: 0.0, width: 1.0 }]);
    }

    #[test]
    fn x_maps_back_to_dates_within_the_viewport() {
        let vp = TimelineViewport::new(date(2025, 1, 1), date(2025, 1, 31));
        assert_eq!(vp.x_to_date(vp.date_to_x(date(2025, 1, 10)) + 1.0), date(2025, 1, 10));
        assert_eq!(vp.x_to_date(-500.0), date(2025, 1, 1));
        assert_eq!(vp.x_to_date(1.0e9), date(2025, 1, 31));
    }

    #[test]
    fn viewport_zoom_is_bounded() {
        let mut vp = TimelineViewport::new(date(2025, 1, 1), date(2025, 1, 11));
        assert_eq!(vp.total_width(), 10.0 * TimelineViewport::DEFAULT_PIXELS_PER_DAY);
        for _ in 0..100 {
            vp.zoom_in();
        }
        assert_eq!(vp.pixels_per_day, 80.0);
        for _ in 0..100 {
            vp.zoom_out();
        }
        assert_eq!(vp.pixels_per_day, 1.0);
    }
}

//! Display helpers shared by the views.

use chrono::NaiveDate;
use egui::Color32;

/// "Jan 5, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Sunday, January 5, 2025"
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Signed whole days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Days left until `deadline`; negative once it has passed.
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    days_between(today, deadline)
}

pub fn is_overdue(deadline: NaiveDate, today: NaiveDate) -> bool {
    days_until(deadline, today) < 0
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Coarse human duration: days under a week, then weeks, months (30 days), years (365 days).
pub fn format_duration(days: i64) -> String {
    if days < 7 {
        plural(days, "day")
    } else if days < 30 {
        plural(days / 7, "week")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    }
}

/// Cut `text` to `max_chars` characters, marking the cut with "...".
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

/// Up to two upper-case initials, "??" for a blank name.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "??".to_string()
    } else {
        letters
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn progress_label(progress: u8) -> &'static str {
    match progress {
        90.. => "Excellent",
        70..=89 => "Good",
        50..=69 => "Fair",
        30..=49 => "Behind",
        _ => "Critical",
    }
}

pub fn progress_color(progress: u8) -> Color32 {
    match progress {
        80.. => Color32::from_rgb(0x19, 0x87, 0x54),
        50..=79 => Color32::from_rgb(0x0d, 0xca, 0xf0),
        30..=49 => Color32::from_rgb(0xff, 0xc1, 0x07),
        _ => Color32::from_rgb(0xdc, 0x35, 0x45),
    }
}

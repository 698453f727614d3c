pub mod csv_export;
pub mod csv_import;
pub mod fetch;
pub mod file;
pub mod storage;

use chrono::NaiveDate;

/// `projects-YYYY-MM-DD.<ext>`, the default name offered when exporting.
pub fn export_file_name(date: NaiveDate, ext: &str) -> String {
    format!("projects-{}.{ext}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_names_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(date, "json"), "projects-2025-03-07.json");
        assert_eq!(export_file_name(date, "csv"), "projects-2025-03-07.csv");
    }
}

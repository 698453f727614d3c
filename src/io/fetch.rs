//! Downloading a published spreadsheet as CSV.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::csv_import::{parse_projects, ImportError};
use crate::model::Project;

/// How an import URL looks before we try it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// A Google Sheets "publish to web" CSV link.
    PublishedSheet,
    /// Some other http(s) URL; it may still serve CSV.
    Other,
}

/// Check that `url` is http(s) and classify it.
pub fn classify_url(url: &str) -> Result<UrlKind, ImportError> {
    let url = url.trim();
    let lower = url.to_lowercase();
    if !(lower.starts_with("https://") || lower.starts_with("http://")) {
        return Err(ImportError::InvalidUrl(url.to_string()));
    }
    let is_sheet = lower.contains("docs.google.com/spreadsheets")
        && (lower.contains("output=csv") || lower.contains("format=csv"));
    Ok(if is_sheet {
        UrlKind::PublishedSheet
    } else {
        UrlKind::Other
    })
}

/// Download CSV text from `url`.
pub fn fetch_csv(url: &str, timeout: Duration) -> Result<String, ImportError> {
    let url = url.trim();
    if classify_url(url)? == UrlKind::Other {
        warn!(url, "URL does not look like a published Google Sheets CSV; trying anyway");
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("project-tracker/", env!("CARGO_PKG_VERSION")))
        .build()?;

    info!(url, "fetching sheet");
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImportError::Status(status.as_u16()));
    }
    let body = response.text()?;
    info!(bytes = body.len(), "sheet downloaded");
    Ok(body)
}

/// Fetch and parse in one step; this is what the import worker runs.
pub fn import_url(url: &str, timeout: Duration, today: NaiveDate) -> Result<Vec<Project>, ImportError> {
    let body = fetch_csv(url, timeout)?;
    parse_projects(&body, today)
}

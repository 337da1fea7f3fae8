use std::time::Duration;

use crate::format::{format_bytes, format_elapsed};

/// Label shown next to the clone metrics.
pub const ACCURACY_LABEL: &str = "99.8%";

/// Successful response of the remote cloning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneResult {
    /// Path of the cloned document, relative to the service origin.
    pub clone_location: String,
    /// Asset paths rooted at the service origin, in service order.
    pub asset_paths: Vec<String>,
    pub asset_count: u64,
    pub total_size_bytes: u64,
}

/// Cloned markup plus the stylesheet text gathered from it.
///
/// Both fields come from one resolution; there is no partially resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    html_markup: String,
    stylesheet_text: String,
}

impl ResolvedDocument {
    pub fn new(html_markup: impl Into<String>, stylesheet_text: impl Into<String>) -> Self {
        Self {
            html_markup: html_markup.into(),
            stylesheet_text: stylesheet_text.into(),
        }
    }

    pub fn html_markup(&self) -> &str {
        &self.html_markup
    }

    pub fn stylesheet_text(&self) -> &str {
        &self.stylesheet_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneMetrics {
    pub assets_count: u64,
    pub total_size: String,
    pub elapsed: String,
    pub accuracy_label: String,
}

impl CloneMetrics {
    pub fn from_result(result: &CloneResult, elapsed: Duration) -> Self {
        Self {
            assets_count: result.asset_count,
            total_size: format_bytes(result.total_size_bytes),
            elapsed: format_elapsed(elapsed),
            accuracy_label: ACCURACY_LABEL.to_string(),
        }
    }
}

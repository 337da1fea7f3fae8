use url::Url;

use crate::ValidationError;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// A normalized clone submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    target_url: String,
}

impl CloneRequest {
    /// Validates raw user input and normalizes it to carry an explicit scheme.
    pub fn from_input(raw: &str) -> Result<Self, ValidationError> {
        let target_url = normalize_target_url(raw)?;
        Ok(Self { target_url })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

/// Trim the input and prefix `https://` unless it already names `http` or `https`.
///
/// The returned string is the prefixed input verbatim; it is only parsed to
/// reject input that cannot name a host.
pub fn normalize_target_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    let parsed = Url::parse(&normalized).map_err(|err| ValidationError::Malformed {
        input: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::Malformed {
            input: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(normalized)
}

use std::fmt;

#[derive(Debug)]
pub enum SnapHideError {
    /// Storage backend I/O failed (read or write of the store file)
    Storage { path: String, source: std::io::Error },

    /// JSON (de)serialization failed (persisted store or wire message)
    Json { context: String, source: serde_json::Error },

    /// Selector string could not be parsed at match time
    InvalidSelector { selector: String, reason: String },
}

impl fmt::Display for SnapHideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapHideError::Storage { path, source } => {
                write!(f, "Storage error at '{}': {}", path, source)
            }
            SnapHideError::Json { context, source } => {
                write!(f, "JSON error ({}): {}", context, source)
            }
            SnapHideError::InvalidSelector { selector, reason } => {
                write!(f, "Invalid selector '{}': {}", selector, reason)
            }
        }
    }
}

impl std::error::Error for SnapHideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapHideError::Storage { source, .. } => Some(source),
            SnapHideError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

use thiserror::Error;
use tracing::{error, warn};

/// Error severity for caller-side display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // expected absence of data
    Warning,  // recoverable, item skipped
    Error,    // operation failed
    Critical, // contract violation by the caller
}

/// Errors surfaced by the launcher core
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Usage history is not available: {0}")]
    UsageUnavailable(String),

    #[error(transparent)]
    Icon(#[from] IconError),

    #[error("Catalog could not be loaded: {0}")]
    CatalogUnavailable(String),

    #[error("Lookback window must not be negative (got {0} days)")]
    InvalidLookback(i64),

    #[error("Icon cache capacity must be at least 1")]
    InvalidCapacity,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LauncherError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UsageUnavailable(_) => ErrorSeverity::Info,
            Self::Icon(_) => ErrorSeverity::Warning,
            Self::CatalogUnavailable(_) => ErrorSeverity::Error,
            Self::InvalidLookback(_) => ErrorSeverity::Critical,
            Self::InvalidCapacity => ErrorSeverity::Critical,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::Io(_) => ErrorSeverity::Error,
            Self::Json(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::UsageUnavailable(_) => {
                "Grant usage access to sort apps by how often you use them".to_string()
            }
            Self::Icon(e) => e.user_message(),
            Self::CatalogUnavailable(msg) => format!("Could not load apps: {}", msg),
            Self::InvalidLookback(days) => format!("Invalid lookback window: {} days", days),
            Self::InvalidCapacity => "Icon cache capacity must be at least 1".to_string(),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::Io(e) => format!("File system error: {}", e),
            Self::Json(e) => format!("Invalid data format: {}", e),
        }
    }

    /// Soft misses the caller should treat as "nothing available" rather than a failure
    pub fn is_soft_miss(&self) -> bool {
        matches!(self, Self::UsageUnavailable(_) | Self::Icon(_))
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

/// Icon population failures; cloneable so one render outcome can be handed
/// to every caller waiting on the same key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    #[error("Icon not found for component '{component}' (user {user})")]
    NotFound { component: String, user: u32 },

    #[error("Failed to decode icon '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Icon render worker failed: {0}")]
    Worker(String),
}

impl IconError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { component, .. } => format!("No icon available for {}", component),
            Self::Decode { path, .. } => format!("Could not read icon {}", path),
            Self::Worker(_) => "Icon could not be loaded".to_string(),
        }
    }
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// ```ignore
/// use launcher_core::error::ResultExt;
///
/// let ranks = ranker.ranks(30, now).warn_on_err().unwrap_or_default();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_misses() {
        assert!(LauncherError::UsageUnavailable("denied".into()).is_soft_miss());
        assert!(LauncherError::from(IconError::NotFound {
            component: "com.example/.Main".into(),
            user: 0
        })
        .is_soft_miss());
        assert!(!LauncherError::InvalidLookback(-1).is_soft_miss());
    }

    #[test]
    fn test_contract_violations_are_critical() {
        assert_eq!(
            LauncherError::InvalidLookback(-3).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(LauncherError::InvalidCapacity.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_message_mentions_component() {
        let err = LauncherError::from(IconError::NotFound {
            component: "com.example/.Main".into(),
            user: 10,
        });
        assert!(err.user_message().contains("com.example/.Main"));
    }

    #[test]
    fn test_result_ext_degrades_to_none() {
        let failed: std::result::Result<u32, LauncherError> =
            Err(LauncherError::CatalogUnavailable("gone".into()));
        assert_eq!(failed.warn_on_err(), None);

        let ok: std::result::Result<u32, LauncherError> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));
    }
}

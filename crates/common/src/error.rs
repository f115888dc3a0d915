//! Error types shared across Eyeframe crates.

use std::path::PathBuf;

/// Top-level error type for Eyeframe operations.
#[derive(Debug, thiserror::Error)]
pub enum EyeframeError {
    #[error("Rail error: {message}")]
    Rail { message: String },

    #[error("Invalid rail: {count} control points, expected 3k+1 with k >= 1")]
    InvalidRail { count: usize },

    #[error("Rail must keep at least one segment ({count} control points left)")]
    RailTooShort { count: usize },

    #[error("Scene error: {message}")]
    Scene { message: String },

    #[error("Unknown focus: {name}")]
    UnknownFocus { name: String },

    #[error("Camera error: {message}")]
    Camera { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using EyeframeError.
pub type EyeframeResult<T> = Result<T, EyeframeError>;

impl EyeframeError {
    pub fn rail(msg: impl Into<String>) -> Self {
        Self::Rail {
            message: msg.into(),
        }
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene {
            message: msg.into(),
        }
    }

    pub fn unknown_focus(name: impl Into<String>) -> Self {
        Self::UnknownFocus { name: name.into() }
    }

    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EyeframeError::InvalidRail { count: 5 };
        assert!(err.to_string().contains("5 control points"));

        let err = EyeframeError::unknown_focus("player");
        assert_eq!(err.to_string(), "Unknown focus: player");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: EyeframeError = parse.unwrap_err().into();
        assert!(matches!(err, EyeframeError::Json(_)));
    }
}

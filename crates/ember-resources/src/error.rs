//! Error types for resource loading.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading resources.
#[derive(Debug)]
pub enum ResourceError {
    /// The requested file does not exist.
    NotFound {
        /// The path or name that was looked up.
        path: String,
    },

    /// Failed to read resource bytes.
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The decrypt hook rejected the data.
    DecryptFailed {
        /// The encrypted resource name.
        name: String,
    },

    /// A service could not decode the resource content.
    DecodeFailed {
        /// The resource name.
        name: String,
        /// Description of the error.
        message: String,
    },

    /// An animation referenced a sprite frame that is not in the frame cache.
    MissingSpriteFrame {
        /// The animation being built.
        animation: String,
        /// The sprite frame name that could not be resolved.
        frame: String,
    },

    /// Frame names and per-frame delays were given with different lengths.
    FrameDelayMismatch {
        /// The animation name.
        animation: String,
        /// Number of frame names.
        frames: usize,
        /// Number of delays.
        delays: usize,
    },

    /// A frame-name pattern did not contain exactly one integer placeholder.
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Generic failure reported by an external service.
    Service {
        /// The service that failed.
        service: &'static str,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound { path } => {
                write!(f, "Resource not found: {}", path)
            }
            ResourceError::Io { path, source } => {
                write!(f, "IO error reading '{}': {}", path.display(), source)
            }
            ResourceError::DecryptFailed { name } => {
                write!(f, "Failed to decrypt '{}'", name)
            }
            ResourceError::DecodeFailed { name, message } => {
                write!(f, "Failed to decode '{}': {}", name, message)
            }
            ResourceError::MissingSpriteFrame { animation, frame } => {
                write!(
                    f,
                    "Animation '{}' references unknown sprite frame '{}'",
                    animation, frame
                )
            }
            ResourceError::FrameDelayMismatch {
                animation,
                frames,
                delays,
            } => {
                write!(
                    f,
                    "Animation '{}' has {} frames but {} delays",
                    animation, frames, delays
                )
            }
            ResourceError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid frame pattern '{}': {}", pattern, reason)
            }
            ResourceError::Service { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = ResourceError::FrameDelayMismatch {
            animation: "run".to_string(),
            frames: 3,
            delays: 2,
        };
        assert_eq!(err.to_string(), "Animation 'run' has 3 frames but 2 delays");

        let err = ResourceError::DecryptFailed {
            name: "hero.png".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to decrypt 'hero.png'");
    }

    #[test]
    fn test_io_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ResourceError = io.into();

        assert!(matches!(err, ResourceError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_non_io_has_no_source() {
        let err = ResourceError::NotFound {
            path: "missing.plist".to_string(),
        };
        assert!(err.source().is_none());
    }
}

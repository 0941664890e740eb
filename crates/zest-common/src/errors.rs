//! Error taxonomy.
//!
//! Every failure abandons the whole transform call; nothing partial is
//! returned. Positional variants carry a 1-based [`Location`].

use crate::position::Location;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Invalid character or token sequence.
    #[error("{message} ({location})")]
    Lex { message: String, location: Location },

    /// A structural expectation of the parser or a rewrite unit was violated.
    #[error("{message} ({location})")]
    UnexpectedToken { message: String, location: Location },

    /// The root loop reached the end of input while inside a region.
    #[error("{message} ({location})")]
    UnbalancedRegion { message: String, location: Location },

    /// A recognized feature combination that is intentionally unimplemented.
    #[error("{message}")]
    UnsupportedCombination { message: String },

    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    #[error("Error transforming {file_path}: {source}")]
    InFile {
        file_path: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    pub fn lex(source: &str, pos: u32, message: impl Into<String>) -> Self {
        TransformError::Lex {
            message: message.into(),
            location: Location::from_offset(source, pos),
        }
    }

    pub fn unexpected_token(source: &str, pos: u32, message: impl Into<String>) -> Self {
        TransformError::UnexpectedToken {
            message: message.into(),
            location: Location::from_offset(source, pos),
        }
    }

    pub fn unbalanced_region(source: &str, pos: u32, message: impl Into<String>) -> Self {
        TransformError::UnbalancedRegion {
            message: message.into(),
            location: Location::from_offset(source, pos),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        TransformError::UnsupportedCombination {
            message: message.into(),
        }
    }

    pub fn invalid_options(message: impl Into<String>) -> Self {
        TransformError::InvalidOptions {
            message: message.into(),
        }
    }

    /// Attach the file being transformed, if one is known.
    pub fn with_file_path(self, file_path: Option<&str>) -> Self {
        match file_path {
            Some(path) if !matches!(self, TransformError::InFile { .. }) => TransformError::InFile {
                file_path: path.to_string(),
                source: Box::new(self),
            },
            _ => self,
        }
    }

    /// The source location, when the error has one.
    pub fn location(&self) -> Option<Location> {
        match self {
            TransformError::Lex { location, .. }
            | TransformError::UnexpectedToken { location, .. }
            | TransformError::UnbalancedRegion { location, .. } => Some(*location),
            TransformError::InFile { source, .. } => source.location(),
            TransformError::UnsupportedCombination { .. } | TransformError::InvalidOptions { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = TransformError::unexpected_token("a\nbc", 3, "Unexpected token");
        assert_eq!(err.to_string(), "Unexpected token (2:2)");
        assert_eq!(err.location(), Some(Location::new(2, 2)));
    }

    #[test]
    fn test_with_file_path_wraps_once() {
        let err = TransformError::lex("x", 0, "Unexpected character '#'")
            .with_file_path(Some("a.ts"))
            .with_file_path(Some("b.ts"));
        assert_eq!(
            err.to_string(),
            "Error transforming a.ts: Unexpected character '#' (1:1)"
        );
        assert_eq!(err.location(), Some(Location::new(1, 1)));
    }

    #[test]
    fn test_unsupported_has_no_location() {
        let err = TransformError::unsupported("Decorators before export are not supported");
        assert_eq!(err.location(), None);
    }
}

use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes surfaced by the calendar shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    SourceUnavailable,
    SourceMalformed,
    EventNotFound,
    InvalidEnumValue,
    InvalidTimestamp,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::SourceUnavailable => "E2001",
            Self::SourceMalformed => "E2002",
            Self::EventNotFound => "E3001",
            Self::InvalidEnumValue => "E3002",
            Self::InvalidTimestamp => "E3003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::SourceUnavailable => "Component source unavailable",
            Self::SourceMalformed => "Component source is not a JSON array",
            Self::EventNotFound => "Calendar event not found",
            Self::InvalidEnumValue => "Invalid kind/granularity value",
            Self::InvalidTimestamp => "Invalid timestamp",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in compcal/config.toml and retry."),
            Self::SourceUnavailable => {
                Some("Check that the components file exists and is readable.")
            }
            Self::SourceMalformed => Some("Export the components as a JSON array and retry."),
            Self::EventNotFound => Some(
                "Event ids look like `<component-id>-<kind>`; list them with `compcal events`.",
            ),
            Self::InvalidEnumValue => Some(
                "Kinds: deadline, review, development, meeting, other. \
                 Views: day, week, month, agenda.",
            ),
            Self::InvalidTimestamp => Some("Use RFC 3339, e.g. 2024-01-01T00:00:00Z."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure reported by an [`EntitySource`](crate::source::EntitySource).
///
/// The engine never propagates this; it degrades to an empty snapshot and
/// keeps the message for the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The backing file could not be read.
    #[error("failed to read components from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not JSON at all.
    #[error("failed to decode components from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but not an array of component records.
    #[error("components in {path} must be a JSON array, found {found}")]
    NotAnArray { path: PathBuf, found: &'static str },
}

impl SourceError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::SourceUnavailable,
            Self::Json { .. } | Self::NotAnArray { .. } => ErrorCode::SourceMalformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, SourceError};
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::SourceUnavailable,
            ErrorCode::SourceMalformed,
            ErrorCode::EventNotFound,
            ErrorCode::InvalidEnumValue,
            ErrorCode::InvalidTimestamp,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::EventNotFound.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn source_errors_map_to_codes() {
        let io = SourceError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.code(), ErrorCode::SourceUnavailable);
        assert!(io.to_string().contains("missing.json"));

        let json = SourceError::Json {
            path: PathBuf::from("bad.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert_eq!(json.code(), ErrorCode::SourceMalformed);

        let shape = SourceError::NotAnArray {
            path: PathBuf::from("object.json"),
            found: "object",
        };
        assert_eq!(shape.code(), ErrorCode::SourceMalformed);
        assert_eq!(
            shape.to_string(),
            "components in object.json must be a JSON array, found object"
        );
    }
}

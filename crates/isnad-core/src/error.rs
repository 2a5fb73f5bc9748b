use std::fmt;

/// Machine-readable error codes for scripted pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    ConfigParseError,
    ArtifactMissing,
    NarratorNotFound,
    InvalidConfigValue,
    ArtifactWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::ConfigParseError => "E1002",
            Self::ArtifactMissing => "E1003",
            Self::NarratorNotFound => "E2001",
            Self::InvalidConfigValue => "E2002",
            Self::ArtifactWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Input dataset unreadable",
            Self::ConfigParseError => "Config file parse error",
            Self::ArtifactMissing => "Exported artifact not found",
            Self::NarratorNotFound => "Narrator not found",
            Self::InvalidConfigValue => "Invalid configuration value",
            Self::ArtifactWriteFailed => "Artifact write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => {
                Some("Check the --hadiths/--narrators paths and that both files are valid CSV.")
            }
            Self::ConfigParseError => Some("Fix syntax in isnad.toml and retry."),
            Self::ArtifactMissing => Some("Run `isnad build` to produce the JSON artifacts."),
            Self::NarratorNotFound => None,
            Self::InvalidConfigValue => {
                Some("Damping must lie in [0, 1]; counts and limits must be at least 1.")
            }
            Self::ArtifactWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

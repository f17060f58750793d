use parse_display::Display;

/// Failure to build a [`Presentation`](crate::Presentation).
#[derive(Debug, Display)]
pub enum ContentError {
    #[display("presentation has no slides")]
    Empty,
    #[display("duplicate slide id `{0}`")]
    DuplicateId(String),
    #[display("invalid presentation json: {0}")]
    Json(serde_json::Error),
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Failure to load [`Timings`](crate::Timings).
#[derive(Debug, Display)]
pub enum ConfigError {
    #[display("invalid timings json: {0}")]
    Json(serde_json::Error),
    #[display("auto-play interval must be greater than zero")]
    ZeroInterval,
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::ZeroInterval => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A platform capability refused or is missing.
///
/// Never fatal: the presentation keeps working without fullscreen.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PlatformError {
    #[display("fullscreen is not supported")]
    Unsupported,
    #[display("fullscreen request denied: {0}")]
    Denied(String),
}

impl std::error::Error for PlatformError {}

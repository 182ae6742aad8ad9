//! Unified error types for the theming engine and its collaborators.

use std::fmt;

// ---------------------------------------------------------------------------
// ColorError
// ---------------------------------------------------------------------------

/// Errors when parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Input did not contain exactly six hex digits after an optional `#`.
    InvalidLength(String),
    /// Input contained a non-hex character.
    InvalidDigit(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(input) => {
                write!(f, "invalid hex color `{input}` (expected #RRGGBB)")
            }
            Self::InvalidDigit(input) => write!(f, "invalid hex digit in color `{input}`"),
        }
    }
}

impl std::error::Error for ColorError {}

// ---------------------------------------------------------------------------
// DomError
// ---------------------------------------------------------------------------

/// Missing DOM targets at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The document has no root element yet.
    MissingRoot,
    /// The document has no `<head>` to attach the style element to.
    MissingHead,
    /// No element with this id is attached.
    MissingElement(String),
    /// A selector used for snapshot import failed to parse.
    Snapshot(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::MissingHead => write!(f, "document has no head element"),
            Self::MissingElement(id) => write!(f, "no element with id `{id}`"),
            Self::Snapshot(msg) => write!(f, "html snapshot: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from the persisted key-value store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backend refused the operation (e.g. an in-memory store told to fail).
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// ChannelError
// ---------------------------------------------------------------------------

/// Errors decoding an inbound script-to-script message.
#[derive(Debug)]
pub enum ChannelError {
    /// Payload was not valid JSON or did not match the message envelope.
    Malformed(serde_json::Error),
    /// An `updateTheme` message arrived without a `config` field.
    MissingConfig,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed message: {e}"),
            Self::MissingConfig => write!(f, "updateTheme message has no config"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<serde_json::Error> for ChannelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e)
    }
}

// ---------------------------------------------------------------------------
// UpdateError
// ---------------------------------------------------------------------------

/// Errors from the release-polling update notifier.
#[derive(Debug)]
pub enum UpdateError {
    Http(reqwest::Error),
    Status(u16),
    Version(String),
    Store(StoreError),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code) => write!(f, "release endpoint returned status {code}"),
            Self::Version(raw) => write!(f, "unparseable version `{raw}`"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl std::error::Error for UpdateError {}

impl From<reqwest::Error> for UpdateError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<StoreError> for UpdateError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing settings.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

//! Error types for duffel
//!
//! Errors are structured: a kind, the config path involved (when there is
//! one), and an actionable help message. Lookup failures are synchronous
//! and local; `Conf::get_or` and `Conf::contains` are the only places a
//! failure is converted rather than propagated.

use std::fmt;

/// Result type alias for duffel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for duffel operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Path in the config where the error occurred (e.g., "database.port")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A compound-key segment does not exist at the expected level
    KeyNotFound,
    /// A compound key is malformed (empty, or has an empty segment)
    InvalidKey,
    /// A value could not be converted to the requested type
    TypeCoercion,
    /// Error parsing YAML/JSON input
    Parse,
    /// I/O error (file not found, etc.)
    Io,
    /// An extension with the same name is already registered
    AlreadyRegistered,
}

impl Error {
    /// Create a key not found error
    pub fn key_not_found(path: impl Into<String>) -> Self {
        let path_str = path.into();
        Self {
            kind: ErrorKind::KeyNotFound,
            path: Some(path_str.clone()),
            help: Some(format!(
                "Check that '{}' exists in the configuration",
                path_str
            )),
            cause: None,
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidKey,
            path: Some(key.into()),
            help: Some("Compound keys are non-empty segments joined by the separator".into()),
            cause: Some(reason.into()),
        }
    }

    /// Create a type coercion error
    pub fn type_coercion(
        path: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::TypeCoercion,
            path: Some(path.into()),
            help: Some(format!(
                "Ensure the value can be converted to {}",
                expected.into()
            )),
            cause: Some(format!("Got: {}", got.into())),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            path: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            path: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create an extension already registered error
    pub fn already_registered(name: impl Into<String>) -> Self {
        let n = name.into();
        Self {
            kind: ErrorKind::AlreadyRegistered,
            path: None,
            help: Some(format!(
                "Use register_unique(..., force=true) to override the '{}' extension",
                n
            )),
            cause: Some(format!("Name: {}", n)),
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check whether this is a lookup failure (used by the silent accessors)
    pub fn is_key_not_found(&self) -> bool {
        self.kind == ErrorKind::KeyNotFound
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Main error message
        match &self.kind {
            ErrorKind::KeyNotFound => write!(f, "Key not found")?,
            ErrorKind::InvalidKey => write!(f, "Invalid compound key")?,
            ErrorKind::TypeCoercion => write!(f, "Type coercion failed")?,
            ErrorKind::Parse => write!(f, "Parse error")?,
            ErrorKind::Io => write!(f, "I/O error")?,
            ErrorKind::AlreadyRegistered => write!(f, "Extension is already registered")?,
        }

        // Path context
        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        // Cause
        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        // Help
        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

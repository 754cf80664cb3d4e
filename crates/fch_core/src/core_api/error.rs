use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    MalformedStream,
    UnsupportedVersion,
    IntegrityMismatch,
    TypeMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::MalformedStream, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::TypeMismatch, message)
    }

    /// `found` is newer than `highest` or not above `floor`.
    pub fn unsupported_version(what: &str, found: i32, floor: Option<i32>, highest: i32) -> Self {
        let message = match floor {
            Some(floor) if found <= floor => {
                format!("{what} version {found} is not supported (must be above {floor})")
            }
            _ => format!("unknown {what} version {found} (highest supported is {highest})"),
        };
        Self::new(CoreErrorCode::UnsupportedVersion, message)
    }

    /// Prefix the message with where the failure happened.
    pub fn context(mut self, what: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", what.as_ref(), self.message);
        self
    }
}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => {
                CoreErrorCode::MalformedStream
            }
            io::ErrorKind::InvalidInput => CoreErrorCode::TypeMismatch,
            _ => CoreErrorCode::Io,
        };
        Self::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        let code = if err.is_io() {
            CoreErrorCode::Io
        } else {
            CoreErrorCode::MalformedStream
        };
        Self::new(code, format!("json: {err}"))
    }
}

/// Checks a decoded schema version against the supported window.
pub(crate) fn check_version(what: &str, found: i32, floor: Option<i32>, highest: i32) -> CoreResult<()> {
    let too_old = floor.is_some_and(|floor| found <= floor);
    if found > highest || too_old {
        return Err(CoreError::unsupported_version(what, found, floor, highest));
    }
    Ok(())
}

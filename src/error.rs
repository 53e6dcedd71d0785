//! Error classification shared by every bounded context.
//!
//! Each error type in the crate exposes a `kind()` accessor returning an
//! [`ErrorKind`]. Callers translate failures into responses by looking the
//! kind up in [`ErrorKind::http_status`] instead of inspecting concrete error
//! types.

use std::fmt;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed or illegal input value.
    Validation,
    /// The caller presented no valid credentials.
    Unauthenticated,
    /// A referenced project or activity does not exist.
    NotFound,
    /// The operation is legal in isolation but violates current state.
    Conflict,
    /// An unexpected failure the caller cannot correct.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code conventionally used for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthenticated => 401,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    /// Returns the canonical snake-case name, used as a log field value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }

    /// Returns whether the caller can correct the failure by changing input.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

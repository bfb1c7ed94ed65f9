//! Error types for ZOON encoding and decoding.
//!
//! The codec is deliberately asymmetric about errors: encoding is strict about
//! its input shape but infallible for any [`crate::Value`], while decoding is
//! lenient and total over arbitrary body text (unparseable numbers become NaN
//! rather than errors). The only fatal decode condition is a structurally
//! broken tabular header.
//!
//! ## Examples
//!
//! ```rust
//! use serde_zoon::{decode, Error};
//!
//! // A line that looks tabular but has a malformed header token is fatal.
//! let result = decode("#broken name:s\nAlice");
//! assert!(matches!(result, Err(Error::MalformedHeader { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during ZOON encoding/decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A document routed to the tabular decoder whose first line does not
    /// start with a lone `#` token.
    #[error("malformed ZOON header: {msg}")]
    MalformedHeader { msg: String },

    /// A `T: Serialize` shape the ZOON value model cannot hold
    /// (non-string map keys, enum tuple variants, and the like).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error raised through `serde::ser::Error`.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed-header error.
    pub fn malformed_header(msg: &str) -> Self {
        Error::MalformedHeader {
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported type error for shapes the value model cannot hold.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zoon::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

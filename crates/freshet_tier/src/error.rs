// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache and revalidation operations.

use std::fmt;

/// Classifies an [`Error`].
///
/// The first four kinds are failures of the stale-while-revalidate contract itself and
/// are never swallowed by the decorator. [`ErrorKind::Store`] and [`ErrorKind::Revalidation`]
/// originate from collaborators and only disappear when a fault-tolerant wrapper is composed
/// around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A policy parameter is malformed, e.g. a ttl fraction outside `[0, 1]`.
    InvalidArgument,
    /// A write supplied no usable non-negative ttl.
    InvalidTtl,
    /// The underlying store returned a payload that is not a stale-while-revalidate item.
    InvalidCachedValue,
    /// A value could not be encoded for storage.
    Serialization,
    /// A store implementation failed.
    Store,
    /// A revalidation strategy failed.
    Revalidation,
}

impl ErrorKind {
    /// Returns a short, stable name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::InvalidTtl => "invalid ttl",
            Self::InvalidCachedValue => "invalid cached value",
            Self::Serialization => "serialization failed",
            Self::Store => "store operation failed",
            Self::Revalidation => "revalidation failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a cache or revalidation operation.
///
/// The [`kind`](Error::kind) tells callers which contract was violated. The underlying
/// cause, if any, is available through [`std::error::Error::source()`].
///
/// # Examples
///
/// ```
/// use freshet_tier::{Error, ErrorKind};
///
/// let error = Error::store("connection reset");
/// assert_eq!(error.kind(), ErrorKind::Store);
///
/// let error = Error::invalid_ttl("ttl must not be negative");
/// assert_eq!(error.kind(), ErrorKind::InvalidTtl);
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Creates a store error from any underlying cause.
    ///
    /// Store implementations outside this crate use this to report their failures.
    pub fn store(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Store, cause)
    }

    /// Creates a revalidation error from any underlying cause.
    pub fn revalidation(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Revalidation, cause)
    }

    /// Creates an invalid argument error with the given explanation.
    pub fn invalid_argument(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::InvalidArgument, cause)
    }

    /// Creates an invalid ttl error with the given explanation.
    pub fn invalid_ttl(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::InvalidTtl, cause)
    }

    /// Creates an error for a stored payload that could not be decoded.
    pub fn invalid_cached_value(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::InvalidCachedValue, cause)
    }

    /// Creates an error for a value that could not be encoded.
    pub fn serialization(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Serialization, cause)
    }
}

/// A specialized [`Result`] type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

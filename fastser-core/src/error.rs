// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error type shared by every layer of the encoder.
//!
//! Constructors are `#[cold]` and `#[track_caller]`: they sit on every error
//! branch of the hot write path, and keeping them out of line lets the
//! successful path stay small.

use std::borrow::Cow;

use thiserror::Error;

/// Set `FASTSER_PANIC_ON_ERROR=1` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("FASTSER_PANIC_ON_ERROR").is_some();

/// Error type for fastser encoding operations.
///
/// Always build errors through the static constructor functions
/// ([`Error::invalid_argument`], [`Error::unsupported_type`], ...) rather than
/// the variants, so that `FASTSER_PANIC_ON_ERROR` can point at the exact
/// creation site:
///
/// ```rust
/// use fastser_core::error::Error;
///
/// let err = Error::invalid_argument("class is null");
/// assert!(matches!(err, Error::InvalidArgument(_)));
/// ```
///
/// ```bash
/// RUST_BACKTRACE=1 FASTSER_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required argument was missing, e.g. a schema lookup for no class.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_argument`] instead.
    #[error("invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),

    /// An enum-like value whose class cannot be resolved to an enum type.
    ///
    /// Do not construct this variant directly; use [`Error::unsupported_type`] instead.
    #[error("unsupported type: {0}")]
    UnsupportedType(Cow<'static, str>),

    /// The stream was explicitly closed.
    ///
    /// Do not construct this variant directly; use [`Error::stream_closed`] instead.
    #[error("stream closed: {0}")]
    StreamClosed(Cow<'static, str>),

    /// Maximum nesting depth exceeded.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// A value did not match the schema it is being written with.
    ///
    /// Do not construct this variant directly; use [`Error::type_error`] instead.
    #[error("{0}")]
    TypeError(Cow<'static, str>),

    /// The codec could not encode a value.
    ///
    /// Do not construct this variant directly; use [`Error::encode_error`] instead.
    #[error("{0}")]
    EncodeError(Cow<'static, str>),

    /// Generic error.
    ///
    /// Do not construct this variant directly; use [`Error::unknown`] instead.
    #[error("{0}")]
    Unknown(Cow<'static, str>),

    /// Failure of the underlying sink. Propagated unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new [`Error::InvalidArgument`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_argument<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidArgument(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnsupportedType`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unsupported_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnsupportedType(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::StreamClosed`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn stream_closed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::StreamClosed(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TypeError`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::TypeError(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::EncodeError`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn encode_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::EncodeError(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Unknown`].
    ///
    /// If `FASTSER_PANIC_ON_ERROR` is set, this panics with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Unknown(s.into());
        if PANIC_ON_ERROR {
            panic!("FASTSER_PANIC_ON_ERROR: {}", err);
        }
        err
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use fastser_core::ensure;
/// use fastser_core::error::Error;
///
/// fn check_index(n: usize) -> Result<(), Error> {
///     ensure!(n < 256, "index {} does not fit in a byte", n);
///     Ok(())
/// }
/// assert!(check_index(300).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

//! Error types and result definitions for the skycat catalog toolkit.
//!
//! skycat uses a single error enum ([`Error`]) rather than crate-specific
//! error types. Every fallible operation across the workspace returns the
//! [`Result<T>`] alias defined here, so errors propagate naturally with the
//! `?` operator and callers can match on specific variants at the API
//! boundary.
//!
//! # Error Categories
//!
//! - **Structural errors** ([`Error::NotFound`], [`Error::LengthMismatch`],
//!   [`Error::InvalidIndex`], [`Error::ShapeMismatch`],
//!   [`Error::IncompatibleSources`]): contract violations raised
//!   synchronously at the call site, never deferred to materialization.
//! - **Collaborator errors** ([`Error::Arrow`], [`Error::Io`]): failures
//!   inside the array engine or the filesystem, propagated unchanged.
//! - **User input errors** ([`Error::InvalidArgumentError`]): bad parameters
//!   outside the structural categories above.
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;

/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// Every error names the driver operation that failed and the location(s) it was called with.
/// The underlying cause (usually an [`SdkError`]) is available through
/// [`std::error::Error::source`].
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    location: Option<String>,
    destination: Option<String>,
    not_found: bool,
    source: BoxError,
}

/// General categories of driver errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Reading the contents of a file failed
    ReadFailed,

    /// Writing a file failed
    WriteFailed,

    /// Deleting a file failed
    DeleteFailed,

    /// Copying a file failed
    CopyFailed,

    /// Moving a file failed. The destination may have been written even though the source
    /// could not be removed.
    MoveFailed,

    /// Looking up file metadata failed (existence, stats, visibility or a signed URL)
    MetadataFailed,

    /// Changing the visibility of a file failed
    SetVisibilityFailed,

    /// Driver configuration is missing or malformed
    InvalidConfig,
}

impl Error {
    /// Creates a new driver [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            location: None,
            destination: None,
            not_found: false,
            source: err.into(),
        }
    }

    fn from_cause<E>(kind: ErrorKind, err: E) -> Error
    where
        E: ErrorCause,
    {
        let not_found = err.is_missing_object();
        let mut err = Error::new(kind, err);
        err.not_found = not_found;
        err
    }

    fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    fn to(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The location the failed operation was called with.
    ///
    /// For `copy` and `move` this is the source location.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The destination location of a failed `copy` or `move`.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Returns true if the underlying cause was the object (or bucket) not being found.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location.as_deref().unwrap_or_default();
        let destination = self.destination.as_deref().unwrap_or_default();
        match &self.kind {
            ErrorKind::ReadFailed => write!(f, "cannot read file at `{location}`"),
            ErrorKind::WriteFailed => write!(f, "cannot write file at `{location}`"),
            ErrorKind::DeleteFailed => write!(f, "cannot delete file at `{location}`"),
            ErrorKind::CopyFailed => {
                write!(f, "cannot copy file from `{location}` to `{destination}`")
            }
            ErrorKind::MoveFailed => {
                write!(f, "cannot move file from `{location}` to `{destination}`")
            }
            ErrorKind::MetadataFailed => {
                write!(f, "cannot read metadata of file at `{location}`")
            }
            ErrorKind::SetVisibilityFailed => {
                write!(f, "cannot set visibility of file at `{location}`")
            }
            ErrorKind::InvalidConfig => write!(f, "invalid driver configuration"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// An underlying failure the driver knows how to classify.
pub(crate) trait ErrorCause: Into<BoxError> {
    /// True when the failure means the requested object does not exist.
    fn is_missing_object(&self) -> bool {
        false
    }

    /// True when the service named the missing object (`NoSuchKey`/`NotFound`) rather than just
    /// answering `404`, which a missing bucket does too.
    fn is_missing_key(&self) -> bool {
        false
    }
}

impl<E> ErrorCause for SdkError<E, HttpResponse>
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    fn is_missing_object(&self) -> bool {
        if self.is_missing_key() {
            return true;
        }

        match self {
            SdkError::ServiceError(_) => self
                .raw_response()
                .is_some_and(|resp| resp.status().as_u16() == 404),
            _ => false,
        }
    }

    fn is_missing_key(&self) -> bool {
        matches!(self.code(), Some("NotFound" | "NoSuchKey"))
    }
}

impl ErrorCause for Error {
    fn is_missing_object(&self) -> bool {
        self.not_found
    }
}

impl ErrorCause for aws_smithy_types::byte_stream::error::Error {}

impl ErrorCause for aws_sdk_s3::presigning::PresigningConfigError {}

pub(crate) fn read_failed<E>(location: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let location = location.to_owned();
    move |err| Error::from_cause(ErrorKind::ReadFailed, err).at(location)
}

pub(crate) fn write_failed<E>(location: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let location = location.to_owned();
    move |err| Error::from_cause(ErrorKind::WriteFailed, err).at(location)
}

pub(crate) fn delete_failed<E>(location: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let location = location.to_owned();
    move |err| Error::from_cause(ErrorKind::DeleteFailed, err).at(location)
}

pub(crate) fn metadata_failed<E>(location: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let location = location.to_owned();
    move |err| Error::from_cause(ErrorKind::MetadataFailed, err).at(location)
}

pub(crate) fn set_visibility_failed<E>(location: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let location = location.to_owned();
    move |err| Error::from_cause(ErrorKind::SetVisibilityFailed, err).at(location)
}

pub(crate) fn copy_failed<E>(source: &str, destination: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let (source, destination) = (source.to_owned(), destination.to_owned());
    move |err| {
        Error::from_cause(ErrorKind::CopyFailed, err)
            .at(source)
            .to(destination)
    }
}

pub(crate) fn move_failed<E>(source: &str, destination: &str) -> impl FnOnce(E) -> Error
where
    E: ErrorCause,
{
    let (source, destination) = (source.to_owned(), destination.to_owned());
    move |err| {
        Error::from_cause(ErrorKind::MoveFailed, err)
            .at(source)
            .to(destination)
    }
}

pub(crate) fn invalid_config<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InvalidConfig, err)
}

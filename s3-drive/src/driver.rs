/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::error::Error;
use crate::types::{FileStats, SignedUrlOptions, Visibility, WriteOptions};

/// A file storage backend.
///
/// Locations are opaque keys. Drivers pass them through verbatim and have no notion of
/// directories. Every operation is independent: there is no locking or ordering between
/// concurrent calls on the same location.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Read the full contents of the file at `location`.
    async fn get(&self, location: &str) -> Result<Bytes, Error>;

    /// Open the file at `location` as a stream.
    ///
    /// The caller is responsible for consuming or dropping the stream.
    async fn get_stream(&self, location: &str) -> Result<ByteStream, Error>;

    /// Returns whether a file exists at `location`.
    ///
    /// A missing file is `Ok(false)`, never an error.
    async fn exists(&self, location: &str) -> Result<bool, Error>;

    /// Returns the visibility of the file at `location`.
    async fn get_visibility(&self, location: &str) -> Result<Visibility, Error>;

    /// Returns size, modification time and entity tag of the file at `location`.
    async fn get_stats(&self, location: &str) -> Result<FileStats, Error>;

    /// Returns a time limited URL granting read access to the file at `location`.
    async fn get_signed_url(
        &self,
        location: &str,
        options: SignedUrlOptions,
    ) -> Result<String, Error>;

    /// Returns a stable URL for the file at `location`.
    ///
    /// This is a pure function of the driver configuration and `location`; no request is made.
    fn get_url(&self, location: &str) -> String;

    /// Write `contents` to `location`, replacing any existing file.
    async fn put(&self, location: &str, contents: Bytes, options: WriteOptions)
        -> Result<(), Error>;

    /// Write the contents of `stream` to `location`, replacing any existing file.
    ///
    /// The stream is sent as a single request body, so its size must be known up front (e.g. a
    /// stream built from bytes or from a file). A stream of unknown length is rejected by the
    /// service with a [`WriteFailed`](crate::error::ErrorKind::WriteFailed) error.
    async fn put_stream(
        &self,
        location: &str,
        stream: ByteStream,
        options: WriteOptions,
    ) -> Result<(), Error>;

    /// Change the visibility of the file at `location`.
    async fn set_visibility(&self, location: &str, visibility: Visibility) -> Result<(), Error>;

    /// Delete the file at `location`. Deleting a missing file succeeds.
    async fn delete(&self, location: &str) -> Result<(), Error>;

    /// Copy the file at `source` to `destination`.
    ///
    /// Without an explicit visibility in `options` the destination gets the visibility of the
    /// source.
    async fn copy(
        &self,
        source: &str,
        destination: &str,
        options: WriteOptions,
    ) -> Result<(), Error>;

    /// Move the file at `source` to `destination`.
    ///
    /// Not atomic: the file is copied, then the source is deleted. If the delete fails a
    /// [`MoveFailed`](crate::error::ErrorKind::MoveFailed) error is returned and the
    /// destination is left in place.
    ///
    /// Moving a file onto its own location keeps it. The file must exist, and a visibility or
    /// headers in `options` are applied to it.
    async fn move_to(
        &self,
        source: &str,
        destination: &str,
        options: WriteOptions,
    ) -> Result<(), Error>;
}

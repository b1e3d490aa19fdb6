/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::error::Error;
use crate::operation::{copy, delete, metadata, read, url, write};
use crate::types::{FileStats, SignedUrlOptions, Visibility, WriteOptions};
use crate::{Config, Driver};

/// File storage driver for Amazon Simple Storage Service.
///
/// Cloning is cheap; clones share the same configuration and S3 client.
#[derive(Debug, Clone)]
pub struct S3Driver {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: Config,
}

impl Handle {
    /// The S3 client to use for SDK operations
    pub(crate) fn client(&self) -> &aws_sdk_s3::Client {
        self.config.client()
    }

    /// The bucket every location lives in
    pub(crate) fn bucket(&self) -> &str {
        self.config.bucket()
    }
}

impl S3Driver {
    /// Creates a new driver from a driver config.
    pub fn new(config: Config) -> S3Driver {
        let handle = Arc::new(Handle { config });
        S3Driver { handle }
    }

    /// Returns the driver's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// The underlying S3 client, for requests this driver does not cover.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        self.handle.client()
    }
}

#[async_trait]
impl Driver for S3Driver {
    async fn get(&self, location: &str) -> Result<Bytes, Error> {
        read::get(&self.handle, location).await
    }

    async fn get_stream(&self, location: &str) -> Result<ByteStream, Error> {
        read::get_stream(&self.handle, location).await
    }

    async fn exists(&self, location: &str) -> Result<bool, Error> {
        metadata::exists(&self.handle, location).await
    }

    async fn get_visibility(&self, location: &str) -> Result<Visibility, Error> {
        metadata::get_visibility(&self.handle, location).await
    }

    async fn get_stats(&self, location: &str) -> Result<FileStats, Error> {
        metadata::get_stats(&self.handle, location).await
    }

    async fn get_signed_url(
        &self,
        location: &str,
        options: SignedUrlOptions,
    ) -> Result<String, Error> {
        metadata::get_signed_url(&self.handle, location, options).await
    }

    fn get_url(&self, location: &str) -> String {
        url::get_url(&self.handle.config, location)
    }

    async fn put(
        &self,
        location: &str,
        contents: Bytes,
        options: WriteOptions,
    ) -> Result<(), Error> {
        write::put(&self.handle, location, contents, options).await
    }

    async fn put_stream(
        &self,
        location: &str,
        stream: ByteStream,
        options: WriteOptions,
    ) -> Result<(), Error> {
        write::put_stream(&self.handle, location, stream, options).await
    }

    async fn set_visibility(&self, location: &str, visibility: Visibility) -> Result<(), Error> {
        write::set_visibility(&self.handle, location, visibility).await
    }

    async fn delete(&self, location: &str) -> Result<(), Error> {
        delete::delete(&self.handle, location).await
    }

    async fn copy(
        &self,
        source: &str,
        destination: &str,
        options: WriteOptions,
    ) -> Result<(), Error> {
        copy::copy(&self.handle, source, destination, options).await
    }

    async fn move_to(
        &self,
        source: &str,
        destination: &str,
        options: WriteOptions,
    ) -> Result<(), Error> {
        copy::move_to(&self.handle, source, destination, options).await
    }
}

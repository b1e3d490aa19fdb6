/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use crate::error;

/// Default lifetime of a signed URL
pub(crate) const DEFAULT_SIGNED_URL_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// Who may read a file without credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Anyone can read the file (`public-read` canned ACL).
    Public,

    /// Only the bucket owner can read the file (`private` canned ACL).
    #[default]
    Private,
}

impl Visibility {
    /// The string form of this visibility, `public` or `private`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(error::invalid_config(format!(
                "visibility must be `public` or `private`, got `{other}`"
            ))),
        }
    }
}

/// Content headers of a stored object.
///
/// When writing they are stored with the object. When signing a URL they override the
/// headers of the download response instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHeaders {
    pub(crate) content_type: Option<String>,
    pub(crate) content_disposition: Option<String>,
    pub(crate) content_encoding: Option<String>,
    pub(crate) content_language: Option<String>,
    pub(crate) cache_control: Option<String>,
}

impl ContentHeaders {
    /// The `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The `Content-Disposition` header
    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    /// The `Content-Encoding` header
    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    /// The `Content-Language` header
    pub fn content_language(&self) -> Option<&str> {
        self.content_language.as_deref()
    }

    /// The `Cache-Control` header
    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self == &ContentHeaders::default()
    }
}

/// Options applied when writing, copying or moving a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub(crate) visibility: Option<Visibility>,
    pub(crate) headers: ContentHeaders,
    pub(crate) extra: HashMap<String, String>,
}

impl WriteOptions {
    /// Create a new `WriteOptions` builder
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::default()
    }

    /// Visibility override. `None` means the driver's configured default.
    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    /// Content headers stored with the object
    pub fn headers(&self) -> &ContentHeaders {
        &self.headers
    }

    /// Provider specific fields
    pub fn extra(&self) -> &HashMap<String, String> {
        &self.extra
    }
}

/// Fluent style builder for [WriteOptions]
#[derive(Debug, Clone, Default)]
pub struct WriteOptionsBuilder {
    inner: WriteOptions,
}

impl WriteOptionsBuilder {
    /// Store the object as [`Visibility::Public`] or [`Visibility::Private`].
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.inner.visibility = Some(visibility);
        self
    }

    /// Set the `Content-Type` stored with the object
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_type = Some(value.into());
        self
    }

    /// Set the `Content-Disposition` stored with the object
    pub fn content_disposition(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_disposition = Some(value.into());
        self
    }

    /// Set the `Content-Encoding` stored with the object
    pub fn content_encoding(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_encoding = Some(value.into());
        self
    }

    /// Set the `Content-Language` stored with the object
    pub fn content_language(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_language = Some(value.into());
        self
    }

    /// Set the `Cache-Control` stored with the object
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.cache_control = Some(value.into());
        self
    }

    /// Add a provider specific field.
    ///
    /// `StorageClass`, `ServerSideEncryption`, `SSEKMSKeyId`, `Tagging` and
    /// `WebsiteRedirectLocation` are sent as the request field of the same name. Any other key
    /// is stored as user-defined object metadata (`x-amz-meta-<key>`).
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.extra.insert(key.into(), value.into());
        self
    }

    /// Consumes the builder and constructs [`WriteOptions`]
    pub fn build(self) -> WriteOptions {
        self.inner
    }
}

/// Options for generating a signed URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedUrlOptions {
    pub(crate) headers: ContentHeaders,
    pub(crate) expires_in: Option<Duration>,
}

impl SignedUrlOptions {
    /// Create a new `SignedUrlOptions` builder
    pub fn builder() -> SignedUrlOptionsBuilder {
        SignedUrlOptionsBuilder::default()
    }

    /// Response headers the download will be served with
    pub fn headers(&self) -> &ContentHeaders {
        &self.headers
    }

    /// How long the URL stays valid
    pub fn expires_in(&self) -> Duration {
        self.expires_in.unwrap_or(DEFAULT_SIGNED_URL_EXPIRY)
    }
}

/// Fluent style builder for [SignedUrlOptions]
#[derive(Debug, Clone, Default)]
pub struct SignedUrlOptionsBuilder {
    inner: SignedUrlOptions,
}

impl SignedUrlOptionsBuilder {
    /// Serve the download with this `Content-Type`
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_type = Some(value.into());
        self
    }

    /// Serve the download with this `Content-Disposition`
    pub fn content_disposition(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_disposition = Some(value.into());
        self
    }

    /// Serve the download with this `Content-Encoding`
    pub fn content_encoding(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_encoding = Some(value.into());
        self
    }

    /// Serve the download with this `Content-Language`
    pub fn content_language(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.content_language = Some(value.into());
        self
    }

    /// Serve the download with this `Cache-Control`
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.inner.headers.cache_control = Some(value.into());
        self
    }

    /// How long the URL stays valid. Default is 30 minutes.
    pub fn expires_in(mut self, expires_in: Duration) -> Self {
        self.inner.expires_in = Some(expires_in);
        self
    }

    /// Consumes the builder and constructs [`SignedUrlOptions`]
    pub fn build(self) -> SignedUrlOptions {
        self.inner
    }
}

/// Metadata of a stored file
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// When the object was last modified
    pub modified: SystemTime,

    /// Size in bytes
    pub size: u64,

    /// Always true, object storage has no directories
    pub is_file: bool,

    /// Entity tag of the object
    pub etag: Option<String>,
}

/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::config::{Credentials, Region};
use aws_types::SdkConfig;

use crate::error::{self, Error};
use crate::types::Visibility;

pub mod loader;

/// Provider name attached to credentials given as a key/secret pair
const STATIC_CREDENTIALS_PROVIDER: &str = "S3DriveStaticCredentials";

/// Configuration for an [`S3Driver`](crate::client::S3Driver)
///
/// A `Config` is immutable once built. Operations never change it.
#[derive(Debug, Clone)]
pub struct Config {
    bucket: String,
    region: Option<String>,
    endpoint: Option<String>,
    visibility: Visibility,
    cdn_url: Option<String>,
    client: aws_sdk_s3::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The bucket every location is resolved against
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The configured region, if any
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The configured custom endpoint without a trailing `/`, if any.
    ///
    /// `None` means the default Amazon S3 endpoint.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Visibility of written files when the write does not ask for one
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Base URL of a CDN serving the bucket, without a trailing `/`
    pub fn cdn_url(&self) -> Option<&str> {
        self.cdn_url.as_deref()
    }

    /// The Amazon S3 client instance that will be used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    bucket: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    credentials: Option<Credentials>,
    visibility: Option<Visibility>,
    cdn_url: Option<String>,
    force_path_style: Option<bool>,
    sdk_config: Option<SdkConfig>,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// The bucket to store files in. Required.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// The region of the bucket.
    ///
    /// Default is the region of the shared SDK configuration.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Send requests to a custom endpoint, e.g. an S3-compatible service.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sign requests with a static access key and secret.
    ///
    /// Default is the credential provider chain of the shared SDK configuration.
    pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(
            key,
            secret,
            None,
            None,
            STATIC_CREDENTIALS_PROVIDER,
        ));
        self
    }

    /// Sign requests with the given credentials
    pub fn set_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Visibility of written files when the write does not ask for one.
    ///
    /// Default is [`Visibility::Private`].
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Base URL of a CDN serving the bucket. Used by
    /// [`get_url`](crate::Driver::get_url) instead of the bucket endpoint.
    pub fn cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.cdn_url = Some(cdn_url.into());
        self
    }

    /// Address the bucket as a path segment instead of a sub-domain (required by most
    /// S3-compatible services).
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// The shared SDK configuration the S3 client configuration is derived from.
    pub fn sdk_config(mut self, sdk_config: SdkConfig) -> Self {
        self.sdk_config = Some(sdk_config);
        self
    }

    /// Set an explicit S3 client to use.
    ///
    /// The client is used as-is: region, endpoint, credentials and path style settings of this
    /// builder are not applied to it.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Result<Config, Error> {
        let bucket = self
            .bucket
            .clone()
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(|| error::invalid_config("a bucket is required"))?;

        let client = match &self.client {
            Some(client) => client.clone(),
            None => {
                let base = self
                    .sdk_config
                    .clone()
                    .unwrap_or_else(|| SdkConfig::builder().build());
                aws_sdk_s3::Client::from_conf(client_config(&base, &self))
            }
        };

        Ok(Config {
            bucket,
            region: self.region,
            endpoint: self.endpoint.map(|e| e.trim_end_matches('/').to_owned()),
            visibility: self.visibility.unwrap_or_default(),
            cdn_url: self.cdn_url.map(|u| u.trim_end_matches('/').to_owned()),
            client,
        })
    }
}

/// Derive the S3 client configuration from the shared SDK configuration and the driver
/// settings. `base` is left untouched.
pub(crate) fn client_config(base: &SdkConfig, settings: &Builder) -> aws_sdk_s3::Config {
    let mut conf = aws_sdk_s3::config::Builder::from(base);

    if let Some(region) = &settings.region {
        conf = conf.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &settings.endpoint {
        conf = conf.endpoint_url(endpoint);
    }
    if let Some(credentials) = &settings.credentials {
        conf = conf.credentials_provider(credentials.clone());
    }

    conf.force_path_style(settings.force_path_style.unwrap_or_default())
        .build()
}

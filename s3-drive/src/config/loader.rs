/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_types::os_shim_internal::Env;

use crate::config::Builder;
use crate::error::Error;
use crate::types::Visibility;
use crate::Config;

const ENV_KEY: &str = "S3_KEY";
const ENV_SECRET: &str = "S3_SECRET";
const ENV_BUCKET: &str = "S3_BUCKET";
const ENV_REGION: &str = "S3_REGION";
const ENV_ENDPOINT: &str = "S3_ENDPOINT";
const ENV_CDN_URL: &str = "S3_CDN_URL";
const ENV_VISIBILITY: &str = "S3_VISIBILITY";
const ENV_FORCE_PATH_STYLE: &str = "S3_FORCE_PATH_STYLE";

/// Load driver [`Config`] from the environment.
///
/// Recognized variables are `S3_KEY`, `S3_SECRET`, `S3_BUCKET`, `S3_REGION`, `S3_ENDPOINT`,
/// `S3_CDN_URL`, `S3_VISIBILITY` and `S3_FORCE_PATH_STYLE`. Values set explicitly on the loader
/// take precedence over the environment. Anything left unset (credentials, region) falls back to
/// the default AWS SDK provider chains.
#[derive(Debug)]
pub struct ConfigLoader {
    builder: Builder,
    env: Env,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            builder: Builder::default(),
            env: Env::real(),
        }
    }
}

impl ConfigLoader {
    /// The bucket to store files in
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.builder = self.builder.bucket(bucket);
        self
    }

    /// The region of the bucket
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.builder = self.builder.region(region);
        self
    }

    /// Send requests to a custom endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.builder = self.builder.endpoint(endpoint);
        self
    }

    /// Sign requests with a static access key and secret
    pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.builder = self.builder.credentials(key, secret);
        self
    }

    /// Visibility of written files when the write does not ask for one
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.builder = self.builder.visibility(visibility);
        self
    }

    /// Base URL of a CDN serving the bucket
    pub fn cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.builder = self.builder.cdn_url(cdn_url);
        self
    }

    /// Address the bucket as a path segment instead of a sub-domain
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.builder = self.builder.force_path_style(force_path_style);
        self
    }

    #[cfg(test)]
    pub(crate) fn env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Fill every setting that was not set explicitly from the environment.
    fn resolve(self) -> Result<Builder, Error> {
        let env = self.env;
        let var = |key: &str| env.get(key).ok().filter(|value| !value.is_empty());
        let mut builder = self.builder;

        if builder.bucket.is_none() {
            builder.bucket = var(ENV_BUCKET);
        }
        if builder.region.is_none() {
            builder.region = var(ENV_REGION);
        }
        if builder.endpoint.is_none() {
            builder.endpoint = var(ENV_ENDPOINT);
        }
        if builder.cdn_url.is_none() {
            builder.cdn_url = var(ENV_CDN_URL);
        }
        if builder.credentials.is_none() {
            if let (Some(key), Some(secret)) = (var(ENV_KEY), var(ENV_SECRET)) {
                builder = builder.credentials(key, secret);
            }
        }
        if builder.visibility.is_none() {
            builder.visibility = var(ENV_VISIBILITY)
                .map(|value| value.parse())
                .transpose()?;
        }
        if builder.force_path_style.is_none() {
            builder.force_path_style = var(ENV_FORCE_PATH_STYLE)
                .map(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "1"));
        }

        Ok(builder)
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the values from the environment will be provided.
    pub async fn load(self) -> Result<Config, Error> {
        let builder = self.resolve()?;
        let shared_config = aws_config::from_env().load().await;
        tracing::debug!(
            bucket = ?builder.bucket,
            region = ?builder.region,
            endpoint = ?builder.endpoint,
            "loaded driver configuration from the environment"
        );
        builder.sdk_config(shared_config).build()
    }
}

#[cfg(test)]
mod test {
    use super::ConfigLoader;
    use crate::error::ErrorKind;
    use crate::types::Visibility;
    use aws_types::os_shim_internal::Env;

    #[test]
    fn test_resolve_from_env() {
        let env = Env::from_slice(&[
            ("S3_KEY", "key"),
            ("S3_SECRET", "secret"),
            ("S3_BUCKET", "docs"),
            ("S3_REGION", "us-east-1"),
            ("S3_ENDPOINT", ""),
            ("S3_VISIBILITY", "public"),
            ("S3_FORCE_PATH_STYLE", "TRUE"),
        ]);

        let builder = ConfigLoader::default().env(env).resolve().unwrap();
        assert_eq!(Some("docs"), builder.bucket.as_deref());
        assert_eq!(Some("us-east-1"), builder.region.as_deref());
        assert_eq!(None, builder.endpoint);
        assert_eq!(Some(Visibility::Public), builder.visibility);
        assert_eq!(Some(true), builder.force_path_style);
        let credentials = builder.credentials.expect("credentials from env");
        assert_eq!("key", credentials.access_key_id());
    }

    #[test]
    fn test_explicit_values_win() {
        let env = Env::from_slice(&[("S3_BUCKET", "docs"), ("S3_VISIBILITY", "public")]);

        let builder = ConfigLoader::default()
            .env(env)
            .bucket("images")
            .visibility(Visibility::Private)
            .resolve()
            .unwrap();
        assert_eq!(Some("images"), builder.bucket.as_deref());
        assert_eq!(Some(Visibility::Private), builder.visibility);
        assert!(builder.credentials.is_none());
    }

    #[test]
    fn test_invalid_visibility() {
        let env = Env::from_slice(&[("S3_BUCKET", "docs"), ("S3_VISIBILITY", "world")]);
        let err = ConfigLoader::default().env(env).resolve().unwrap_err();
        assert_eq!(&ErrorKind::InvalidConfig, err.kind());
    }
}

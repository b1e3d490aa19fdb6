/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::Config;

/// Host of the default (global) Amazon S3 endpoint
const DEFAULT_HOST: &str = "s3.amazonaws.com";

/// Endpoints starting with this are served by Amazon S3 itself
const DEFAULT_ENDPOINT_PREFIX: &str = "https://s3.amazonaws";

/// Build the public URL of `location`. No request is made.
///
/// In order of precedence: the CDN base URL, the virtual-hosted style URL of the default
/// endpoint, or the path style URL of a custom endpoint.
pub(crate) fn get_url(config: &Config, location: &str) -> String {
    if let Some(cdn_url) = config.cdn_url() {
        return format!("{cdn_url}/{location}");
    }

    match config.endpoint() {
        Some(endpoint) if !endpoint.starts_with(DEFAULT_ENDPOINT_PREFIX) => {
            format!("{endpoint}/{}/{location}", config.bucket())
        }
        _ => format!("https://{}.{DEFAULT_HOST}/{location}", config.bucket()),
    }
}

#[cfg(test)]
mod test {
    use super::get_url;
    use crate::config::Builder;
    use crate::Config;
    use aws_sdk_s3::config::BehaviorVersion;

    fn config_with(builder: Builder) -> Config {
        let client = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .build(),
        );
        builder.bucket("docs").client(client).build().unwrap()
    }

    #[test]
    fn test_default_endpoint() {
        let config = config_with(Config::builder());
        assert_eq!(
            "https://docs.s3.amazonaws.com/a/b.txt",
            get_url(&config, "a/b.txt")
        );

        let config = config_with(Config::builder().endpoint("https://s3.amazonaws.com"));
        assert_eq!(
            "https://docs.s3.amazonaws.com/a/b.txt",
            get_url(&config, "a/b.txt")
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let config = config_with(Config::builder().endpoint("http://localhost:9000/"));
        assert_eq!(
            "http://localhost:9000/docs/a/b.txt",
            get_url(&config, "a/b.txt")
        );
    }

    #[test]
    fn test_cdn_wins_over_endpoint() {
        let config = config_with(
            Config::builder()
                .endpoint("http://localhost:9000")
                .cdn_url("https://cdn.example.com"),
        );
        assert_eq!(
            "https://cdn.example.com/a/b.txt",
            get_url(&config, "a/b.txt")
        );
    }

    #[test]
    fn test_url_is_stable() {
        let config = config_with(Config::builder().cdn_url("https://cdn.example.com"));
        assert_eq!(get_url(&config, "x.png"), get_url(&config, "x.png"));
    }
}

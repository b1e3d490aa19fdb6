/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! A file storage driver backed by Amazon S3 and S3-compatible object storage.
//!
//! S3 Drive exposes a small, uniform set of file operations (read, write, delete, copy, move,
//! stat, visibility and URL generation) through the [`Driver`] trait, and implements them with
//! [`S3Driver`] on top of the Amazon S3 [service API]. Every operation maps onto one (or, for
//! `copy` and `move`, a few) S3 requests. Failures are reported as a typed [`error::Error`]
//! identifying the operation and location(s) involved.
//!
//! [service API]: https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations_Amazon_Simple_Storage_Service.html
//!
//! # Examples
//!
//! Load the configuration from the environment (`S3_KEY`, `S3_SECRET`, `S3_BUCKET`,
//! `S3_REGION`, `S3_ENDPOINT`):
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_drive::error::Error> {
//! let config = s3_drive::from_env().load().await?;
//! let drive = s3_drive::S3Driver::new(config);
//! # Ok(())
//! # }
//! ```
//!
//! Write and read back a file:
//!
//! ```no_run
//! use s3_drive::types::{Visibility, WriteOptions};
//! use s3_drive::Driver;
//!
//! # async fn example(drive: &s3_drive::S3Driver) -> Result<(), s3_drive::error::Error> {
//! let options = WriteOptions::builder()
//!     .visibility(Visibility::Public)
//!     .content_type("text/plain")
//!     .build();
//!
//! drive.put("notes/today.txt", "hello world".into(), options).await?;
//! let contents = drive.get("notes/today.txt").await?;
//! assert_eq!(&contents[..], b"hello world");
//!
//! // stable URL, no request is made
//! let url = drive.get_url("notes/today.txt");
//! # Ok(())
//! # }
//! ```

/// Error types emitted by `s3-drive`
pub mod error;

/// Common types used by `s3-drive`
pub mod types;

/// Driver configuration
pub mod config;

/// The file storage driver contract
pub mod driver;

/// Amazon S3 backed driver
pub mod client;

/// Driver operations
pub(crate) mod operation;

pub use self::client::S3Driver;
use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::driver::Driver;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}

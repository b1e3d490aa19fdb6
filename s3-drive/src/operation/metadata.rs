/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::SystemTime;

use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;

use crate::client::Handle;
use crate::error::{self, Error, ErrorCause};
use crate::operation::convert;
use crate::types::{FileStats, SignedUrlOptions, Visibility};

/// Returns whether an object exists at `location`. Not found is `Ok(false)`.
pub(crate) async fn exists(handle: &Handle, location: &str) -> Result<bool, Error> {
    let resp = handle
        .client()
        .head_object()
        .bucket(handle.bucket())
        .key(location)
        .send()
        .await;

    match resp {
        Ok(_) => Ok(true),
        Err(err)
            if err.as_service_error().is_some_and(HeadObjectError::is_not_found)
                || err.is_missing_object() =>
        {
            tracing::trace!(location, "object not found");
            Ok(false)
        }
        Err(err) => Err(error::metadata_failed(location)(err)),
    }
}

/// Resolve the visibility of `location` from its access control grants
pub(crate) async fn get_visibility(handle: &Handle, location: &str) -> Result<Visibility, Error> {
    let resp = handle
        .client()
        .get_object_acl()
        .bucket(handle.bucket())
        .key(location)
        .send()
        .await
        .map_err(error::metadata_failed(location))?;

    Ok(convert::visibility_from_grants(resp.grants()))
}

pub(crate) async fn get_stats(handle: &Handle, location: &str) -> Result<FileStats, Error> {
    let resp = handle
        .client()
        .head_object()
        .bucket(handle.bucket())
        .key(location)
        .send()
        .await
        .map_err(error::metadata_failed(location))?;

    let modified = resp
        .last_modified()
        .and_then(|dt| SystemTime::try_from(*dt).ok())
        .unwrap_or(SystemTime::UNIX_EPOCH);

    Ok(FileStats {
        modified,
        size: resp
            .content_length()
            .and_then(|len| u64::try_from(len).ok())
            .unwrap_or_default(),
        is_file: true,
        etag: resp.e_tag().map(str::to_owned),
    })
}

/// Presign a `GetObject` request for `location`
pub(crate) async fn get_signed_url(
    handle: &Handle,
    location: &str,
    options: SignedUrlOptions,
) -> Result<String, Error> {
    let expires_in = options.expires_in();
    let presigning =
        PresigningConfig::expires_in(expires_in).map_err(error::metadata_failed(location))?;

    tracing::trace!(
        bucket = handle.bucket(),
        location,
        ?expires_in,
        headers = ?options.headers(),
        "presigning get object request"
    );

    let req = handle
        .client()
        .get_object()
        .bucket(handle.bucket())
        .key(location);
    let presigned = convert::copy_headers_to_get_object_request(options.headers(), req)
        .presigned(presigning)
        .await
        .map_err(error::metadata_failed(location))?;

    Ok(presigned.uri().to_owned())
}

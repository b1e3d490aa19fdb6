/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::client::Handle;
use crate::error::{self, Error};
use crate::operation::convert::{self, WriteFields};
use crate::types::{Visibility, WriteOptions};

pub(crate) async fn put(
    handle: &Handle,
    location: &str,
    contents: Bytes,
    options: WriteOptions,
) -> Result<(), Error> {
    put_stream(handle, location, ByteStream::from(contents), options).await
}

/// Write `body` to `location` with a single `PutObject` request.
///
/// No multipart upload: `body` must report its content length.
pub(crate) async fn put_stream(
    handle: &Handle,
    location: &str,
    body: ByteStream,
    options: WriteOptions,
) -> Result<(), Error> {
    let fields = WriteFields::new(&options, handle.config.visibility());
    tracing::trace!(
        bucket = handle.bucket(),
        location,
        ?fields,
        "sending put object request"
    );

    let req = handle
        .client()
        .put_object()
        .bucket(handle.bucket())
        .key(location)
        .body(body);
    convert::copy_fields_to_put_object_request(&fields, req)
        .send()
        .await
        .map_err(error::write_failed(location))?;

    Ok(())
}

pub(crate) async fn set_visibility(
    handle: &Handle,
    location: &str,
    visibility: Visibility,
) -> Result<(), Error> {
    handle
        .client()
        .put_object_acl()
        .bucket(handle.bucket())
        .key(location)
        .acl(convert::canned_acl(visibility))
        .send()
        .await
        .map_err(error::set_visibility_failed(location))?;

    Ok(())
}

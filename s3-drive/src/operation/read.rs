/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::client::Handle;
use crate::error::{self, Error};

/// Open the object at `location` as a live body stream
pub(crate) async fn get_stream(handle: &Handle, location: &str) -> Result<ByteStream, Error> {
    let resp = handle
        .client()
        .get_object()
        .bucket(handle.bucket())
        .key(location)
        .send()
        .await
        .map_err(error::read_failed(location))?;

    Ok(resp.body)
}

/// Read the full object at `location`, draining the body stream
pub(crate) async fn get(handle: &Handle, location: &str) -> Result<Bytes, Error> {
    let body = get_stream(handle, location).await?;
    let data = body
        .collect()
        .await
        .map_err(error::read_failed(location))?;

    Ok(data.into_bytes())
}

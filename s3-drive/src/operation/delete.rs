/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::client::Handle;
use crate::error::{self, Error, ErrorCause};

/// Delete the object at `location`.
///
/// Deleting a missing object succeeds. S3 answers `204` either way, and services that answer
/// `NoSuchKey`/`NotFound` are treated the same. A bare `404` is not: it may be a missing bucket.
pub(crate) async fn delete(handle: &Handle, location: &str) -> Result<(), Error> {
    let resp = handle
        .client()
        .delete_object()
        .bucket(handle.bucket())
        .key(location)
        .send()
        .await;

    match resp {
        Ok(_) => Ok(()),
        Err(err) if err.is_missing_key() => {
            tracing::trace!(location, "object to delete was not found");
            Ok(())
        }
        Err(err) => Err(error::delete_failed(location)(err)),
    }
}

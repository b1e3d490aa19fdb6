/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Translation of driver options into S3 request fields
pub(crate) mod convert;

/// `get` and `get_stream`
pub(crate) mod read;

/// `exists`, `get_visibility`, `get_stats` and `get_signed_url`
pub(crate) mod metadata;

/// `put`, `put_stream` and `set_visibility`
pub(crate) mod write;

/// `delete`
pub(crate) mod delete;

/// `copy` and `move_to`
pub(crate) mod copy;

/// `get_url`
pub(crate) mod url;

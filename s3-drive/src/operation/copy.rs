/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::types::MetadataDirective;

use crate::client::Handle;
use crate::error::{self, Error};
use crate::operation::convert::{self, WriteFields};
use crate::operation::{delete, metadata, write};
use crate::types::WriteOptions;

/// Copy `source` to `destination` with a single `CopyObject` request.
///
/// S3 does not carry the ACL of the source over, so unless `options` asks for a visibility the
/// source visibility is looked up first and applied to the copy.
///
/// A copy onto itself always replaces the stored metadata with the one in `options`, S3
/// refuses an in-place copy that changes nothing.
pub(crate) async fn copy(
    handle: &Handle,
    source: &str,
    destination: &str,
    mut options: WriteOptions,
) -> Result<(), Error> {
    if options.visibility.is_none() {
        let visibility = metadata::get_visibility(handle, source)
            .await
            .map_err(error::copy_failed(source, destination))?;
        options.visibility = Some(visibility);
    }

    let fields = WriteFields::new(&options, handle.config.visibility());
    let copy_source = convert::copy_source(handle.bucket(), source);
    tracing::trace!(
        bucket = handle.bucket(),
        copy_source,
        destination,
        ?fields,
        "sending copy object request"
    );

    let req = handle
        .client()
        .copy_object()
        .bucket(handle.bucket())
        .key(destination)
        .copy_source(copy_source);
    let mut req = convert::copy_fields_to_copy_object_request(&fields, req);
    if source == destination {
        req = req.metadata_directive(MetadataDirective::Replace);
    }
    req.send()
        .await
        .map_err(error::copy_failed(source, destination))?;

    Ok(())
}

/// Copy `source` to `destination`, then delete `source`.
///
/// A failed delete is reported as a failed move although the destination has been written.
pub(crate) async fn move_to(
    handle: &Handle,
    source: &str,
    destination: &str,
    options: WriteOptions,
) -> Result<(), Error> {
    if source == destination {
        return move_in_place(handle, source, options)
            .await
            .map_err(error::move_failed(source, destination));
    }

    copy(handle, source, destination, options)
        .await
        .map_err(error::move_failed(source, destination))?;

    if let Err(err) = delete::delete(handle, source).await {
        tracing::warn!(
            source,
            destination,
            "file was copied but the source could not be deleted"
        );
        return Err(error::move_failed(source, destination)(err));
    }

    Ok(())
}

/// Move a file onto its own location: the file is kept, but it must exist and `options` still
/// apply to it.
async fn move_in_place(
    handle: &Handle,
    location: &str,
    options: WriteOptions,
) -> Result<(), Error> {
    if !options.headers.is_empty() || !options.extra.is_empty() {
        return copy(handle, location, location, options).await;
    }

    match options.visibility {
        Some(visibility) => write::set_visibility(handle, location, visibility).await,
        None => metadata::get_stats(handle, location).await.map(|_| ()),
    }
}

#[cfg(test)]
mod test {
    use super::{copy, move_to};
    use crate::client::test_util::test_handle;
    use crate::error::{Error, ErrorKind};
    use crate::operation::convert::ALL_USERS_GROUP;
    use crate::types::{Visibility, WriteOptions};
    use aws_sdk_s3::operation::copy_object::CopyObjectOutput;
    use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
    use aws_sdk_s3::operation::get_object_acl::GetObjectAclOutput;
    use aws_sdk_s3::operation::head_object::HeadObjectOutput;
    use aws_sdk_s3::operation::put_object_acl::PutObjectAclOutput;
    use aws_sdk_s3::types::{
        Grant, Grantee, MetadataDirective, ObjectCannedAcl, Permission, Type,
    };
    use aws_smithy_mocks_experimental::{mock, Rule, RuleMode};
    use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
    use aws_smithy_types::body::SdkBody;
    use std::error::Error as _;
    use test_common::mock_client_with_stubbed_http_client;

    fn public_acl_rule() -> Rule {
        mock!(aws_sdk_s3::Client::get_object_acl)
            .match_requests(|r| r.key() == Some("a.txt"))
            .then_output(|| {
                let everybody = Grantee::builder()
                    .r#type(Type::Group)
                    .uri(ALL_USERS_GROUP)
                    .build()
                    .unwrap();
                GetObjectAclOutput::builder()
                    .grants(
                        Grant::builder()
                            .grantee(everybody)
                            .permission(Permission::Read)
                            .build(),
                    )
                    .build()
            })
    }

    fn status(code: u16) -> HttpResponse {
        HttpResponse::new(StatusCode::try_from(code).unwrap(), SdkBody::empty())
    }

    #[tokio::test]
    async fn test_copy_keeps_source_visibility() {
        let copy_object = mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(|r| {
                r.copy_source() == Some("test-bucket/a.txt")
                    && r.key() == Some("b.txt")
                    && r.acl() == Some(&ObjectCannedAcl::PublicRead)
                    && r.metadata_directive().is_none()
            })
            .then_output(|| CopyObjectOutput::builder().build());
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&public_acl_rule(), &copy_object]
        );

        copy(&test_handle(client), "a.txt", "b.txt", WriteOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_copy_with_explicit_visibility_skips_lookup() {
        let copy_object = mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(|r| {
                r.acl() == Some(&ObjectCannedAcl::Private)
                    && r.content_type() == Some("text/plain")
                    && r.metadata_directive() == Some(&MetadataDirective::Replace)
            })
            .then_output(|| CopyObjectOutput::builder().build());
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&copy_object]
        );

        let options = WriteOptions::builder()
            .visibility(Visibility::Private)
            .content_type("text/plain")
            .build();
        copy(&test_handle(client), "a.txt", "b.txt", options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_copy_fails_when_visibility_lookup_fails() {
        let acl = mock!(aws_sdk_s3::Client::get_object_acl).then_http_response(|| status(404));
        let client =
            mock_client_with_stubbed_http_client!(aws_sdk_s3, RuleMode::Sequential, &[&acl]);

        let err = copy(&test_handle(client), "a.txt", "b.txt", WriteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::CopyFailed, err.kind());
        assert_eq!(Some("a.txt"), err.location());
        assert_eq!(Some("b.txt"), err.destination());
        assert!(err.is_not_found());

        let cause = err
            .source()
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("metadata error is kept as the cause");
        assert_eq!(&ErrorKind::MetadataFailed, cause.kind());
    }

    #[tokio::test]
    async fn test_move() {
        let copy_object = mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(|r| r.key() == Some("b.txt"))
            .then_output(|| CopyObjectOutput::builder().build());
        let delete_object = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| r.key() == Some("a.txt"))
            .then_output(|| DeleteObjectOutput::builder().build());
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&public_acl_rule(), &copy_object, &delete_object]
        );

        move_to(&test_handle(client), "a.txt", "b.txt", WriteOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_move_reports_failed_delete() {
        let copy_object = mock!(aws_sdk_s3::Client::copy_object)
            .then_output(|| CopyObjectOutput::builder().build());
        let delete_object =
            mock!(aws_sdk_s3::Client::delete_object).then_http_response(|| status(403));
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&public_acl_rule(), &copy_object, &delete_object]
        );

        let err = move_to(&test_handle(client), "a.txt", "b.txt", WriteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::MoveFailed, err.kind());

        let cause = err
            .source()
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("delete error is kept as the cause");
        assert_eq!(&ErrorKind::DeleteFailed, cause.kind());
    }

    #[tokio::test]
    async fn test_move_reports_failed_copy() {
        let copy_object =
            mock!(aws_sdk_s3::Client::copy_object).then_http_response(|| status(500));
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&public_acl_rule(), &copy_object]
        );

        let err = move_to(&test_handle(client), "a.txt", "b.txt", WriteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::MoveFailed, err.kind());

        let cause = err
            .source()
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("copy error is kept as the cause");
        assert_eq!(&ErrorKind::CopyFailed, cause.kind());
    }

    #[tokio::test]
    async fn test_move_onto_itself_keeps_file() {
        let head_object = mock!(aws_sdk_s3::Client::head_object)
            .match_requests(|r| r.key() == Some("a.txt"))
            .then_output(|| HeadObjectOutput::builder().content_length(1).build());
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&head_object]
        );

        move_to(&test_handle(client), "a.txt", "a.txt", WriteOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_move_missing_file_onto_itself() {
        let head_object = mock!(aws_sdk_s3::Client::head_object).then_http_response(|| status(404));
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&head_object]
        );

        let err = move_to(
            &test_handle(client),
            "missing.txt",
            "missing.txt",
            WriteOptions::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(&ErrorKind::MoveFailed, err.kind());
        assert_eq!(Some("missing.txt"), err.location());
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_move_onto_itself_applies_visibility() {
        let put_acl = mock!(aws_sdk_s3::Client::put_object_acl)
            .match_requests(|r| {
                r.key() == Some("a.txt") && r.acl() == Some(&ObjectCannedAcl::PublicRead)
            })
            .then_output(|| PutObjectAclOutput::builder().build());
        let client =
            mock_client_with_stubbed_http_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_acl]);

        let options = WriteOptions::builder()
            .visibility(Visibility::Public)
            .build();
        move_to(&test_handle(client), "a.txt", "a.txt", options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_move_onto_itself_replaces_headers() {
        let copy_object = mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(|r| {
                r.copy_source() == Some("test-bucket/a.txt")
                    && r.key() == Some("a.txt")
                    && r.acl() == Some(&ObjectCannedAcl::Private)
                    && r.content_type() == Some("text/markdown")
                    && r.metadata_directive() == Some(&MetadataDirective::Replace)
            })
            .then_output(|| CopyObjectOutput::builder().build());
        let client = mock_client_with_stubbed_http_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&copy_object]
        );

        let options = WriteOptions::builder()
            .visibility(Visibility::Private)
            .content_type("text/markdown")
            .build();
        move_to(&test_handle(client), "a.txt", "a.txt", options)
            .await
            .unwrap();
    }
}

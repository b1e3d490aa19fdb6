/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use aws_sdk_s3::operation::{
    copy_object::builders::CopyObjectFluentBuilder, get_object::builders::GetObjectFluentBuilder,
    put_object::builders::PutObjectFluentBuilder,
};
use aws_sdk_s3::types::{
    Grant, MetadataDirective, ObjectCannedAcl, Permission, ServerSideEncryption, StorageClass,
    TaggingDirective,
};

use crate::types::{ContentHeaders, Visibility, WriteOptions};

/// Grantee URI of the predefined group of all users, authenticated or not
pub(crate) const ALL_USERS_GROUP: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// The canned ACL a file with `visibility` is written with
pub(crate) fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
    match visibility {
        Visibility::Public => ObjectCannedAcl::PublicRead,
        Visibility::Private => ObjectCannedAcl::Private,
    }
}

/// A file is public when all users are granted read access. Any other set of grants is private.
pub(crate) fn visibility_from_grants(grants: &[Grant]) -> Visibility {
    let public = grants.iter().any(|grant| {
        grant.grantee().and_then(|g| g.uri()) == Some(ALL_USERS_GROUP)
            && grant.permission() == Some(&Permission::Read)
    });

    if public {
        Visibility::Public
    } else {
        Visibility::Private
    }
}

/// `CopySource` value for `key` in `bucket`, with each key segment percent-encoded
pub(crate) fn copy_source(bucket: &str, key: &str) -> String {
    let key = key
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");
    format!("{bucket}/{key}")
}

/// Request fields of a write derived from [`WriteOptions`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WriteFields {
    pub(crate) acl: ObjectCannedAcl,
    pub(crate) headers: ContentHeaders,
    pub(crate) storage_class: Option<StorageClass>,
    pub(crate) server_side_encryption: Option<ServerSideEncryption>,
    pub(crate) ssekms_key_id: Option<String>,
    pub(crate) tagging: Option<String>,
    pub(crate) website_redirect_location: Option<String>,
    pub(crate) metadata: Option<HashMap<String, String>>,
}

impl WriteFields {
    /// Split `options` into dedicated request fields. Extra keys that are not a known request
    /// field become user-defined metadata.
    pub(crate) fn new(options: &WriteOptions, default_visibility: Visibility) -> Self {
        let mut fields = WriteFields {
            acl: canned_acl(options.visibility.unwrap_or(default_visibility)),
            headers: options.headers.clone(),
            storage_class: None,
            server_side_encryption: None,
            ssekms_key_id: None,
            tagging: None,
            website_redirect_location: None,
            metadata: None,
        };

        for (key, value) in &options.extra {
            match key.as_str() {
                "StorageClass" => fields.storage_class = Some(value.as_str().into()),
                "ServerSideEncryption" => {
                    fields.server_side_encryption = Some(value.as_str().into())
                }
                "SSEKMSKeyId" => fields.ssekms_key_id = Some(value.clone()),
                "Tagging" => fields.tagging = Some(value.clone()),
                "WebsiteRedirectLocation" => fields.website_redirect_location = Some(value.clone()),
                _ => {
                    fields
                        .metadata
                        .get_or_insert_with(HashMap::new)
                        .insert(key.clone(), value.clone());
                }
            }
        }

        fields
    }

    /// Whether the stored object metadata (headers or user metadata) is being set
    fn replaces_metadata(&self) -> bool {
        !self.headers.is_empty() || self.metadata.is_some()
    }
}

/// Copy fields from `WriteFields` to `PutObjectFluentBuilder`
pub(crate) fn copy_fields_to_put_object_request(
    fields: &WriteFields,
    put_object_builder: PutObjectFluentBuilder,
) -> PutObjectFluentBuilder {
    let headers = &fields.headers;
    put_object_builder
        .acl(fields.acl.clone())
        .set_content_type(headers.content_type.clone())
        .set_content_disposition(headers.content_disposition.clone())
        .set_content_encoding(headers.content_encoding.clone())
        .set_content_language(headers.content_language.clone())
        .set_cache_control(headers.cache_control.clone())
        .set_storage_class(fields.storage_class.clone())
        .set_server_side_encryption(fields.server_side_encryption.clone())
        .set_ssekms_key_id(fields.ssekms_key_id.clone())
        .set_tagging(fields.tagging.clone())
        .set_website_redirect_location(fields.website_redirect_location.clone())
        .set_metadata(fields.metadata.clone())
}

/// Copy fields from `WriteFields` to `CopyObjectFluentBuilder`
///
/// S3 ignores headers and metadata on a copy unless the metadata directive is `REPLACE`, and
/// tags unless the tagging directive is `REPLACE`.
pub(crate) fn copy_fields_to_copy_object_request(
    fields: &WriteFields,
    copy_object_builder: CopyObjectFluentBuilder,
) -> CopyObjectFluentBuilder {
    let headers = &fields.headers;
    let mut copy_object_builder = copy_object_builder
        .acl(fields.acl.clone())
        .set_content_type(headers.content_type.clone())
        .set_content_disposition(headers.content_disposition.clone())
        .set_content_encoding(headers.content_encoding.clone())
        .set_content_language(headers.content_language.clone())
        .set_cache_control(headers.cache_control.clone())
        .set_storage_class(fields.storage_class.clone())
        .set_server_side_encryption(fields.server_side_encryption.clone())
        .set_ssekms_key_id(fields.ssekms_key_id.clone())
        .set_tagging(fields.tagging.clone())
        .set_website_redirect_location(fields.website_redirect_location.clone())
        .set_metadata(fields.metadata.clone());

    if fields.replaces_metadata() {
        copy_object_builder = copy_object_builder.metadata_directive(MetadataDirective::Replace);
    }
    if fields.tagging.is_some() {
        copy_object_builder = copy_object_builder.tagging_directive(TaggingDirective::Replace);
    }

    copy_object_builder
}

/// Copy `ContentHeaders` to the response overrides of a `GetObjectFluentBuilder`
pub(crate) fn copy_headers_to_get_object_request(
    headers: &ContentHeaders,
    get_object_builder: GetObjectFluentBuilder,
) -> GetObjectFluentBuilder {
    get_object_builder
        .set_response_content_type(headers.content_type.clone())
        .set_response_content_disposition(headers.content_disposition.clone())
        .set_response_content_encoding(headers.content_encoding.clone())
        .set_response_content_language(headers.content_language.clone())
        .set_response_cache_control(headers.cache_control.clone())
}

#[cfg(test)]
mod test {
    use super::{copy_source, visibility_from_grants, WriteFields, ALL_USERS_GROUP};
    use crate::types::{Visibility, WriteOptions};
    use aws_sdk_s3::types::{
        Grant, Grantee, ObjectCannedAcl, Permission, ServerSideEncryption, StorageClass, Type,
    };

    fn group_grant(uri: &str, permission: Permission) -> Grant {
        Grant::builder()
            .grantee(
                Grantee::builder()
                    .r#type(Type::Group)
                    .uri(uri)
                    .build()
                    .unwrap(),
            )
            .permission(permission)
            .build()
    }

    #[test]
    fn test_default_visibility_applies() {
        let fields = WriteFields::new(&WriteOptions::default(), Visibility::Private);
        assert_eq!(ObjectCannedAcl::Private, fields.acl);

        let fields = WriteFields::new(&WriteOptions::default(), Visibility::Public);
        assert_eq!(ObjectCannedAcl::PublicRead, fields.acl);

        let options = WriteOptions::builder()
            .visibility(Visibility::Private)
            .build();
        let fields = WriteFields::new(&options, Visibility::Public);
        assert_eq!(ObjectCannedAcl::Private, fields.acl);
    }

    #[test]
    fn test_extra_fields_split() {
        let options = WriteOptions::builder()
            .content_type("text/csv")
            .extra("StorageClass", "GLACIER")
            .extra("ServerSideEncryption", "aws:kms")
            .extra("SSEKMSKeyId", "key-id")
            .extra("Tagging", "team=storage")
            .extra("origin", "upload-form")
            .build();

        let fields = WriteFields::new(&options, Visibility::Private);
        assert_eq!(Some("text/csv"), fields.headers.content_type());
        assert_eq!(Some(StorageClass::Glacier), fields.storage_class);
        assert_eq!(
            Some(ServerSideEncryption::AwsKms),
            fields.server_side_encryption
        );
        assert_eq!(Some("key-id"), fields.ssekms_key_id.as_deref());
        assert_eq!(Some("team=storage"), fields.tagging.as_deref());
        assert_eq!(None, fields.website_redirect_location);

        let metadata = fields.metadata.clone().expect("unknown keys become metadata");
        assert_eq!(1, metadata.len());
        assert_eq!("upload-form", metadata["origin"]);
        assert!(fields.replaces_metadata());
    }

    #[test]
    fn test_no_metadata_replacement_without_headers() {
        let fields = WriteFields::new(&WriteOptions::default(), Visibility::Private);
        assert!(!fields.replaces_metadata());
        assert_eq!(None, fields.metadata);
    }

    #[test]
    fn test_visibility_from_grants() {
        assert_eq!(Visibility::Private, visibility_from_grants(&[]));
        assert_eq!(
            Visibility::Public,
            visibility_from_grants(&[group_grant(ALL_USERS_GROUP, Permission::Read)])
        );
        // write access for everybody is not read access
        assert_eq!(
            Visibility::Private,
            visibility_from_grants(&[group_grant(ALL_USERS_GROUP, Permission::Write)])
        );
        assert_eq!(
            Visibility::Private,
            visibility_from_grants(&[group_grant(
                "http://acs.amazonaws.com/groups/global/AuthenticatedUsers",
                Permission::Read
            )])
        );
    }

    #[test]
    fn test_copy_source_encoding() {
        assert_eq!("docs/a/b.txt", copy_source("docs", "a/b.txt"));
        assert_eq!(
            "docs/reports/q1%20summary%2B.pdf",
            copy_source("docs", "reports/q1 summary+.pdf")
        );
    }
}

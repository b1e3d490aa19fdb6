/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use aws_sdk_s3::operation::{
    copy_object::{CopyObjectError, CopyObjectOutput},
    delete_object::DeleteObjectOutput,
    get_object::{GetObjectError, GetObjectOutput},
    get_object_acl::{GetObjectAclError, GetObjectAclOutput},
    head_object::{HeadObjectError, HeadObjectOutput},
    put_object::PutObjectOutput,
    put_object_acl::{PutObjectAclError, PutObjectAclOutput},
};
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::types::error::{NoSuchKey, NotFound};
use aws_sdk_s3::types::{Grant, Grantee, MetadataDirective, ObjectCannedAcl, Permission, Type};
use aws_smithy_mocks_experimental::{mock, Rule};
use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
use aws_smithy_types::body::SdkBody;
use aws_smithy_types::error::ErrorMetadata;
use bytes::{BufMut, Bytes, BytesMut};

pub use aws_smithy_http_client;
pub use aws_smithy_mocks_experimental;
pub use http;

/// Grantee URI of the predefined group of all users
pub const ALL_USERS_GROUP: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Build an S3 client from mock rules whose HTTP client answers every request with an empty
/// `200`, so no request ever leaves the process.
#[macro_export]
macro_rules! mock_client_with_stubbed_http_client {
    ($aws_crate: ident, $rules: expr) => {
        $crate::mock_client_with_stubbed_http_client!(
            $aws_crate,
            $crate::aws_smithy_mocks_experimental::RuleMode::Sequential,
            $rules
        )
    };
    ($aws_crate: ident, $rule_mode: expr, $rules: expr) => {{
        let client =
            $crate::aws_smithy_mocks_experimental::mock_client!($aws_crate, $rule_mode, $rules);
        $aws_crate::Client::from_conf(
            client
                .config()
                .to_builder()
                .http_client(
                    $crate::aws_smithy_http_client::test_util::infallible_client_fn(|_req| {
                        $crate::http::Response::builder()
                            .status(200)
                            .body("")
                            .unwrap()
                    }),
                )
                .build(),
        )
    }};
}

/// drain/consume the body
pub async fn drain(
    mut body: ByteStream,
) -> Result<Bytes, aws_smithy_types::byte_stream::error::Error> {
    let mut data = BytesMut::new();
    while let Some(chunk) = body.next().await {
        data.put(chunk?);
    }
    Ok(data.freeze())
}

fn error_code(code: &str) -> ErrorMetadata {
    ErrorMetadata::builder().code(code).build()
}

fn no_such_key() -> NoSuchKey {
    NoSuchKey::builder().meta(error_code("NoSuchKey")).build()
}

/// An object stored in a [`MockBucket`]
#[derive(Debug, Clone)]
pub struct MockObject {
    pub contents: Bytes,
    pub public: bool,
    pub content_type: Option<String>,
    pub e_tag: String,
    pub last_modified: DateTime,
}

impl MockObject {
    fn new(contents: Bytes, acl: Option<&ObjectCannedAcl>, content_type: Option<&str>) -> Self {
        Self {
            e_tag: format!("\"{:x}\"", md5::compute(&contents)),
            contents,
            public: acl == Some(&ObjectCannedAcl::PublicRead),
            content_type: content_type.map(str::to_owned),
            last_modified: DateTime::from(SystemTime::now()),
        }
    }

    /// The access control grants S3 would report for this object
    pub fn grants(&self) -> Vec<Grant> {
        let owner = Grantee::builder()
            .r#type(Type::CanonicalUser)
            .id("owner")
            .build()
            .unwrap();
        let mut grants = vec![Grant::builder()
            .grantee(owner)
            .permission(Permission::FullControl)
            .build()];

        if self.public {
            let everybody = Grantee::builder()
                .r#type(Type::Group)
                .uri(ALL_USERS_GROUP)
                .build()
                .unwrap();
            grants.push(
                Grant::builder()
                    .grantee(everybody)
                    .permission(Permission::Read)
                    .build(),
            );
        }
        grants
    }
}

/// A stateful in-memory bucket.
///
/// The mock rules returned by [`MockBucket::rules`] record writes, copies, ACL changes and
/// deletes, so reads observe earlier writes. Use them with `RuleMode::MatchAny`.
///
/// NOTE: request bodies must be in memory (e.g. `ByteStream::from(Bytes)`), and requests must
/// not be sent concurrently.
#[derive(Debug, Clone)]
pub struct MockBucket {
    name: String,
    objects: Arc<Mutex<HashMap<String, MockObject>>>,
    failing_deletes: Arc<Mutex<HashSet<String>>>,
    // key of the request currently being answered
    pending: Arc<Mutex<Option<String>>>,
}

impl MockBucket {
    /// Create a new empty bucket
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Default::default(),
            failing_deletes: Default::default(),
            pending: Default::default(),
        }
    }

    /// Store an object directly, bypassing the mock rules
    pub fn insert(&self, key: impl Into<String>, contents: impl Into<Bytes>, public: bool) {
        let acl = if public {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        };
        let object = MockObject::new(contents.into(), Some(&acl), None);
        self.objects.lock().unwrap().insert(key.into(), object);
    }

    /// Return the stored object at `key`
    pub fn object(&self, key: &str) -> Option<MockObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Make `DeleteObject` requests for `key` fail with `403 Access Denied`
    pub fn fail_deletes_of(&self, key: impl Into<String>) {
        self.failing_deletes.lock().unwrap().insert(key.into());
    }

    fn contains(&self, key: Option<&str>) -> bool {
        key.is_some_and(|key| self.objects.lock().unwrap().contains_key(key))
    }

    /// Remember `key` as the object the next output is built from
    fn select(&self, key: Option<&str>) -> bool {
        if !self.contains(key) {
            return false;
        }
        *self.pending.lock().unwrap() = key.map(str::to_owned);
        true
    }

    fn selected(&self) -> MockObject {
        let key = self.pending.lock().unwrap().clone().expect("object selected");
        self.object(&key).expect("selected object exists")
    }

    /// Resolve a `CopySource` header value to a key of this bucket
    fn source_key(&self, copy_source: Option<&str>) -> Option<String> {
        let prefix = format!("{}/", self.name);
        let key = copy_source?.trim_start_matches('/').strip_prefix(&prefix)?;
        urlencoding::decode(key).ok().map(|key| key.into_owned())
    }

    /// Return the mock rules representing this bucket
    pub fn rules(&self) -> Vec<Rule> {
        vec![
            self.put_object_rule(),
            self.get_object_rule(),
            mock!(aws_sdk_s3::Client::get_object)
                .then_error(|| GetObjectError::NoSuchKey(no_such_key())),
            self.head_object_rule(),
            mock!(aws_sdk_s3::Client::head_object)
                .then_error(|| HeadObjectError::NotFound(
                    NotFound::builder().meta(error_code("NotFound")).build(),
                )),
            self.get_object_acl_rule(),
            mock!(aws_sdk_s3::Client::get_object_acl)
                .then_error(|| GetObjectAclError::NoSuchKey(no_such_key())),
            self.put_object_acl_rule(),
            mock!(aws_sdk_s3::Client::put_object_acl)
                .then_error(|| PutObjectAclError::NoSuchKey(no_such_key())),
            self.copy_object_rule(),
            mock!(aws_sdk_s3::Client::copy_object).then_error(|| {
                CopyObjectError::generic(error_code("NoSuchKey"))
            }),
            self.failing_delete_rule(),
            self.delete_object_rule(),
        ]
    }

    fn put_object_rule(&self) -> Rule {
        let bucket = self.clone();
        mock!(aws_sdk_s3::Client::put_object)
            .match_requests(move |r| {
                let contents = r
                    .body()
                    .bytes()
                    .expect("mock bucket only supports in-memory bodies");
                let object =
                    MockObject::new(Bytes::copy_from_slice(contents), r.acl(), r.content_type());
                let key = r.key().expect("key set").to_owned();
                bucket.objects.lock().unwrap().insert(key, object);
                true
            })
            .then_output(|| PutObjectOutput::builder().build())
    }

    fn get_object_rule(&self) -> Rule {
        let (matcher, output) = (self.clone(), self.clone());
        mock!(aws_sdk_s3::Client::get_object)
            .match_requests(move |r| matcher.select(r.key()))
            .then_output(move || {
                let object = output.selected();
                GetObjectOutput::builder()
                    .content_length(object.contents.len() as i64)
                    .e_tag(object.e_tag.clone())
                    .set_content_type(object.content_type.clone())
                    .body(ByteStream::from(object.contents.clone()))
                    .build()
            })
    }

    fn head_object_rule(&self) -> Rule {
        let (matcher, output) = (self.clone(), self.clone());
        mock!(aws_sdk_s3::Client::head_object)
            .match_requests(move |r| matcher.select(r.key()))
            .then_output(move || {
                let object = output.selected();
                HeadObjectOutput::builder()
                    .content_length(object.contents.len() as i64)
                    .e_tag(object.e_tag.clone())
                    .set_content_type(object.content_type.clone())
                    .last_modified(object.last_modified)
                    .build()
            })
    }

    fn get_object_acl_rule(&self) -> Rule {
        let (matcher, output) = (self.clone(), self.clone());
        mock!(aws_sdk_s3::Client::get_object_acl)
            .match_requests(move |r| matcher.select(r.key()))
            .then_output(move || {
                GetObjectAclOutput::builder()
                    .set_grants(Some(output.selected().grants()))
                    .build()
            })
    }

    fn put_object_acl_rule(&self) -> Rule {
        let bucket = self.clone();
        mock!(aws_sdk_s3::Client::put_object_acl)
            .match_requests(move |r| {
                let key = r.key().unwrap_or_default();
                match bucket.objects.lock().unwrap().get_mut(key) {
                    Some(object) => {
                        object.public = r.acl() == Some(&ObjectCannedAcl::PublicRead);
                        true
                    }
                    None => false,
                }
            })
            .then_output(|| PutObjectAclOutput::builder().build())
    }

    fn copy_object_rule(&self) -> Rule {
        let bucket = self.clone();
        mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(move |r| {
                let Some(source) = bucket
                    .source_key(r.copy_source())
                    .and_then(|key| bucket.object(&key))
                else {
                    return false;
                };

                let content_type = match r.metadata_directive() {
                    Some(MetadataDirective::Replace) => r.content_type(),
                    _ => source.content_type.as_deref(),
                };
                let object = MockObject::new(source.contents.clone(), r.acl(), content_type);
                let key = r.key().expect("key set").to_owned();
                bucket.objects.lock().unwrap().insert(key, object);
                true
            })
            .then_output(|| CopyObjectOutput::builder().build())
    }

    fn failing_delete_rule(&self) -> Rule {
        let bucket = self.clone();
        mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(move |r| {
                r.key()
                    .is_some_and(|key| bucket.failing_deletes.lock().unwrap().contains(key))
            })
            .then_http_response(|| {
                HttpResponse::new(StatusCode::try_from(403).unwrap(), SdkBody::empty())
            })
    }

    fn delete_object_rule(&self) -> Rule {
        let bucket = self.clone();
        mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(move |r| {
                if let Some(key) = r.key() {
                    bucket.objects.lock().unwrap().remove(key);
                }
                true
            })
            .then_output(|| DeleteObjectOutput::builder().build())
    }
}

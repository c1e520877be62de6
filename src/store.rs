//! The object-store seam.
//!
//! Upload and delete go through one [`ObjectStore`] trait so the provider
//! logic is independent of how bytes reach the remote store (single-shot put
//! vs multipart) and testable against an in-memory fake.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::types::ObjectCannedAcl;
use serde::Serialize;

use crate::error::StorageResult;
use crate::file::FilePayload;

/// A put request: bucket and key are always computed by the provider and
/// cannot be overridden.
#[derive(Debug)]
pub struct PutRequest {
    pub bucket: String,
    pub key: String,
    pub payload: FilePayload,
    /// Content type from the file record; an override wins over it.
    pub content_type: String,
    pub overrides: PutOverrides,
}

/// Caller-supplied request fields merged into a put. Set fields win over the
/// computed defaults.
#[derive(Debug, Clone, Default)]
pub struct PutOverrides {
    pub content_type: Option<String>,
    pub acl: Option<ObjectCannedAcl>,
    pub cache_control: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    /// User-defined object metadata (`x-amz-meta-*`).
    pub metadata: Option<HashMap<String, String>>,
}

/// What the remote store reported for a completed put.
///
/// The single-shot put path reports neither key nor location. The multipart
/// path reports both, and the key may carry a `"<bucket>/"` prefix artifact;
/// URL derivation strips it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PutOutcome {
    pub key: Option<String>,
    pub location: Option<String>,
}

/// A delete request for bucket + computed key.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub bucket: String,
    pub key: String,
    pub overrides: DeleteOverrides,
}

/// Caller-supplied request fields merged into a delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteOverrides {
    pub version_id: Option<String>,
    pub expected_bucket_owner: Option<String>,
}

/// The remote store's deletion response, returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub key: String,
    pub delete_marker: Option<bool>,
    pub version_id: Option<String>,
}

/// Low-level store operations, implemented by the S3 backend and by test
/// fakes. One remote call per invocation, no retries.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a payload under bucket + key.
    async fn put_object(&self, request: PutRequest) -> StorageResult<PutOutcome>;

    /// Remove the object at bucket + key.
    async fn delete_object(&self, request: DeleteRequest) -> StorageResult<DeleteOutcome>;
}

//! S3-backed object store for Cloudflare R2.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials as SdkCredentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::file::FilePayload;
use crate::provider::ProviderConfig;
use crate::store::{DeleteOutcome, DeleteRequest, ObjectStore, PutOutcome, PutOverrides, PutRequest};

/// Multipart part size, and the cutoff between single-shot and multipart
/// buffer uploads (5 MiB, the S3 minimum part size).
pub const PART_SIZE: usize = 5 * 1024 * 1024;

/// R2 implementation of [`ObjectStore`] on top of aws-sdk-s3.
///
/// Buffers at or below [`PART_SIZE`] go out as one `PutObject`; larger
/// buffers and all streams go through the multipart API.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build the client handle. Never fails and does not validate
    /// reachability; the first operation surfaces connection problems.
    pub fn new(config: &ProviderConfig) -> Self {
        let region = config.region.clone().unwrap_or_else(|| "auto".to_string());
        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .force_path_style(true);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let Some(credentials) = &config.credentials {
            builder = builder.credentials_provider(SdkCredentials::new(
                &credentials.access_key_id,
                &credentials.secret_access_key,
                credentials.session_token.clone(),
                None,
                "r2",
            ));
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    async fn put_single(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        overrides: &PutOverrides,
        data: Vec<u8>,
    ) -> StorageResult<PutOutcome> {
        debug!("Uploading {} bytes to {}", data.len(), key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(overrides.content_type.as_deref().unwrap_or(content_type))
            .set_acl(overrides.acl.clone())
            .set_cache_control(overrides.cache_control.clone())
            .set_content_disposition(overrides.content_disposition.clone())
            .set_content_encoding(overrides.content_encoding.clone())
            .set_metadata(overrides.metadata.clone())
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        // The plain put response carries neither key nor location.
        Ok(PutOutcome::default())
    }

    async fn put_multipart<R>(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        overrides: &PutOverrides,
        mut reader: R,
    ) -> StorageResult<PutOutcome>
    where
        R: AsyncRead + Unpin,
    {
        debug!("Starting multipart upload to {}", key);

        let created = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .content_type(overrides.content_type.as_deref().unwrap_or(content_type))
            .set_acl(overrides.acl.clone())
            .set_cache_control(overrides.cache_control.clone())
            .set_content_disposition(overrides.content_disposition.clone())
            .set_content_encoding(overrides.content_encoding.clone())
            .set_metadata(overrides.metadata.clone())
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| {
                StorageError::upload_failed("multipart upload created without an upload id")
            })?
            .to_string();

        let result = self
            .upload_parts_and_complete(bucket, key, &upload_id, &mut reader)
            .await;
        if result.is_err() {
            self.abort_upload(bucket, key, &upload_id).await;
        }
        result
    }

    async fn upload_parts_and_complete<R>(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        reader: &mut R,
    ) -> StorageResult<PutOutcome>
    where
        R: AsyncRead + Unpin,
    {
        let mut parts = Vec::new();
        let mut part_number: i32 = 1;

        loop {
            let mut chunk = Vec::with_capacity(PART_SIZE);
            let read = (&mut *reader)
                .take(PART_SIZE as u64)
                .read_to_end(&mut chunk)
                .await?;
            if read == 0 && part_number > 1 {
                break;
            }

            let part = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await
                .map_err(|e| StorageError::upload_failed(e.to_string()))?;

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(part.e_tag)
                    .part_number(part_number)
                    .build(),
            );

            if read < PART_SIZE {
                break;
            }
            part_number += 1;
        }

        let completed = self
            .client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(PutOutcome {
            key: completed.key().map(str::to_string),
            location: completed.location().map(str::to_string),
        })
    }

    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) {
        if let Err(err) = self
            .client
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
        {
            warn!("Failed to abort multipart upload for {}: {}", key, err);
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, request: PutRequest) -> StorageResult<PutOutcome> {
        let PutRequest {
            bucket,
            key,
            payload,
            content_type,
            overrides,
        } = request;

        match payload {
            FilePayload::Buffer(data) if data.len() <= PART_SIZE => {
                self.put_single(&bucket, &key, &content_type, &overrides, data)
                    .await
            }
            FilePayload::Buffer(data) => {
                self.put_multipart(
                    &bucket,
                    &key,
                    &content_type,
                    &overrides,
                    std::io::Cursor::new(data),
                )
                .await
            }
            FilePayload::Stream(stream) => {
                self.put_multipart(
                    &bucket,
                    &key,
                    &content_type,
                    &overrides,
                    Box::pin(stream.into_async_read()),
                )
                .await
            }
        }
    }

    async fn delete_object(&self, request: DeleteRequest) -> StorageResult<DeleteOutcome> {
        debug!("Deleting {}", request.key);

        let output = self
            .client
            .delete_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_version_id(request.overrides.version_id.clone())
            .set_expected_bucket_owner(request.overrides.expected_bucket_owner.clone())
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        Ok(DeleteOutcome {
            key: request.key,
            delete_marker: output.delete_marker(),
            version_id: output.version_id().map(str::to_string),
        })
    }
}

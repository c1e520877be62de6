//! Live R2 provider tests.
//!
//! These run against a real bucket and are ignored by default. Set
//! R2_ENDPOINT_URL, R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY, R2_BUCKET_NAME
//! and optionally R2_PUBLIC_ACCESS_URL (e.g. in a .env file) to run them.

use r2_storage_provider::{
    Credentials, FileDescriptor, FilePayload, ProviderConfig, R2Provider,
};

fn provider_from_env() -> R2Provider {
    dotenvy::dotenv().ok();

    let config = ProviderConfig {
        credentials: Some(Credentials {
            access_key_id: std::env::var("R2_ACCESS_KEY_ID").expect("R2_ACCESS_KEY_ID not set"),
            secret_access_key: std::env::var("R2_SECRET_ACCESS_KEY")
                .expect("R2_SECRET_ACCESS_KEY not set"),
            session_token: None,
        }),
        endpoint: Some(std::env::var("R2_ENDPOINT_URL").expect("R2_ENDPOINT_URL not set")),
        bucket: std::env::var("R2_BUCKET_NAME").expect("R2_BUCKET_NAME not set"),
        region: std::env::var("R2_REGION").ok(),
        public_access_url: std::env::var("R2_PUBLIC_ACCESS_URL").ok(),
        pool: true,
    };

    R2Provider::new(config)
}

/// Upload a small buffer, then delete it.
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_upload_and_delete_buffer() {
    let provider = provider_from_env();

    let file = FileDescriptor {
        path: Some("integration-tests".to_string()),
        ext: Some(".json".to_string()),
        ..FileDescriptor::new(
            "integration_test",
            "integration-test-buffer",
            "application/json",
            2,
            FilePayload::Buffer(b"{}".to_vec()),
        )
    };

    let uploaded = provider.upload(file, None).await.expect("Failed to upload file");
    let url = uploaded.url.as_deref().expect("Upload derived no URL");
    println!("Uploaded to {}", url);
    assert!(url.ends_with("integration-tests/integration-test-buffer.json"));

    let outcome = provider
        .delete(&uploaded, None)
        .await
        .expect("Failed to delete file");
    assert_eq!(outcome.key, "integration-tests/integration-test-buffer.json");
}

/// Upload from a file-backed stream (exercises the multipart path).
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_upload_stream_from_file() {
    use std::io::Write;

    use aws_sdk_s3::primitives::ByteStream;
    use tempfile::NamedTempFile;

    let provider = provider_from_env();

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(b"Integration test content")
        .expect("Failed to write to temp file");

    let stream = ByteStream::from_path(temp_file.path())
        .await
        .expect("Failed to open stream");

    let file = FileDescriptor {
        path: Some("integration-tests".to_string()),
        ext: Some(".txt".to_string()),
        ..FileDescriptor::new(
            "integration_test_stream",
            "integration-test-stream",
            "text/plain",
            24,
            FilePayload::Stream(stream),
        )
    };

    let uploaded = provider
        .upload_stream(file, None)
        .await
        .expect("Failed to upload stream");
    println!("Uploaded to {}", uploaded.url.as_deref().unwrap_or("<none>"));

    provider
        .delete(&uploaded, None)
        .await
        .expect("Failed to delete file");
}

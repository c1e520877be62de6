//! The bound provider instance: configuration plus upload/delete operations.

use std::sync::Arc;

use tracing::{debug, info};

use crate::client::S3ObjectStore;
use crate::error::{StorageError, StorageResult};
use crate::file::FileDescriptor;
use crate::key::object_key;
use crate::store::{DeleteOutcome, DeleteOverrides, DeleteRequest, ObjectStore, PutOutcome, PutOverrides, PutRequest};

/// Location value R2 reports through the SDK's multipart path when it has no
/// direct URL for the object.
const UNKNOWN_LOCATION: &str = "auto";

/// Static credentials for the object store.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Provider configuration, captured once at initialization and shared
/// read-only by every operation.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Credentials for the store. When absent the SDK's default provider
    /// chain applies.
    pub credentials: Option<Credentials>,
    /// S3 API endpoint override (the account's R2 endpoint).
    pub endpoint: Option<String>,
    /// Target bucket.
    pub bucket: String,
    /// Region; R2 uses `"auto"`, which is also the default.
    pub region: Option<String>,
    /// Base URL public file URLs are built from. Without it, uploads can only
    /// derive a URL when the store reports a concrete location.
    pub public_access_url: Option<String>,
    /// Pool key layout: the path is used once in the key prefix instead of
    /// the historical doubled form.
    pub pool: bool,
}

/// Sink for non-fatal provider diagnostics.
///
/// Injected at initialization so the provider has no process-wide side
/// channel; the default emits through `tracing`.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default [`Diagnostics`] sink, logging at warn level.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

const MISSING_PUBLIC_URL_WARNING: &str = "public_access_url is not configured; files larger than \
     5 MiB upload through the multipart path, which reports no usable location, so their public \
     URL cannot be derived";

/// A bound provider instance for one bucket.
///
/// Cheap to clone and safe for concurrent calls; each operation issues
/// exactly one remote call and holds no state across calls. Concurrent
/// uploads to the same key are not coordinated, the last write wins.
#[derive(Clone)]
pub struct R2Provider {
    config: Arc<ProviderConfig>,
    store: Arc<dyn ObjectStore>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl R2Provider {
    /// Initialize against R2 with the default S3 store and diagnostics.
    /// Never fails; a missing `public_access_url` only emits a warning.
    pub fn new(config: ProviderConfig) -> Self {
        let store = Arc::new(S3ObjectStore::new(&config));
        Self::with_store(config, store)
    }

    /// Initialize with a custom [`ObjectStore`] implementation.
    pub fn with_store(config: ProviderConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self::with_diagnostics(config, store, Arc::new(TracingDiagnostics))
    }

    /// Initialize with a custom store and diagnostics sink.
    pub fn with_diagnostics(
        config: ProviderConfig,
        store: Arc<dyn ObjectStore>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        if config.public_access_url.is_none() {
            diagnostics.warn(MISSING_PUBLIC_URL_WARNING);
        }
        Self {
            config: Arc::new(config),
            store,
            diagnostics,
        }
    }

    /// Upload a file under its computed key and derive its public URL.
    ///
    /// Consumes the descriptor and returns it with `url` filled and the
    /// payload spent; it is only updated after the remote call succeeds.
    /// Overrides win over computed request defaults, except bucket and key.
    pub async fn upload(
        &self,
        mut file: FileDescriptor,
        overrides: Option<PutOverrides>,
    ) -> StorageResult<FileDescriptor> {
        let object_key = object_key(&file, self.config.pool);
        let payload = file.payload.take().ok_or_else(|| {
            StorageError::upload_failed(format!("file \"{}\" has no payload", file.hash))
        })?;

        debug!("Uploading file with key {}", object_key.key);

        let outcome = self
            .store
            .put_object(PutRequest {
                bucket: self.config.bucket.clone(),
                key: object_key.key.clone(),
                payload,
                content_type: file.mime.clone(),
                overrides: overrides.unwrap_or_default(),
            })
            .await?;

        let url = self.derive_url(&object_key.key, &outcome)?;
        info!("Uploaded {} to {}", object_key.key, url);

        file.url = Some(url);
        Ok(file)
    }

    /// Alias of [`upload`](Self::upload); both stream- and buffer-backed
    /// payloads go through the same operation. Kept for callers that
    /// distinguish the two entry points.
    pub async fn upload_stream(
        &self,
        file: FileDescriptor,
        overrides: Option<PutOverrides>,
    ) -> StorageResult<FileDescriptor> {
        self.upload(file, overrides).await
    }

    /// Delete the object at the file's computed key and return the store's
    /// response verbatim.
    pub async fn delete(
        &self,
        file: &FileDescriptor,
        overrides: Option<DeleteOverrides>,
    ) -> StorageResult<DeleteOutcome> {
        let object_key = object_key(file, self.config.pool);
        debug!("Deleting file with key {}", object_key.key);

        self.store
            .delete_object(DeleteRequest {
                bucket: self.config.bucket.clone(),
                key: object_key.key,
                overrides: overrides.unwrap_or_default(),
            })
            .await
    }

    /// Access the diagnostics sink (mainly for wrappers layering their own
    /// reporting on top).
    pub fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    fn derive_url(&self, computed_key: &str, outcome: &PutOutcome) -> StorageResult<String> {
        if let Some(base) = &self.config.public_access_url {
            let key = effective_key(
                outcome.key.as_deref().unwrap_or(computed_key),
                &self.config.bucket,
            );
            return Ok(format!("{}/{}", base.trim_end_matches('/'), key));
        }

        match outcome.location.as_deref() {
            Some(location) if location != UNKNOWN_LOCATION => Ok(location.to_string()),
            _ => Err(StorageError::config_error(
                "the object store returned no usable file location and public_access_url is not \
                 set; configure public_access_url to build public file URLs",
            )),
        }
    }
}

/// Strip a `"<bucket>/"` prefix from a store-reported key, at most once.
/// Guards against the multipart path reporting bucket-qualified keys.
fn effective_key<'a>(key: &'a str, bucket: &str) -> &'a str {
    if bucket.is_empty() {
        return key;
    }
    match key.strip_prefix(bucket) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(key),
        None => key,
    }
}

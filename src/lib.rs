//! Cloudflare R2 storage provider for media upload pipelines.
//!
//! This crate provides:
//! - Object key computation from file records (pool and default layouts)
//! - Buffer and stream uploads to R2 (single-shot or multipart by size)
//! - Public URL derivation from a configured base URL or the store's
//!   reported location
//! - Object deletion
//!
//! The remote side is abstracted behind the [`ObjectStore`] trait; the
//! default backend is [`S3ObjectStore`] on aws-sdk-s3.

pub mod client;
pub mod error;
pub mod file;
pub mod key;
pub mod provider;
pub mod store;

pub use client::S3ObjectStore;
pub use error::{StorageError, StorageResult};
pub use file::{FileDescriptor, FilePayload};
pub use key::{object_key, ObjectKey};
pub use provider::{Credentials, Diagnostics, ProviderConfig, R2Provider, TracingDiagnostics};
pub use store::{
    DeleteOutcome, DeleteOverrides, DeleteRequest, ObjectStore, PutOutcome, PutOverrides,
    PutRequest,
};

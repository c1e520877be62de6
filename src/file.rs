//! File records handed over by the upload subsystem.

use aws_sdk_s3::primitives::ByteStream;
use serde_json::{Map, Value};

/// Payload carried by a [`FileDescriptor`].
///
/// Exactly one source of bytes exists per upload: either the whole file in
/// memory or a byte stream (typically file-backed, see
/// [`ByteStream::from_path`]).
#[derive(Debug)]
pub enum FilePayload {
    /// In-memory file contents.
    Buffer(Vec<u8>),
    /// Streamed file contents.
    Stream(ByteStream),
}

/// A media file record owned by the calling upload subsystem.
///
/// The provider reads `path`, `hash` and `ext` to compute the object key,
/// consumes `payload`, and fills `url` on a successful upload. Everything
/// else is carried through untouched.
#[derive(Debug, Default)]
pub struct FileDescriptor {
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Format variants (thumbnails etc.), opaque to this provider.
    pub formats: Option<Map<String, Value>>,
    /// Content hash, the filename part of the object key.
    pub hash: String,
    /// File extension including the leading dot (e.g. `".json"`).
    pub ext: Option<String>,
    /// MIME type, sent as the object's content type.
    pub mime: String,
    pub size_in_bytes: u64,
    /// Public URL, filled by a successful upload.
    pub url: Option<String>,
    pub preview_url: Option<String>,
    /// Upload path inside the bucket.
    pub path: Option<String>,
    pub provider: Option<String>,
    pub provider_metadata: Option<Map<String, Value>>,
    /// Bytes to upload. `None` once consumed (or for delete-only records).
    pub payload: Option<FilePayload>,
}

impl FileDescriptor {
    /// Create a descriptor with the fields every upload needs; the rest
    /// default to empty.
    pub fn new(
        name: impl Into<String>,
        hash: impl Into<String>,
        mime: impl Into<String>,
        size_in_bytes: u64,
        payload: FilePayload,
    ) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            mime: mime.into(),
            size_in_bytes,
            payload: Some(payload),
            ..Self::default()
        }
    }
}

// ABOUTME: Remote artifact store interface and artifact addressing.
// ABOUTME: Artifacts live at bucket + folder + filename; writes are last-write-wins.

mod s3;

pub use s3::S3Store;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Where an artifact lives in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub folder: String,
    pub filename: String,
}

impl ArtifactLocation {
    pub fn new(
        bucket: impl Into<String>,
        folder: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            folder: folder.into(),
            filename: filename.into(),
        }
    }

    /// Object key: `<folder>/<filename>` with redundant slashes dropped.
    pub fn key(&self) -> String {
        let folder = self.folder.trim_matches('/');
        if folder.is_empty() {
            self.filename.clone()
        } else {
            format!("{folder}/{}", self.filename)
        }
    }

    /// Publicly addressable URL of the object.
    pub fn public_url(&self) -> String {
        let key = self
            .key()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("https://{}.s3.amazonaws.com/{key}", self.bucket)
    }

    /// `s3://bucket/key`, used in logs and messages.
    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key())
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.s3_uri())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object store request failed: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("could not read artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Object store holding published archives.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn exists(&self, location: &ArtifactLocation) -> Result<bool, StoreError>;

    /// Publish `local`, replacing any object at the same location.
    async fn upload(&self, local: &Path, location: &ArtifactLocation) -> Result<(), StoreError>;
}

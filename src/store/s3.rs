// ABOUTME: S3 artifact store built on object_store.
// ABOUTME: head answers existence, put publishes; credentials come from the AWS_* environment.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::ObjectStore;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use std::path::Path;

use super::{ArtifactLocation, ArtifactStore, StoreError};

/// Talks to S3 in one region. The bucket comes from each location.
#[derive(Debug, Clone)]
pub struct S3Store {
    region: String,
}

impl S3Store {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    fn bucket(&self, bucket: &str) -> Result<AmazonS3, StoreError> {
        AmazonS3Builder::from_env()
            .with_region(&self.region)
            .with_bucket_name(bucket)
            .build()
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl ArtifactStore for S3Store {
    async fn exists(&self, location: &ArtifactLocation) -> Result<bool, StoreError> {
        let store = self.bucket(&location.bucket)?;
        object_exists(&store, location).await
    }

    async fn upload(&self, local: &Path, location: &ArtifactLocation) -> Result<(), StoreError> {
        let store = self.bucket(&location.bucket)?;
        put_file(&store, local, location).await
    }
}

fn object_path(location: &ArtifactLocation) -> ObjectPath {
    ObjectPath::from(location.key())
}

/// Not-found is an answer, not an error.
async fn object_exists(
    store: &dyn ObjectStore,
    location: &ArtifactLocation,
) -> Result<bool, StoreError> {
    match store.head(&object_path(location)).await {
        Ok(meta) => {
            tracing::debug!(%location, size = meta.size, "artifact found");
            Ok(true)
        }
        Err(object_store::Error::NotFound { .. }) => {
            tracing::debug!(%location, "artifact not found");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Replaces whatever is stored at `location`.
async fn put_file(
    store: &dyn ObjectStore,
    local: &Path,
    location: &ArtifactLocation,
) -> Result<(), StoreError> {
    let data = tokio::fs::read(local).await?;
    tracing::info!(%location, size = data.len(), "uploading artifact");
    store
        .put(&object_path(location), Bytes::from(data).into())
        .await?;
    Ok(())
}

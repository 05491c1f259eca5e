use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use common::s3::{ConfiguredClient, Error};

/// Object storage operations used by the upload pipeline.
#[async_trait]
pub(crate) trait ObjectStorage: Send + Sync {
    /// Download an object into `path`, returning its custom metadata.
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<HashMap<String, String>, Error>;

    /// Upload a local file under the provided key.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), Error>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error>;

    /// Create a bucket whose objects are readable by anyone.
    async fn create_public_bucket(&self, bucket: &str) -> Result<(), Error>;
}

#[async_trait]
impl ObjectStorage for ConfiguredClient {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<HashMap<String, String>, Error> {
        ConfiguredClient::download(self, bucket, key, path).await
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), Error> {
        ConfiguredClient::upload(self, bucket, key, path, content_type).await
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        ConfiguredClient::bucket_exists(self, bucket).await
    }

    async fn create_public_bucket(&self, bucket: &str) -> Result<(), Error> {
        ConfiguredClient::create_public_bucket(self, bucket).await
    }
}

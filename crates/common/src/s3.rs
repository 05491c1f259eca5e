use std::{collections::HashMap, io, path::Path};

use aws_sdk_s3::{
    config::{Credentials, Region},
    error::SdkError,
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};
use derive_more::{Display, Error, From};
use serde_json::json;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::config;

/// Region that doesn't accept an explicit location constraint on bucket creation.
const DEFAULT_REGION: &str = "us-east-1";

/// Storage-related errors.
#[derive(Debug, Display, From, Error)]
pub enum Error {
    /// AWS S3 SDK error.
    Sdk(aws_sdk_s3::Error),

    /// Local file IO error.
    Io(io::Error),
}

/// Configured S3 client.
pub struct ConfiguredClient {
    region: String,
    client: Client,
}

impl ConfiguredClient {
    /// Create new [`ConfiguredClient`] from the provided [`Storage`] configuration.
    ///
    /// [`Storage`]: config::Storage
    pub async fn new(config: &config::Storage) -> ConfiguredClient {
        let sdk_config = aws_config::from_env()
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(Credentials::new(
                &config.access_key_id,
                &config.secret_access_key,
                None,
                None,
                "s3-client",
            ))
            .load()
            .await;

        ConfiguredClient {
            region: config.region.clone(),
            client: Client::new(&sdk_config),
        }
    }

    /// Download an object into the provided local file path.
    ///
    /// Returns user-defined object metadata.
    pub async fn download(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<HashMap<String, String>, Error> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        let metadata = object.metadata().cloned().unwrap_or_default();

        let mut reader = Box::pin(object.body.into_async_read());
        let mut file = File::create(path).await?;
        tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;

        Ok(metadata)
    }

    /// Upload a local file under the provided key.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), Error> {
        let body = tokio::fs::read(path).await?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(())
    }

    /// Check if the bucket exists and is accessible.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => Ok(false),
            Err(err) => Err(aws_sdk_s3::Error::from(err).into()),
        }
    }

    /// Create a new bucket with all of its objects readable by anyone.
    pub async fn create_public_bucket(&self, bucket: &str) -> Result<(), Error> {
        let mut request = self.client.create_bucket().bucket(bucket);

        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request.send().await.map_err(aws_sdk_s3::Error::from)?;

        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Sid": "PublicRead",
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{bucket}/*")],
            }],
        });

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(())
    }
}

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::store::ResumeStorage;

/// Resume files kept in an S3 (or MinIO) bucket.
pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download of '{key}' failed: {e}")))?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body of '{key}' unreadable: {e}")))?;
        Ok(data.into_bytes())
    }
}

use crate::error::StorageError;
use crate::ports::storage::{ListPage, ObjectSummary, StoragePort};
use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// S3Adapter implements StoragePort for AWS S3.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => return Err(get_object_error(key, err.into_service_error())),
        };

        stream_to_file(resp.body, local_path).await
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let byte_stream = ByteStream::from_path(local_path)
            .await
            .map_err(StorageError::backend)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(byte_stream)
            .send()
            .await
            .map_err(|e| StorageError::backend(e.into_service_error()))?;
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| StorageError::backend(e.into_service_error()))?;

        Ok(list_page_from_output(resp))
    }
}

// Save a `ByteStream` to a file chunk by chunk; source videos can be larger than memory.
async fn stream_to_file(body: ByteStream, local_path: &Path) -> Result<(), StorageError> {
    let reader = body.into_async_read();
    tokio::pin!(reader);
    let mut file = tokio::fs::File::create(local_path).await?;
    tokio::io::copy(&mut reader, &mut file).await?;
    file.flush().await?;
    Ok(())
}

fn get_object_error(key: &str, err: GetObjectError) -> StorageError {
    if err.is_no_such_key() {
        StorageError::NotFound(key.to_string())
    } else {
        StorageError::backend(err)
    }
}

fn list_page_from_output(resp: ListObjectsV2Output) -> ListPage {
    let mut objects = Vec::new();
    for obj in resp.contents() {
        let Some(key) = obj.key() else { continue };
        let last_modified = obj
            .last_modified()
            .and_then(|at| DateTime::<Utc>::from_timestamp(at.secs(), at.subsec_nanos()));
        match last_modified {
            Some(last_modified) => objects.push(ObjectSummary {
                key: key.to_string(),
                last_modified,
            }),
            None => warn!("Skipping {}: no usable LastModified in listing", key),
        }
    }

    let next_token = if resp.is_truncated().unwrap_or(false) {
        resp.next_continuation_token().map(str::to_string)
    } else {
        None
    };

    ListPage {
        objects,
        next_token,
    }
}

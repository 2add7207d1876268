use crate::config::StorageConfig;
use crate::core::{ObjectStore, StoreConnector};
use crate::utils::error::{IntegrationError, Result};
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;
use url::Url;

/// 透過 Cloud Storage 的 S3 相容 XML API (HMAC 金鑰) 建立連線
#[derive(Debug, Clone)]
pub struct GcsConnector {
    config: StorageConfig,
}

impl GcsConnector {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl StoreConnector for GcsConnector {
    type Store = GcsStore;

    async fn connect(&self) -> Result<GcsStore> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()))
            .endpoint_url(&self.config.endpoint)
            .retry_config(RetryConfig::disabled());

        // 沒有 HMAC 金鑰時交給預設憑證鏈
        if let (Some(key), Some(secret)) =
            (&self.config.hmac_access_key, &self.config.hmac_secret)
        {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "storage-hmac",
            ));
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        let client = S3Client::from_conf(s3_config);

        client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| {
                IntegrationError::storage(format!(
                    "Cannot reach bucket {}: {}",
                    self.config.bucket,
                    e.into_service_error()
                ))
            })?;

        Ok(GcsStore {
            client,
            bucket: self.config.bucket.clone(),
            public_base_url: self.config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GcsStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStore for GcsStore {
    async fn put_public(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                IntegrationError::storage(format!(
                    "Failed to write {} to bucket {}: {}",
                    path,
                    self.bucket,
                    e.into_service_error()
                ))
            })?;

        Ok(public_object_url(&self.public_base_url, &self.bucket, path))
    }
}

/// 物件公開網址，路徑各段做百分比編碼 (空白、`#`、`?` 等)
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    let mut url = match Url::parse(base_url) {
        Ok(url) if !url.cannot_be_a_base() => url,
        _ => return format!("{}/{}/{}", base_url, bucket, path),
    };

    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push(bucket)
            .extend(path.split('/'));
    }
    url.to_string()
}

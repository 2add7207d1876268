use crate::core::{ObjectStore, StoreConnector, UploadOutcome, UploadRequest};
use crate::utils::error::Result;
use base64::Engine as _;
use tokio::sync::OnceCell;

/// 物件儲存客戶端
///
/// 第一次上傳時才建立連線；連線失敗或寫入失敗都不會讓呼叫端失敗，
/// 而是回傳可預測的 `<base>/<bucket>/<folder>/<filename>` URL。
pub struct StorageClient<C: StoreConnector> {
    connector: C,
    store: OnceCell<C::Store>,
    bucket: String,
    public_base_url: String,
}

impl<C: StoreConnector> StorageClient<C> {
    pub fn new(connector: C, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        let bucket = bucket.into();
        tracing::info!("Storage client created (lazy init) for bucket: {}", bucket);
        Self {
            connector,
            store: OnceCell::new(),
            bucket,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    pub fn fallback_url(&self, folder: &str, filename: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.public_base_url, self.bucket, folder, filename
        )
    }

    /// 失敗的初始化不會寫入 cell，下一次呼叫會重試
    async fn ensure_connected(&self) -> Option<&C::Store> {
        match self
            .store
            .get_or_try_init(|| async {
                let store = self.connector.connect().await?;
                tracing::info!("Storage initialized with bucket: {}", self.bucket);
                Ok::<_, crate::utils::error::IntegrationError>(store)
            })
            .await
        {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Storage initialization warning: {}. Using fallback mode.", e);
                None
            }
        }
    }

    pub async fn upload(&self, request: UploadRequest) -> UploadOutcome {
        let fallback = self.fallback_url(&request.folder, &request.filename);

        let Some(store) = self.ensure_connected().await else {
            tracing::warn!("Storage not initialized, using placeholder URL");
            return UploadOutcome::Fallback(fallback);
        };

        let path = request.object_path();
        tracing::debug!(
            "Uploading {} bytes to {} ({})",
            request.data.len(),
            path,
            request.content_type
        );

        match store
            .put_public(&path, request.data, &request.content_type)
            .await
        {
            Ok(public_url) => {
                tracing::info!("File uploaded successfully: {}", public_url);
                UploadOutcome::Stored(public_url)
            }
            Err(e) => {
                tracing::error!("Storage upload error: {}", e);
                UploadOutcome::Fallback(fallback)
            }
        }
    }

    /// 解碼 base64 後上傳；格式錯誤會直接回傳錯誤，不嘗試連線
    pub async fn upload_base64(
        &self,
        encoded: &str,
        filename: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<UploadOutcome> {
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let data = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| {
                tracing::error!("Base64 upload error: {}", e);
                e
            })?;

        let request = UploadRequest::new(data, filename)
            .with_content_type(content_type)
            .with_folder(folder);

        Ok(self.upload(request).await)
    }
}

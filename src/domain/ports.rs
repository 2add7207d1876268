use crate::domain::model::{PushMessage, PushTicket};
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::Message;

/// 已連線的物件儲存後端
pub trait ObjectStore: Send + Sync {
    /// 寫入物件並設為公開可讀，回傳公開 URL
    fn put_public(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 建立物件儲存連線；由 `StorageClient` 在第一次上傳時呼叫
pub trait StoreConnector: Send + Sync {
    type Store: ObjectStore;

    fn connect(&self) -> impl std::future::Future<Output = Result<Self::Store>> + Send;
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// 一次送出一批訊息，回傳與訊息順序一致的 ticket
    async fn publish_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>>;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<()>;
}

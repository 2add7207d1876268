pub mod email;
pub mod payment;
pub mod push;
pub mod storage;
pub mod templates;

pub use crate::domain::model::{
    EmailMessage, PushBatchResult, PushFailure, PushMessage, PushPriority, PushReceipt,
    PushTicket, PushToken, TransactionRequest, UploadOutcome, UploadRequest,
};
pub use crate::domain::ports::{MailTransport, ObjectStore, PushTransport, StoreConnector};
pub use crate::utils::error::Result;

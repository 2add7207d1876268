// Adapters layer: concrete provider implementations behind the domain ports.

pub mod expo;
#[cfg(feature = "gcs")]
pub mod gcs;
pub mod smtp;

pub use expo::ExpoPushTransport;
#[cfg(feature = "gcs")]
pub use gcs::{GcsConnector, GcsStore};
pub use smtp::SmtpMailer;

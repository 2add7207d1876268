pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{Cli, Command};

pub use crate::app::Integrations;
pub use crate::config::AppConfig;
pub use crate::core::{
    email::EmailClient, payment::PaymentClient, push::PushDispatcher, storage::StorageClient,
};
pub use crate::utils::error::{IntegrationError, PaymentError, Result};

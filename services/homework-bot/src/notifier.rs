//! Notifier trait for delivering messages

use async_trait::async_trait;

/// Trait for sending plain-text notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Send a message
    async fn notify(&self, message: &str) -> crate::Result<()>;
}

use async_trait::async_trait;

use crate::error::VaultError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyBody {
    Plain(String),
    Html(String),
}

impl NotifyBody {
    pub fn text(&self) -> &str {
        match self {
            NotifyBody::Plain(text) | NotifyBody::Html(text) => text,
        }
    }
}

/// Outbound notification capability. The transport behind it is a black
/// box; components only see send success or failure, and no primary
/// operation may depend on the outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &NotifyBody,
    ) -> Result<(), VaultError>;
}

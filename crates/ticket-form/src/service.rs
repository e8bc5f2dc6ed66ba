use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::TicketDraft;

/// Identifier returned by a successful create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketId(pub String);

/// Failure returned by the create-ticket operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The server reached a verdict and rejected the ticket.
    #[error("ticket rejected: {0}")]
    Rejected(String),
    /// The request never produced a server verdict.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ServiceError {
    /// Raw message as received, fed to the error classifier.
    pub fn detail(&self) -> &str {
        match self {
            ServiceError::Rejected(message) | ServiceError::Transport(message) => message,
        }
    }
}

/// Remote operation that turns a draft into a marketplace ticket.
///
/// The wizard owns no timeout or retry policy; implementations do.
#[async_trait]
pub trait TicketService: Send + Sync {
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketId, ServiceError>;
}

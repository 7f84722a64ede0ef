mod inmemory;
mod smtp;

pub use inmemory::InMemoryMailer;
pub use smtp::SmtpMailer;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Email build error: {0}")]
    Build(String),
    #[error("Mail to `{0}` was rejected")]
    Rejected(String),
}

/// Transport that delivers rendered emails. Sending may fail, callers
/// decide what a failure means for them.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

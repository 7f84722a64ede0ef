use super::{IMailer, MailError, OutgoingMail};
use std::{collections::HashSet, sync::Mutex};
use tracing::info;

/// Keeps sent mails in memory instead of delivering them. Used for dry
/// runs and tests.
pub struct InMemoryMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    rejected_recipients: Mutex<HashSet<String>>,
    failures_left: Mutex<usize>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            rejected_recipients: Mutex::new(HashSet::new()),
            failures_left: Mutex::new(0),
        }
    }

    /// Makes every following mail to `address` fail
    pub fn reject(&self, address: &str) {
        self.rejected_recipients
            .lock()
            .unwrap()
            .insert(address.to_string());
    }

    /// Makes the next `count` mails fail, whoever they are sent to
    pub fn fail_next(&self, count: usize) {
        *self.failures_left.lock().unwrap() = count;
    }

    pub fn accept(&self, address: &str) {
        self.rejected_recipients.lock().unwrap().remove(address);
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.rejected_recipients.lock().unwrap().contains(&mail.to) {
            return Err(MailError::Rejected(mail.to.clone()));
        }
        {
            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(MailError::Rejected(mail.to.clone()));
            }
        }
        info!(to = %mail.to, subject = %mail.subject, "Email kept in memory");
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

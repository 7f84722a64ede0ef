mod mailer;

pub use mailer::{IMailer, InMemoryMailer, MailError, OutgoingMail, SmtpMailer};

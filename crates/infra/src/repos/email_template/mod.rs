mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailTemplateRepo;
pub use postgres::PostgresEmailTemplateRepo;
use rental_reminders_domain::EmailTemplate;

#[async_trait::async_trait]
pub trait IEmailTemplateRepo: Send + Sync {
    /// Inserts the template or replaces the one stored with the same key
    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()>;
    async fn find_by_key(&self, key: &str) -> anyhow::Result<Option<EmailTemplate>>;
}

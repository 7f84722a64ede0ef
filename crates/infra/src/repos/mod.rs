mod email_template;
mod job;
mod reminder;
mod shared;

pub use email_template::{IEmailTemplateRepo, InMemoryEmailTemplateRepo, PostgresEmailTemplateRepo};
pub use job::{IJobRepo, InMemoryJobRepo, PostgresJobRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub jobs: Arc<dyn IJobRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub email_templates: Arc<dyn IEmailTemplateRepo>,
}

impl Repos {
    pub fn create_postgres(pool: PgPool) -> Self {
        Self {
            jobs: Arc::new(PostgresJobRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            email_templates: Arc::new(PostgresEmailTemplateRepo::new(pool)),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            jobs: Arc::new(InMemoryJobRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
            email_templates: Arc::new(InMemoryEmailTemplateRepo::new()),
        }
    }
}

use super::IEmailTemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use rental_reminders_domain::EmailTemplate;

pub struct InMemoryEmailTemplateRepo {
    templates: std::sync::Mutex<Vec<EmailTemplate>>,
}

impl InMemoryEmailTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryEmailTemplateRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailTemplateRepo for InMemoryEmailTemplateRepo {
    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        upsert_by(template, &self.templates, |t| t.key == template.key);
        Ok(())
    }

    async fn find_by_key(&self, key: &str) -> anyhow::Result<Option<EmailTemplate>> {
        Ok(find_by(&self.templates, |t| t.key == key).into_iter().next())
    }
}

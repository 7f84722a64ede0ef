use super::IEmailTemplateRepo;
use rental_reminders_domain::EmailTemplate;
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresEmailTemplateRepo {
    pool: PgPool,
}

impl PostgresEmailTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailTemplateRaw {
    key: String,
    subject: String,
    body: String,
}

impl From<EmailTemplateRaw> for EmailTemplate {
    fn from(raw: EmailTemplateRaw) -> Self {
        Self {
            key: raw.key,
            subject: raw.subject,
            body: raw.body,
        }
    }
}

#[async_trait::async_trait]
impl IEmailTemplateRepo for PostgresEmailTemplateRepo {
    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_templates(key, subject, body)
            VALUES($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET subject = EXCLUDED.subject,
            body = EXCLUDED.body
            "#,
        )
        .bind(&template.key)
        .bind(&template.subject)
        .bind(&template.body)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save email template: {:?}. DB returned error: {:?}",
                template.key, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_key(&self, key: &str) -> anyhow::Result<Option<EmailTemplate>> {
        let res: Option<EmailTemplateRaw> = sqlx::query_as(
            r#"
            SELECT key, subject, body FROM email_templates
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find email template with key: {:?} failed. DB returned error: {:?}",
                key, e
            );
            e
        })?;
        Ok(res.map(|template| template.into()))
    }
}

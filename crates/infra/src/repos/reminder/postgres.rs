use super::IReminderRepo;
use rental_reminders_domain::{ReminderRecord, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::collections::HashSet;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    job_uid: Uuid,
    offset_days: i32,
    sent_at: i64,
}

impl From<ReminderRaw> for ReminderRecord {
    fn from(raw: ReminderRaw) -> Self {
        Self {
            job_id: raw.job_uid.into(),
            offset_days: raw.offset_days,
            sent_at: raw.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_reminders
            (job_uid, offset_days, sent_at)
            VALUES($1, $2, $3)
            ON CONFLICT (job_uid, offset_days) DO NOTHING
            "#,
        )
        .bind(record.job_id.inner_ref())
        .bind(record.offset_days)
        .bind(record.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder record: {:?}. DB returned error: {:?}",
                record, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_sent_offsets(&self, job_id: &ID) -> anyhow::Result<HashSet<i32>> {
        let offsets: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT offset_days FROM job_reminders
            WHERE job_uid = $1
            "#,
        )
        .bind(job_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find sent reminder offsets for job: {:?} failed. DB returned error: {:?}",
                job_id, e
            );
            e
        })?;
        Ok(offsets.into_iter().collect())
    }

    async fn find_by_job(&self, job_id: &ID) -> anyhow::Result<Vec<ReminderRecord>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT job_uid, offset_days, sent_at FROM job_reminders
            WHERE job_uid = $1
            ORDER BY offset_days
            "#,
        )
        .bind(job_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminders for job: {:?} failed. DB returned error: {:?}",
                job_id, e
            );
            e
        })?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }
}

mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use rental_reminders_domain::{ReminderRecord, ID};
use std::collections::HashSet;

/// The ledger of reminders that have been sent
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Records that a reminder was sent. Recording the same `job_id` and
    /// `offset_days` twice keeps the first record.
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<()>;
    async fn find_sent_offsets(&self, job_id: &ID) -> anyhow::Result<HashSet<i32>>;
    async fn find_by_job(&self, job_id: &ID) -> anyhow::Result<Vec<ReminderRecord>>;
}

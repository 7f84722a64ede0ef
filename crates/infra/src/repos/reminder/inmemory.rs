use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use rental_reminders_domain::{ReminderRecord, ID};
use std::collections::HashSet;

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<ReminderRecord>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<()> {
        insert_unless(record, &self.reminders, |r| {
            r.job_id == record.job_id && r.offset_days == record.offset_days
        });
        Ok(())
    }

    async fn find_sent_offsets(&self, job_id: &ID) -> anyhow::Result<HashSet<i32>> {
        Ok(find_by(&self.reminders, |r| r.job_id == *job_id)
            .into_iter()
            .map(|r| r.offset_days)
            .collect())
    }

    async fn find_by_job(&self, job_id: &ID) -> anyhow::Result<Vec<ReminderRecord>> {
        let mut records = find_by(&self.reminders, |r| r.job_id == *job_id);
        records.sort_by_key(|r| r.offset_days);
        Ok(records)
    }
}

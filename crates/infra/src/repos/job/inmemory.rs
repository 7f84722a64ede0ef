use super::IJobRepo;
use crate::repos::shared::inmemory_repo::*;
use rental_reminders_domain::{AnchorField, Job, JobStatus};

pub struct InMemoryJobRepo {
    jobs: std::sync::Mutex<Vec<Job>>,
}

impl InMemoryJobRepo {
    pub fn new() -> Self {
        Self {
            jobs: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Jobs are owned by the back office, so only the inmemory store
    /// can be seeded
    pub fn insert(&self, job: &Job) {
        insert(job, &self.jobs);
    }
}

impl Default for InMemoryJobRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IJobRepo for InMemoryJobRepo {
    async fn find_by_status_with_anchor(
        &self,
        status: JobStatus,
        anchor: AnchorField,
    ) -> anyhow::Result<Vec<Job>> {
        Ok(find_by(&self.jobs, |job| {
            job.status == status && job.anchor_date(anchor).is_some()
        }))
    }
}

mod inmemory;
mod postgres;

pub use inmemory::InMemoryJobRepo;
pub use postgres::PostgresJobRepo;
use rental_reminders_domain::{AnchorField, Job, JobStatus};

/// Read access to the jobs of the back office. Every returned `Job` has its
/// contact, company (with default contact) and supplier loaded.
#[async_trait::async_trait]
pub trait IJobRepo: Send + Sync {
    /// All jobs in `status` where the `anchor` date is set
    async fn find_by_status_with_anchor(
        &self,
        status: JobStatus,
        anchor: AnchorField,
    ) -> anyhow::Result<Vec<Job>>;
}

use super::dispatcher::{DispatchOutcome, NotificationDispatcher};
use crate::shared::usecase::UseCase;
use rental_reminders_domain::{Job, ReminderKind, ReminderRecord};
use rental_reminders_infra::RentalContext;
use std::ops::AddAssign;
use thiserror::Error;
use tracing::{debug, error, info};

/// Sends every due reminder of one `ReminderKind` and records each
/// successful send in the reminder ledger
#[derive(Debug)]
pub struct SendJobRemindersUseCase {
    pub kind: ReminderKind,
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to load jobs for {0} reminders")]
    StorageError(ReminderKind),
}

/// How a run went. Failures for single jobs are counted here instead of
/// failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub jobs_considered: usize,
    pub sent: usize,
    pub skipped_no_recipient: usize,
    pub failed: usize,
    /// Reminders that were sent but could not be recorded
    pub ledger_failures: usize,
}

impl AddAssign for RunReport {
    fn add_assign(&mut self, other: Self) {
        self.jobs_considered += other.jobs_considered;
        self.sent += other.sent;
        self.skipped_no_recipient += other.skipped_no_recipient;
        self.failed += other.failed;
        self.ledger_failures += other.ledger_failures;
    }
}

async fn send_job_reminders(
    job: &Job,
    kind: ReminderKind,
    dispatcher: &NotificationDispatcher<'_>,
    ctx: &RentalContext,
    report: &mut RunReport,
) {
    let anchor = match job.anchor_date(kind.anchor()) {
        Some(anchor) => anchor,
        None => return,
    };

    let sent = match ctx.repos.reminders.find_sent_offsets(&job.id).await {
        Ok(sent) => sent,
        Err(e) => {
            error!(
                "Unable to read sent reminders for job: {}, skipping it. Err: {:?}",
                job.id, e
            );
            report.failed += 1;
            return;
        }
    };

    let due = kind.schedule().due(anchor, ctx.sys.today(), &sent);
    for day in due {
        match dispatcher.dispatch(job, day, anchor).await {
            DispatchOutcome::Sent { .. } => {
                report.sent += 1;
                let record =
                    ReminderRecord::new(job.id.clone(), day, ctx.sys.get_timestamp_millis());
                if let Err(e) = ctx.repos.reminders.insert(&record).await {
                    error!(
                        "Sent {} reminder for job: {} but was unable to record it. Err: {:?}",
                        day.label(),
                        job.id,
                        e
                    );
                    report.ledger_failures += 1;
                }
            }
            DispatchOutcome::NoRecipient => {
                // No other offset of this job can be delivered either
                report.skipped_no_recipient += 1;
                return;
            }
            DispatchOutcome::Failed => {
                report.failed += 1;
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendJobRemindersUseCase {
    type Response = RunReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendJobReminders";

    async fn execute(&mut self, ctx: &RentalContext) -> Result<Self::Response, Self::Error> {
        let kind = self.kind;
        let jobs = ctx
            .repos
            .jobs
            .find_by_status_with_anchor(kind.status(), kind.anchor())
            .await
            .map_err(|e| {
                error!("Unable to load jobs for {} reminders. Err: {:?}", kind, e);
                UseCaseError::StorageError(kind)
            })?;
        debug!("Found {} jobs eligible for {} reminders", jobs.len(), kind);

        let dispatcher = NotificationDispatcher::for_kind(ctx, kind).await;
        let mut report = RunReport {
            jobs_considered: jobs.len(),
            ..Default::default()
        };
        for job in &jobs {
            send_job_reminders(job, kind, &dispatcher, ctx, &mut report).await;
        }

        info!("Finished {} reminders: {:?}", kind, report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::NaiveDate;
    use rental_reminders_domain::{AnchorField, JobStatus, Profile, User, ID};
    use rental_reminders_infra::{
        IJobRepo, IReminderRepo, InMemoryJobRepo, InMemoryMailer, StaticSys,
    };
    use std::collections::HashSet;
    use std::sync::Arc;

    struct TestContext {
        ctx: RentalContext,
        jobs: Arc<InMemoryJobRepo>,
        mailer: Arc<InMemoryMailer>,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup(today: NaiveDate) -> TestContext {
        let jobs = Arc::new(InMemoryJobRepo::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let mut ctx = RentalContext::create_inmemory();
        ctx.repos.jobs = jobs.clone();
        ctx.mailer = mailer.clone();
        ctx.sys = Arc::new(StaticSys { today });
        TestContext { ctx, jobs, mailer }
    }

    fn completed_job(email: Option<&str>, completed_at: NaiveDate) -> Job {
        let mut job = Job::new("Crane hire", JobStatus::Completed);
        job.completed_at = Some(completed_at);
        job.contact = Some(User::new(Some(Profile {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: email.map(String::from),
        })));
        job
    }

    async fn sent_offsets(ctx: &RentalContext, job_id: &ID) -> HashSet<i32> {
        ctx.repos.reminders.find_sent_offsets(job_id).await.unwrap()
    }

    #[tokio::test]
    async fn sends_due_reminder_once_per_offset() {
        let test = setup(date(2024, 1, 8));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.jobs_considered, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(sent_offsets(&test.ctx, &job.id).await, HashSet::from([7]));

        // Running again the same day sends nothing
        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(test.mailer.sent().len(), 1);
        assert_eq!(test.ctx.repos.reminders.find_by_job(&job.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn catches_up_on_every_due_offset() {
        let test = setup(date(2024, 1, 22));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.sent, 3);

        let records = test.ctx.repos.reminders.find_by_job(&job.id).await.unwrap();
        let offsets = records.iter().map(|r| r.offset_days).collect::<Vec<_>>();
        assert_eq!(offsets, vec![7, 14, 21]);
        assert!(records.iter().all(|r| r.sent_at == 1705881600000));

        // Mails go out in ascending order
        let bodies = test
            .mailer
            .sent()
            .into_iter()
            .map(|m| m.body)
            .collect::<Vec<_>>();
        assert!(bodies[0].contains("1 week"));
        assert!(bodies[1].contains("2 weeks"));
        assert!(bodies[2].contains("3 weeks"));
    }

    #[tokio::test]
    async fn skips_jobs_without_recipient() {
        let test = setup(date(2024, 2, 1));
        let job = completed_job(None, date(2024, 1, 1));
        test.jobs.insert(&job);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(report.skipped_no_recipient, 1);
        assert!(test.mailer.sent().is_empty());
        assert!(sent_offsets(&test.ctx, &job.id).await.is_empty());
    }

    #[tokio::test]
    async fn failed_sends_are_not_recorded_and_retried() {
        let test = setup(date(2024, 1, 8));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);
        test.mailer.reject("jane@renter.test");

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.failed, 1);
        assert!(sent_offsets(&test.ctx, &job.id).await.is_empty());

        test.mailer.accept("jane@renter.test");
        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(sent_offsets(&test.ctx, &job.id).await, HashSet::from([7]));
    }

    #[tokio::test]
    async fn only_considers_jobs_of_the_kind() {
        let test = setup(date(2024, 1, 3));
        let mut unpacked = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        unpacked.status = JobStatus::Unpacked;
        unpacked.unpacked_at = Some(date(2024, 1, 1));
        test.jobs.insert(&unpacked);

        let not_yet_unpacked = {
            let mut job = unpacked.clone();
            job.id = ID::default();
            job.unpacked_at = None;
            job
        };
        test.jobs.insert(&not_yet_unpacked);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report, RunReport::default());

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::OnSite,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.jobs_considered, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(sent_offsets(&test.ctx, &unpacked.id).await, HashSet::from([2]));
    }

    #[tokio::test]
    async fn anchor_in_the_future_sends_nothing() {
        let test = setup(date(2024, 1, 1));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 10));
        test.jobs.insert(&job);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.jobs_considered, 1);
        assert_eq!(report.sent, 0);
    }

    struct FailingJobRepo;

    #[async_trait::async_trait]
    impl IJobRepo for FailingJobRepo {
        async fn find_by_status_with_anchor(
            &self,
            _status: JobStatus,
            _anchor: AnchorField,
        ) -> anyhow::Result<Vec<Job>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    struct FailingLedger;

    #[async_trait::async_trait]
    impl IReminderRepo for FailingLedger {
        async fn insert(&self, _record: &ReminderRecord) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        async fn find_sent_offsets(&self, _job_id: &ID) -> anyhow::Result<HashSet<i32>> {
            Ok(HashSet::new())
        }

        async fn find_by_job(&self, _job_id: &ID) -> anyhow::Result<Vec<ReminderRecord>> {
            Ok(Vec::new())
        }
    }

    struct UnreadableLedger;

    #[async_trait::async_trait]
    impl IReminderRepo for UnreadableLedger {
        async fn insert(&self, _record: &ReminderRecord) -> anyhow::Result<()> {
            Ok(())
        }

        async fn find_sent_offsets(&self, _job_id: &ID) -> anyhow::Result<HashSet<i32>> {
            Err(anyhow::anyhow!("connection reset"))
        }

        async fn find_by_job(&self, _job_id: &ID) -> anyhow::Result<Vec<ReminderRecord>> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn unreadable_ledger_skips_the_job() {
        let mut test = setup(date(2024, 1, 22));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);
        test.ctx.repos.reminders = Arc::new(UnreadableLedger);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.jobs_considered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 0);
        assert!(test.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_offset_does_not_stop_the_later_ones() {
        let test = setup(date(2024, 1, 22));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);
        // Only the 7 day reminder fails, it is the first one sent
        test.mailer.fail_next(1);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 2);
        assert_eq!(sent_offsets(&test.ctx, &job.id).await, HashSet::from([14, 21]));

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.failed, 0);
        assert_eq!(report.sent, 1);
        assert_eq!(
            sent_offsets(&test.ctx, &job.id).await,
            HashSet::from([7, 14, 21])
        );
        let last = test.mailer.sent().pop().unwrap();
        assert!(last.body.contains("It has been 1 week"));
    }

    #[tokio::test]
    async fn job_store_failure_aborts_the_run() {
        let mut test = setup(date(2024, 1, 8));
        test.ctx.repos.jobs = Arc::new(FailingJobRepo);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let res = execute(usecase, &test.ctx).await;
        assert!(matches!(res, Err(UseCaseError::StorageError(ReminderKind::RateJob))));
    }

    #[tokio::test]
    async fn ledger_failure_is_reported_but_mail_counts_as_sent() {
        let mut test = setup(date(2024, 1, 8));
        let job = completed_job(Some("jane@renter.test"), date(2024, 1, 1));
        test.jobs.insert(&job);
        test.ctx.repos.reminders = Arc::new(FailingLedger);

        let usecase = SendJobRemindersUseCase {
            kind: ReminderKind::RateJob,
        };
        let report = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.ledger_failures, 1);
        assert_eq!(test.mailer.sent().len(), 1);
    }

    #[test]
    fn adds_reports() {
        let mut report = RunReport {
            jobs_considered: 1,
            sent: 2,
            ..Default::default()
        };
        report += RunReport {
            jobs_considered: 3,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(report.jobs_considered, 4);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
    }
}

use chrono::NaiveDate;
use rental_reminders_domain::{Company, Job, JobStatus, Profile, User};
use rental_reminders_infra::{InMemoryJobRepo, InMemoryMailer, RentalContext, StaticSys};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: RentalContext,
    pub jobs: Arc<InMemoryJobRepo>,
    pub mailer: Arc<InMemoryMailer>,
}

impl TestApp {
    /// Moves the clock of the app to `today`
    pub fn set_today(&mut self, today: NaiveDate) {
        self.ctx.sys = Arc::new(StaticSys { today });
    }
}

// In memory application with a clock frozen at `today`
pub fn spawn_app(today: NaiveDate) -> TestApp {
    let jobs = Arc::new(InMemoryJobRepo::new());
    let mailer = Arc::new(InMemoryMailer::new());
    let mut ctx = RentalContext::create_inmemory();
    ctx.repos.jobs = jobs.clone();
    ctx.mailer = mailer.clone();
    ctx.sys = Arc::new(StaticSys { today });

    TestApp { ctx, jobs, mailer }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn contact(first_name: &str, email: Option<&str>) -> User {
    User::new(Some(Profile {
        first_name: first_name.into(),
        last_name: "Renter".into(),
        email: email.map(String::from),
    }))
}

pub fn completed_job(name: &str, completed_at: NaiveDate, contact: Option<User>) -> Job {
    let mut job = Job::new(name, JobStatus::Completed);
    job.completed_at = Some(completed_at);
    job.contact = contact;
    job.supplier = Some(Company::new("Lift Co", None));
    job
}

pub fn unpacked_job(name: &str, unpacked_at: NaiveDate, contact: Option<User>) -> Job {
    let mut job = Job::new(name, JobStatus::Unpacked);
    job.unpacked_at = Some(unpacked_at);
    job.contact = contact;
    job.supplier = Some(Company::new("Lift Co", None));
    job
}

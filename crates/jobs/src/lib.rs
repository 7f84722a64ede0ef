mod job_schedulers;
mod reminder;
mod shared;

pub use job_schedulers::{get_start_delay, run_reminder_jobs, start_daily_reminders_job};
pub use reminder::dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use reminder::send_job_reminders::{RunReport, SendJobRemindersUseCase, UseCaseError};
pub use shared::usecase::{execute, UseCase};

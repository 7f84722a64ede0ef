pub mod dispatcher;
pub mod send_job_reminders;

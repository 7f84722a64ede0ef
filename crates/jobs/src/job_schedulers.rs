use crate::{
    reminder::send_job_reminders::{RunReport, SendJobRemindersUseCase, UseCaseError},
    shared::usecase::execute,
};
use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use rental_reminders_domain::ReminderKind;
use rental_reminders_infra::RentalContext;
use tokio::time::sleep;
use tracing::{error, info};

/// Time from `now` until the next `run_hour` o'clock in the timezone of `now`.
/// A run that would start exactly now is scheduled for the next day.
/// Local time is used as is, so the delay is off by the DST shift on
/// days where the clocks change.
pub fn get_start_delay(now: DateTime<Tz>, run_hour: u32) -> std::time::Duration {
    let now = now.naive_local();
    let mut next_run = now
        .date()
        .and_hms_opt(run_hour, 0, 0)
        .unwrap_or_else(|| now.date().and_time(Default::default()));
    if next_run <= now {
        next_run += Duration::days(1);
    }
    (next_run - now).to_std().unwrap_or_default()
}

/// Runs the reminders of every given kind once, one kind after the other.
/// Stops at the first kind whose jobs can not be loaded.
pub async fn run_reminder_jobs(
    ctx: &RentalContext,
    kinds: &[ReminderKind],
) -> Result<RunReport, UseCaseError> {
    let mut report = RunReport::default();
    for kind in kinds {
        let usecase = SendJobRemindersUseCase { kind: *kind };
        report += execute(usecase, ctx).await?;
    }
    Ok(report)
}

/// Runs the reminders once a day at the configured hour. Never returns.
pub async fn start_daily_reminders_job(ctx: RentalContext, kinds: Vec<ReminderKind>) {
    loop {
        let now = ctx
            .config
            .timezone
            .timestamp_millis_opt(ctx.sys.get_timestamp_millis())
            .single()
            .unwrap_or_else(|| chrono::Utc::now().with_timezone(&ctx.config.timezone));
        let delay = get_start_delay(now, ctx.config.run_hour);
        info!("Next reminders run in {} seconds", delay.as_secs());
        sleep(delay).await;

        match run_reminder_jobs(&ctx, &kinds).await {
            Ok(report) => info!("Daily reminders run finished: {:?}", report),
            Err(e) => error!("Daily reminders run failed: {}", e),
        }
    }
}

mod telemetry;

use clap::Parser;
use rental_reminders_domain::ReminderKind;
use rental_reminders_infra::setup_context;
use rental_reminders_jobs::{run_reminder_jobs, start_daily_reminders_job};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

/// Sends reminder emails for completed and unpacked rental jobs
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Only send reminders of this kind: `rate-job` or `on-site`
    #[arg(long)]
    kind: Option<ReminderKind>,

    /// Log what would be sent without sending or recording anything
    #[arg(long)]
    dry_run: bool,

    /// Keep running and send reminders once a day at REMINDERS_RUN_HOUR
    #[arg(long)]
    daemon: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = get_subscriber("rental_reminders".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context(args.dry_run).await?;
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => ReminderKind::ALL.to_vec(),
    };

    if args.daemon {
        start_daily_reminders_job(context, kinds).await;
        return Ok(());
    }

    let report = run_reminder_jobs(&context, &kinds).await?;
    info!(
        dry_run = args.dry_run,
        jobs_considered = report.jobs_considered,
        sent = report.sent,
        skipped_no_recipient = report.skipped_no_recipient,
        failed = report.failed,
        ledger_failures = report.ledger_failures,
        "Reminders run finished"
    );
    Ok(())
}

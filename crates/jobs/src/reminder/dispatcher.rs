use chrono::NaiveDate;
use rental_reminders_domain::{
    EmailTemplate, Job, Recipient, RecipientSource, ReminderDay, ReminderKind, ReminderSchedule,
    TemplateVars,
};
use rental_reminders_infra::{OutgoingMail, RentalContext};
use tracing::{debug, error, info, warn};

const DATE_FORMAT: &str = "%d %B %Y";
const FALLBACK_FIRST_NAME: &str = "there";
const FALLBACK_COUNTERPART_NAME: &str = "your supplier";

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Sent {
        to: String,
        source: RecipientSource,
    },
    /// No contact email could be resolved for the job
    NoRecipient,
    /// The mail transport failed. The reminder should be tried again.
    Failed,
}

/// Renders and sends reminder emails for one `ReminderKind`
pub struct NotificationDispatcher<'a> {
    ctx: &'a RentalContext,
    template: EmailTemplate,
}

impl<'a> NotificationDispatcher<'a> {
    pub fn new(ctx: &'a RentalContext, template: EmailTemplate) -> Self {
        Self { ctx, template }
    }

    /// Loads the stored template for `kind`, falling back to the built in one
    pub async fn for_kind(
        ctx: &'a RentalContext,
        kind: ReminderKind,
    ) -> NotificationDispatcher<'a> {
        let stored = ctx
            .repos
            .email_templates
            .find_by_key(kind.template_key())
            .await;
        let template = match stored {
            Ok(Some(template)) => template,
            Ok(None) => EmailTemplate::default_for(kind),
            Err(e) => {
                warn!(
                    "Unable to load email template: {}, using the default. Err: {:?}",
                    kind.template_key(),
                    e
                );
                EmailTemplate::default_for(kind)
            }
        };
        Self::new(ctx, template)
    }

    /// Sends the `day` reminder for `job`. Never fails, every problem is
    /// logged and reported through the `DispatchOutcome`.
    pub async fn dispatch(
        &self,
        job: &Job,
        day: ReminderDay,
        anchor: NaiveDate,
    ) -> DispatchOutcome {
        let recipient = match job.recipient() {
            Ok(recipient) => recipient,
            Err(e) => {
                debug!("Skipping reminder: {}", e);
                return DispatchOutcome::NoRecipient;
            }
        };

        let rendered = self
            .template
            .render(&reminder_vars(job, &recipient, day, anchor));
        if !rendered.missing.is_empty() {
            warn!(
                "Email template: {} has placeholders without values: {:?}",
                self.template.key, rendered.missing
            );
        }

        let mail = OutgoingMail {
            to: recipient.email,
            subject: rendered.subject,
            body: rendered.body,
        };
        match self.ctx.mailer.send(&mail).await {
            Ok(()) => {
                info!(
                    "Sent {} reminder for job: {} to {} ({:?})",
                    day.label(),
                    job.id,
                    mail.to,
                    recipient.source
                );
                DispatchOutcome::Sent {
                    to: mail.to,
                    source: recipient.source,
                }
            }
            Err(e) => {
                error!(
                    "Unable to send {} reminder for job: {} to {}. Err: {:?}",
                    day.label(),
                    job.id,
                    mail.to,
                    e
                );
                DispatchOutcome::Failed
            }
        }
    }
}

fn reminder_vars(
    job: &Job,
    recipient: &Recipient,
    day: ReminderDay,
    anchor: NaiveDate,
) -> TemplateVars {
    TemplateVars::new()
        .with("job_name", job.name.as_str())
        .with(
            "counterpart_name",
            job.counterpart_name().unwrap_or(FALLBACK_COUNTERPART_NAME),
        )
        .with(
            "first_name",
            recipient.first_name.as_deref().unwrap_or(FALLBACK_FIRST_NAME),
        )
        .with("anchor_date", anchor.format(DATE_FORMAT).to_string())
        .with(
            "due_date",
            ReminderSchedule::due_date(anchor, day)
                .format(DATE_FORMAT)
                .to_string(),
        )
        .with("reminder_label", day.label())
        .with("reminder_days", day.days().to_string())
}

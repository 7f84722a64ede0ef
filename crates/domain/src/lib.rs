mod email_template;
mod job;
mod reminder;
mod schedule;
mod shared;

pub use email_template::{EmailTemplate, RenderedEmail, TemplateVars};
pub use job::{
    Company, InvalidJobStatusError, Job, JobStatus, Profile, Recipient, RecipientError,
    RecipientSource, User,
};
pub use reminder::{
    AnchorField, InvalidReminderKindError, ReminderDay, ReminderKind, ReminderRecord,
};
pub use schedule::ReminderSchedule;
pub use shared::entity::ID;

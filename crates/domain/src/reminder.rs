use crate::{job::JobStatus, schedule::ReminderSchedule, shared::entity::ID};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The day offsets after an anchor date at which reminders can be sent.
/// Every `ReminderSchedule` is built from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReminderDay {
    Two,
    Seven,
    Fourteen,
    TwentyOne,
    Thirty,
}

impl ReminderDay {
    pub const ALL: [ReminderDay; 5] = [
        ReminderDay::Two,
        ReminderDay::Seven,
        ReminderDay::Fourteen,
        ReminderDay::TwentyOne,
        ReminderDay::Thirty,
    ];

    pub const fn days(&self) -> i32 {
        match self {
            Self::Two => 2,
            Self::Seven => 7,
            Self::Fourteen => 14,
            Self::TwentyOne => 21,
            Self::Thirty => 30,
        }
    }

    /// Human readable label used in reminder emails, e.g. "2 weeks"
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Two => "2 days",
            Self::Seven => "1 week",
            Self::Fourteen => "2 weeks",
            Self::TwentyOne => "3 weeks",
            Self::Thirty => "1 month",
        }
    }
}

/// A `ReminderRecord` is the ledger entry written after a reminder for a
/// `Job` has been sent. There is at most one record per `job_id` and
/// `offset_days` and records are never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRecord {
    pub job_id: ID,
    pub offset_days: i32,
    /// Timestamp in millis of when the reminder was handed to the mail transport
    pub sent_at: i64,
}

impl ReminderRecord {
    pub fn new(job_id: ID, day: ReminderDay, sent_at: i64) -> Self {
        Self {
            job_id,
            offset_days: day.days(),
            sent_at,
        }
    }
}

/// The `Job` date a reminder kind counts its offsets from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorField {
    CompletedAt,
    UnpackedAt,
}

impl AnchorField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CompletedAt => "completed_at",
            Self::UnpackedAt => "unpacked_at",
        }
    }
}

/// The different reminder emails that are sent for jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// Asks the renter to rate a completed job
    RateJob,
    /// Tells the renter for how long the equipment has been on site
    OnSite,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [ReminderKind::RateJob, ReminderKind::OnSite];

    /// Only jobs in this status receive reminders of this kind
    pub fn status(&self) -> JobStatus {
        match self {
            Self::RateJob => JobStatus::Completed,
            Self::OnSite => JobStatus::Unpacked,
        }
    }

    pub fn anchor(&self) -> AnchorField {
        match self {
            Self::RateJob => AnchorField::CompletedAt,
            Self::OnSite => AnchorField::UnpackedAt,
        }
    }

    pub fn schedule(&self) -> ReminderSchedule {
        match self {
            Self::RateJob => ReminderSchedule::RATE_JOB,
            Self::OnSite => ReminderSchedule::ON_SITE,
        }
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            Self::RateJob => "job_rating_reminder",
            Self::OnSite => "job_on_site_reminder",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateJob => "rate-job",
            Self::OnSite => "on-site",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidReminderKindError {
    #[error("Unknown reminder kind: `{0}`. Expected one of: rate-job, on-site")]
    Unknown(String),
}

impl FromStr for ReminderKind {
    type Err = InvalidReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidReminderKindError::Unknown(s.to_string()))
    }
}

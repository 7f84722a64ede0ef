use crate::reminder::ReminderDay;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// A fixed, ascending set of `ReminderDay`s. Each reminder kind has its own
/// constant schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedule {
    days: &'static [ReminderDay],
}

impl ReminderSchedule {
    pub const RATE_JOB: Self = Self {
        days: &[
            ReminderDay::Seven,
            ReminderDay::Fourteen,
            ReminderDay::TwentyOne,
            ReminderDay::Thirty,
        ],
    };

    pub const ON_SITE: Self = Self {
        days: &[
            ReminderDay::Two,
            ReminderDay::Seven,
            ReminderDay::Fourteen,
            ReminderDay::TwentyOne,
            ReminderDay::Thirty,
        ],
    };

    pub fn days(&self) -> &[ReminderDay] {
        self.days
    }

    /// The calendar day at which the reminder for `day` becomes due
    pub fn due_date(anchor: NaiveDate, day: ReminderDay) -> NaiveDate {
        anchor + Duration::days(day.days() as i64)
    }

    /// Returns the reminders of this schedule that are due at `today` and
    /// whose offset is not in `sent`, in ascending order.
    ///
    /// A reminder is due from the day `anchor + offset` and onwards, so
    /// several reminders can be due at once if a run was skipped.
    pub fn due(
        &self,
        anchor: NaiveDate,
        today: NaiveDate,
        sent: &HashSet<i32>,
    ) -> Vec<ReminderDay> {
        if anchor > today {
            return Vec::new();
        }

        self.days
            .iter()
            .copied()
            .filter(|day| !sent.contains(&day.days()))
            .filter(|day| Self::due_date(anchor, *day) <= today)
            .collect()
    }
}

use crate::{reminder::AnchorField, shared::entity::ID};
use chrono::NaiveDate;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Accepted,
    Delivered,
    Unpacked,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Delivered => "delivered",
            Self::Unpacked => "unpacked",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidJobStatusError {
    #[error("Unknown job status: `{0}`")]
    Unknown(String),
}

impl FromStr for JobStatus {
    type Err = InvalidJobStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "delivered" => Ok(Self::Delivered),
            "unpacked" => Ok(Self::Unpacked),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidJobStatusError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub profile: Option<Profile>,
}

impl User {
    pub fn new(profile: Option<Profile>) -> Self {
        Self {
            id: Default::default(),
            profile,
        }
    }

    /// The profile email of this `User`. Blank emails are treated as missing.
    pub fn contact_email(&self) -> Option<&str> {
        self.profile
            .as_ref()?
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    fn as_recipient(&self, source: RecipientSource) -> Option<Recipient> {
        let email = self.contact_email()?;
        let first_name = self
            .profile
            .as_ref()
            .map(|p| p.first_name.trim())
            .filter(|name| !name.is_empty())
            .map(String::from);
        Some(Recipient {
            email: email.to_string(),
            first_name,
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: ID,
    pub name: String,
    /// The `User` to contact when a `Job` of this `Company` has no primary contact
    pub default_contact: Option<User>,
}

impl Company {
    pub fn new(name: impl Into<String>, default_contact: Option<User>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            default_contact,
        }
    }
}

/// A rental `Job`. Jobs are created and moved through their statuses by
/// the back office; reminders only read them.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: ID,
    pub name: String,
    pub status: JobStatus,
    pub completed_at: Option<NaiveDate>,
    pub unpacked_at: Option<NaiveDate>,
    /// Primary contact of the renter for this `Job`
    pub contact: Option<User>,
    /// The renting `Company`
    pub company: Option<Company>,
    /// The `Company` supplying the equipment
    pub supplier: Option<Company>,
}

impl Job {
    pub fn new(name: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            status,
            completed_at: None,
            unpacked_at: None,
            contact: None,
            company: None,
            supplier: None,
        }
    }

    pub fn anchor_date(&self, anchor: AnchorField) -> Option<NaiveDate> {
        match anchor {
            AnchorField::CompletedAt => self.completed_at,
            AnchorField::UnpackedAt => self.unpacked_at,
        }
    }

    /// Resolves who should receive reminders for this `Job`.
    ///
    /// The primary contact's profile email is preferred, then the profile
    /// email of the renting company's default contact.
    pub fn recipient(&self) -> Result<Recipient, RecipientError> {
        self.contact
            .as_ref()
            .and_then(|contact| contact.as_recipient(RecipientSource::PrimaryContact))
            .or_else(|| {
                self.company
                    .as_ref()?
                    .default_contact
                    .as_ref()?
                    .as_recipient(RecipientSource::CompanyDefaultContact)
            })
            .ok_or_else(|| RecipientError::NoContactEmail(self.id.clone()))
    }

    pub fn counterpart_name(&self) -> Option<&str> {
        self.supplier
            .as_ref()
            .map(|s| s.name.trim())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientSource {
    PrimaryContact,
    CompanyDefaultContact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub email: String,
    pub first_name: Option<String>,
    pub source: RecipientSource,
}

#[derive(Error, Debug, PartialEq)]
pub enum RecipientError {
    #[error("Job {0} has no contact email on its primary contact or company default contact")]
    NoContactEmail(ID),
}

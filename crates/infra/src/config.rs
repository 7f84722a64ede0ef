use chrono_tz::Tz;
use tracing::{info, warn};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_FROM: &str = "noreply@rental.local";
const DEFAULT_RUN_HOUR: u32 = 9;

/// SMTP settings. Only present when `SMTP_HOST` is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let port = match std::env::var("SMTP_PORT") {
            Ok(port) => port.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "The given SMTP_PORT: {} is not valid, falling back to the default port: {}.",
                    port, DEFAULT_SMTP_PORT
                );
                DEFAULT_SMTP_PORT
            }),
            Err(_) => DEFAULT_SMTP_PORT,
        };
        Some(Self {
            host,
            port,
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// How to reach the mail server. Reminders can not be sent without it,
    /// except in dry runs.
    pub smtp: Option<SmtpConfig>,
    /// Sender address of reminder emails
    pub mail_from: String,
    /// Timezone in which "today" is computed when comparing against
    /// anchor dates
    pub timezone: Tz,
    /// Local hour of the day at which the daemon runs the reminders
    pub run_hour: u32,
}

impl Config {
    pub fn new() -> Self {
        let mail_from = std::env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.into());

        let timezone = match std::env::var("REMINDERS_TIMEZONE") {
            Ok(tz) => tz.parse::<Tz>().unwrap_or_else(|_| {
                warn!(
                    "The given REMINDERS_TIMEZONE: {} is not valid, falling back to UTC.",
                    tz
                );
                Tz::UTC
            }),
            Err(_) => Tz::UTC,
        };

        let run_hour = match std::env::var("REMINDERS_RUN_HOUR") {
            Ok(hour) => match hour.parse::<u32>() {
                Ok(hour) if hour < 24 => hour,
                _ => {
                    warn!(
                        "The given REMINDERS_RUN_HOUR: {} is not valid, falling back to: {}.",
                        hour, DEFAULT_RUN_HOUR
                    );
                    DEFAULT_RUN_HOUR
                }
            },
            Err(_) => DEFAULT_RUN_HOUR,
        };

        let smtp = SmtpConfig::from_env();
        if smtp.is_none() {
            info!("Did not find SMTP_HOST environment variable. Reminders can only be dry run.");
        }

        Self {
            smtp,
            mail_from,
            timezone,
            run_hour,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

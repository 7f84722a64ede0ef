mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
pub use repos::{
    IEmailTemplateRepo, IJobRepo, IReminderRepo, InMemoryEmailTemplateRepo, InMemoryJobRepo,
    InMemoryReminderRepo, Repos,
};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticSys};
use thiserror::Error;
use tracing::info;

#[derive(Clone)]
pub struct RentalContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("{0} env var must be present")]
    MissingEnv(&'static str),
    #[error("SMTP_HOST must be set to send reminders. Use a dry run to send nothing")]
    MailerNotConfigured,
    #[error("Unable to connect to postgres: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unable to run migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error("Unable to create mailer: {0}")]
    Mailer(#[from] MailError),
}

impl RentalContext {
    /// Context where every repository and the mailer live in memory
    pub fn create_inmemory() -> Self {
        let config = Config::new();
        Self {
            repos: Repos::create_inmemory(),
            sys: Arc::new(RealSys {
                timezone: config.timezone,
            }),
            config,
            mailer: Arc::new(InMemoryMailer::new()),
        }
    }

    /// Keeps reading jobs from the configured store, but nothing is sent
    /// and nothing is written to the reminder ledger
    pub fn into_dry_run(self) -> Self {
        Self {
            repos: Repos {
                reminders: Arc::new(InMemoryReminderRepo::new()),
                ..self.repos
            },
            mailer: Arc::new(InMemoryMailer::new()),
            ..self
        }
    }
}

/// Will setup the infrastructure context given the environment.
/// Dry runs never write to the database, not even migrations.
pub async fn setup_context(dry_run: bool) -> Result<RentalContext, ContextError> {
    let config = Config::new();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string()?)
        .await?;
    if dry_run {
        info!("Dry run, skipping DB migrations. The database must already be migrated");
    } else {
        run_migration(&pool).await?;
    }

    let mailer: Arc<dyn IMailer> = match (&config.smtp, dry_run) {
        (_, true) => Arc::new(InMemoryMailer::new()),
        (Some(smtp), false) => Arc::new(SmtpMailer::new(smtp, &config.mail_from)?),
        (None, false) => return Err(ContextError::MailerNotConfigured),
    };

    let context = RentalContext {
        repos: Repos::create_postgres(pool),
        sys: Arc::new(RealSys {
            timezone: config.timezone,
        }),
        config,
        mailer,
    };

    Ok(if dry_run {
        context.into_dry_run()
    } else {
        context
    })
}

fn get_psql_connection_string() -> Result<String, ContextError> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| ContextError::MissingEnv(PSQL_CONNECTION_STRING))
}

pub async fn run_migration(pool: &PgPool) -> Result<(), MigrateError> {
    info!("DB MIGRATIONS ...");
    sqlx::migrate!().run(pool).await?;
    info!("DB MIGRATIONS ... [done]");
    Ok(())
}

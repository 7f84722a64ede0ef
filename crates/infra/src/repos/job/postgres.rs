use super::IJobRepo;
use chrono::NaiveDate;
use rental_reminders_domain::{AnchorField, Company, Job, JobStatus, Profile, User};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Selects a job together with the relations needed to resolve the
/// reminder recipient and the counterpart name
const SELECT_JOBS: &str = r#"
    SELECT
        j.job_uid, j.name, j.status, j.completed_at, j.unpacked_at,
        cu.user_uid AS contact_uid,
        cp.user_uid AS contact_profile_uid,
        cp.first_name AS contact_first_name,
        cp.last_name AS contact_last_name,
        cp.email AS contact_email,
        c.company_uid, c.name AS company_name,
        du.user_uid AS default_contact_uid,
        dp.user_uid AS default_contact_profile_uid,
        dp.first_name AS default_contact_first_name,
        dp.last_name AS default_contact_last_name,
        dp.email AS default_contact_email,
        s.company_uid AS supplier_uid, s.name AS supplier_name
    FROM jobs AS j
    LEFT JOIN users AS cu ON cu.user_uid = j.contact_uid
    LEFT JOIN profiles AS cp ON cp.user_uid = cu.user_uid
    LEFT JOIN companies AS c ON c.company_uid = j.company_uid
    LEFT JOIN users AS du ON du.user_uid = c.default_contact_uid
    LEFT JOIN profiles AS dp ON dp.user_uid = du.user_uid
    LEFT JOIN companies AS s ON s.company_uid = j.supplier_uid
"#;

#[derive(Debug, FromRow)]
struct JobRaw {
    job_uid: Uuid,
    name: String,
    status: String,
    completed_at: Option<NaiveDate>,
    unpacked_at: Option<NaiveDate>,
    contact_uid: Option<Uuid>,
    contact_profile_uid: Option<Uuid>,
    contact_first_name: Option<String>,
    contact_last_name: Option<String>,
    contact_email: Option<String>,
    company_uid: Option<Uuid>,
    company_name: Option<String>,
    default_contact_uid: Option<Uuid>,
    default_contact_profile_uid: Option<Uuid>,
    default_contact_first_name: Option<String>,
    default_contact_last_name: Option<String>,
    default_contact_email: Option<String>,
    supplier_uid: Option<Uuid>,
    supplier_name: Option<String>,
}

fn to_user(
    user_uid: Option<Uuid>,
    profile_uid: Option<Uuid>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> Option<User> {
    let profile = profile_uid.map(|_| Profile {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email,
    });
    user_uid.map(|uid| User {
        id: uid.into(),
        profile,
    })
}

impl TryFrom<JobRaw> for Job {
    type Error = anyhow::Error;

    fn try_from(raw: JobRaw) -> Result<Self, Self::Error> {
        let contact = to_user(
            raw.contact_uid,
            raw.contact_profile_uid,
            raw.contact_first_name,
            raw.contact_last_name,
            raw.contact_email,
        );
        let default_contact = to_user(
            raw.default_contact_uid,
            raw.default_contact_profile_uid,
            raw.default_contact_first_name,
            raw.default_contact_last_name,
            raw.default_contact_email,
        );
        let company = raw.company_uid.map(|uid| Company {
            id: uid.into(),
            name: raw.company_name.unwrap_or_default(),
            default_contact,
        });
        let supplier = raw.supplier_uid.map(|uid| Company {
            id: uid.into(),
            name: raw.supplier_name.unwrap_or_default(),
            default_contact: None,
        });

        Ok(Self {
            id: raw.job_uid.into(),
            name: raw.name,
            status: raw.status.parse::<JobStatus>()?,
            completed_at: raw.completed_at,
            unpacked_at: raw.unpacked_at,
            contact,
            company,
            supplier,
        })
    }
}

#[async_trait::async_trait]
impl IJobRepo for PostgresJobRepo {
    async fn find_by_status_with_anchor(
        &self,
        status: JobStatus,
        anchor: AnchorField,
    ) -> anyhow::Result<Vec<Job>> {
        // The anchor column comes from a closed set, never from input
        let query = format!(
            "{} WHERE j.status = $1 AND j.{} IS NOT NULL ORDER BY j.job_uid",
            SELECT_JOBS,
            anchor.column()
        );
        let jobs_raw: Vec<JobRaw> = sqlx::query_as::<_, JobRaw>(&query)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Find jobs with status: {} and {} set failed. DB returned error: {:?}",
                    status,
                    anchor.column(),
                    e
                );
                e
            })?;

        jobs_raw.into_iter().map(Job::try_from).collect()
    }
}

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
    /// The current calendar day in the configured timezone
    fn today(&self) -> NaiveDate;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {
    pub timezone: Tz,
}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        self.timezone
            .from_utc_datetime(&Utc::now().naive_utc())
            .date_naive()
    }
}

/// System frozen at the start of a given day, useful in tests
pub struct StaticSys {
    pub today: NaiveDate,
}

impl ISys for StaticSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.today
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

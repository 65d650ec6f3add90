//! Source of "today" for status derivation and default dates.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{Error, Result};

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the facility's timezone.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, with "today" evaluated in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a clock for `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a clock from an IANA name such as `America/Sao_Paulo`.
    pub fn from_name(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| Error::config(format!("unknown timezone '{name}'")))?;
        Ok(Self::new(tz))
    }

    /// The configured timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// A clock pinned to one instant, for tests and dry runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Pins "today" to `today`, with `now` at its midday UTC.
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

//! Route handlers, one module per console page.

pub mod authorizations;
pub mod catalog;
pub mod services;
pub mod session;
pub mod users;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use portaria_core::filter::SearchTerm;
use portaria_core::types::parse_date;

use crate::Result;

/// Query string of the per-day list pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayQuery {
    /// Day to list, `YYYY-MM-DD`; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// Search term.
    #[serde(default)]
    pub q: Option<String>,
}

impl DayQuery {
    /// The selected day, or `today` when none was given.
    pub fn day(&self, today: NaiveDate) -> Result<NaiveDate> {
        resolve_day(self.date.as_deref(), today)
    }

    /// The search term; absent means match everything.
    pub fn term(&self) -> SearchTerm {
        SearchTerm::new(self.q.clone().unwrap_or_default())
    }
}

/// Parses an optional `YYYY-MM-DD` day, falling back to `today`.
pub(crate) fn resolve_day(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(today),
    }
}

/// A filtered list for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayList<T> {
    /// The listed day.
    pub date: NaiveDate,
    /// Number of items after filtering.
    pub total: usize,
    /// The items, newest first.
    pub items: Vec<T>,
}

impl<T> DayList<T> {
    pub(crate) fn new(date: NaiveDate, items: Vec<T>) -> Self {
        Self {
            date,
            total: items.len(),
            items,
        }
    }
}

/// Parses a numeric row ID from the path.
pub(crate) fn row_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| crate::Error::BadRequest(format!("invalid id '{raw}'")))
}

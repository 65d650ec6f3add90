//! Offline operational checks.

use std::path::Path;

use chrono::NaiveDate;

use portaria_core::bulk::{BulkParse, parse_authorizations};
use portaria_core::types::parse_date;
use portaria_core::{Error, Result, TicketStatus};

/// Status a ticket scheduled for `date` with `stored` status shows on `today`.
pub fn check_status(date: &str, stored: &str, today: NaiveDate) -> Result<TicketStatus> {
    let date = parse_date(date)?;
    let stored: TicketStatus = stored.parse()?;
    Ok(TicketStatus::derive(stored, date, today))
}

/// Parses a bulk authorization file for `date` without writing anything.
pub fn bulk_check(path: &Path, date: NaiveDate) -> Result<BulkParse> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    Ok(parse_authorizations(&text, date))
}

/// Human-readable report of a bulk parse.
pub fn bulk_report(parsed: &BulkParse) -> Vec<String> {
    let mut lines: Vec<String> = parsed
        .accepted
        .iter()
        .map(|row| format!("ok      {} ({}): {}", row.name, row.cpf, row.rooms.join(", ")))
        .collect();
    lines.extend(
        parsed
            .rejected
            .iter()
            .map(|r| format!("line {}: {}", r.line, r.reason)),
    );
    lines.push(format!(
        "{} accepted, {} rejected",
        parsed.accepted.len(),
        parsed.rejected.len()
    ));
    lines
}

//! Bulk authorization import.
//!
//! One person per line: `name;cpf;room1,room2,...`. Anything after the second
//! `;` belongs to the room list, so `name;cpf;A;B,C` yields rooms `A;B` and `C`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{AuthorizationChanges, NewAuthorization, RoomList};

/// A line that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number in the submitted text.
    pub line: usize,
    /// Why it was skipped.
    pub reason: &'static str,
}

/// Outcome of parsing a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkParse {
    /// Rows ready to insert, in input order.
    pub accepted: Vec<NewAuthorization>,
    /// Non-blank lines that were skipped.
    pub rejected: Vec<RejectedLine>,
}

/// Parses a bulk import for `date`. Blank lines are ignored silently.
pub fn parse_authorizations(text: &str, date: NaiveDate) -> BulkParse {
    let mut result = BulkParse::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(changes) => result
                .accepted
                .push(NewAuthorization::from_changes(changes, date)),
            Err(reason) => result.rejected.push(RejectedLine {
                line: index + 1,
                reason,
            }),
        }
    }

    result
}

fn parse_line(line: &str) -> Result<AuthorizationChanges, &'static str> {
    let parts: Vec<&str> = line.split(';').map(str::trim).collect();
    let [name, cpf, rest @ ..] = parts.as_slice() else {
        return Err("expected name;cpf;rooms");
    };
    if rest.is_empty() {
        return Err("expected name;cpf;rooms");
    }
    if name.is_empty() {
        return Err("missing name");
    }
    if cpf.is_empty() {
        return Err("missing cpf");
    }

    let joined = rest.join(";");
    let rooms: RoomList = joined.split(',').collect();
    if rooms.is_empty() {
        return Err("missing rooms");
    }

    Ok(AuthorizationChanges {
        name: name.to_string(),
        cpf: cpf.to_string(),
        rooms: rooms.into_vec(),
    })
}
